//! Relay API client for quoting and order submission.
//!
//! The relay exposes two endpoints: `GET /api/quote` returns the typed
//! data to sign, and `POST /api/submit` accepts the assembled order and
//! answers with the trade hash. Both request and response bodies must be
//! reproduced exactly; everything else (allowance checks, routing, the
//! actual settlement) lives on the relay's side of the boundary.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::RelayConfig;
use crate::types::{Quote, QuoteRequest, SubmitOrder, SubmitResponse};
use crate::{Error, Result};

/// Relay endpoints consumed by the swap flow.
///
/// The orchestrator depends on this trait rather than the concrete client
/// so tests can stand in a scripted relay.
#[async_trait]
pub trait RelayApi: Send + Sync {
    /// Fetch a quote for the given parameters.
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote>;

    /// Submit an assembled order, returning the relay-issued trade hash.
    async fn submit(&self, order: &SubmitOrder) -> Result<String>;
}

/// HTTP client for the relay API.
pub struct RelayClient {
    base_url: String,
    /// HTTP client for API requests.
    pub http_client: reqwest::Client,
}

impl RelayClient {
    /// Default relay base URL.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:3000";

    pub fn new(base_url: Option<String>) -> Self {
        Self::with_timeouts(base_url, 30, 10)
    }

    /// Build a client from configuration.
    pub fn from_config(config: &RelayConfig) -> Self {
        Self::with_timeouts(
            Some(config.api_url.clone()),
            config.request_timeout_secs,
            config.connect_timeout_secs,
        )
    }

    fn with_timeouts(
        base_url: Option<String>,
        request_timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(request_timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(connect_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            http_client,
        }
    }

    /// Fetch a quote for a sell/buy pair and amount.
    ///
    /// Any failure to obtain a usable quote (transport, status, body
    /// shape, missing `trade` leg) surfaces as
    /// [`Error::QuoteUnavailable`]: the caller has no quote and all
    /// signing affordances stay blocked until a fetch succeeds.
    pub async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote> {
        let url = format!("{}/api/quote?{}", self.base_url, request.query_string());
        debug!(url = %url, "Fetching quote");

        let response =
            self.http_client.get(&url).send().await.map_err(|e| Error::QuoteUnavailable {
                detail: format!("request failed: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(Error::QuoteUnavailable {
                detail: format!("quote endpoint returned {}", response.status()),
            });
        }

        let text = response.text().await.map_err(|e| Error::QuoteUnavailable {
            detail: format!("failed to read response body: {}", e),
        })?;

        match serde_json::from_str::<Quote>(&text) {
            Ok(quote) => {
                info!(
                    sell_token = %quote.sell_token,
                    buy_token = %quote.buy_token,
                    sell_amount = %quote.sell_amount,
                    buy_amount = %quote.buy_amount,
                    requires_approval = quote.requires_approval(),
                    "Received quote"
                );
                Ok(quote)
            }
            Err(e) => {
                let preview = if text.len() > 500 { &text[..500] } else { &text };
                warn!(
                    error = %e,
                    response_preview = %preview,
                    "Could not parse quote response"
                );
                Err(Error::QuoteUnavailable {
                    detail: format!("unusable quote response: {}", e),
                })
            }
        }
    }

    /// Submit an assembled order.
    ///
    /// A failure here leaves the caller's signatures intact; retrying with
    /// the same order is always safe from this client's point of view.
    pub async fn submit(&self, order: &SubmitOrder) -> Result<String> {
        let url = format!("{}/api/submit", self.base_url);
        debug!(url = %url, has_approval = order.approval.is_some(), "Submitting order");

        let response = self
            .http_client
            .post(&url)
            .json(order)
            .send()
            .await
            .map_err(|e| Error::SubmissionFailed {
                detail: format!("request failed: {}", e),
                status: None,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::SubmissionFailed {
                detail: format!("submit endpoint returned {}: {}", status, text),
                status: Some(status),
            });
        }

        let body: SubmitResponse =
            response.json().await.map_err(|e| Error::SubmissionFailed {
                detail: format!("unusable submit response: {}", e),
                status: None,
            })?;

        if body.trade_hash.is_empty() {
            return Err(Error::SubmissionFailed {
                detail: "submit response carried an empty trade hash".to_string(),
                status: None,
            });
        }

        info!(trade_hash = %body.trade_hash, "Order submitted");
        Ok(body.trade_hash)
    }
}

#[async_trait]
impl RelayApi for RelayClient {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote> {
        RelayClient::get_quote(self, request).await
    }

    async fn submit(&self, order: &SubmitOrder) -> Result<String> {
        RelayClient::submit(self, order).await
    }
}

impl std::fmt::Debug for RelayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_defaults() {
        let client = RelayClient::new(None);
        assert_eq!(client.base_url, RelayClient::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_base_url_override() {
        let client = RelayClient::new(Some("https://relay.example.com".to_string()));
        assert_eq!(client.base_url, "https://relay.example.com");
    }

    #[test]
    fn test_client_from_config() {
        let config = RelayConfig::test_config();
        let client = RelayClient::from_config(&config);
        assert_eq!(client.base_url, config.api_url);
    }
}
