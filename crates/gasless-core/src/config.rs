//! Configuration management for the gasless swap client.

use serde::Deserialize;
use std::env;

/// Relay client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Base URL of the relay API.
    pub api_url: String,
    /// Default taker address attached to quote requests.
    pub taker_address: Option<String>,
    /// Whether quote requests ask the relay to check allowances.
    pub check_approval: bool,
    /// Overall request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl RelayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_url: env::var("RELAY_API_URL")
                .unwrap_or_else(|_| crate::api::RelayClient::DEFAULT_BASE_URL.to_string()),
            taker_address: env::var("RELAY_TAKER_ADDRESS").ok(),
            check_approval: env::var("RELAY_CHECK_APPROVAL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            request_timeout_secs: env::var("RELAY_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            connect_timeout_secs: env::var("RELAY_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Configuration for testing (with defaults).
    pub fn test_config() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            taker_address: None,
            check_approval: true,
            request_timeout_secs: 5,
            connect_timeout_secs: 2,
        }
    }
}
