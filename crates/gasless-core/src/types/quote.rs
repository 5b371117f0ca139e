//! Quote types returned by the relay's quote endpoint.
//!
//! A quote carries one or two EIP-712 signing requests: the trade itself
//! (always present) and a gasless approval (present only when the relay
//! determined the taker still needs one). Amounts travel as integer
//! strings in token base units and are never rescaled here.

use serde::{Deserialize, Serialize};

/// The four components a wallet needs for an EIP-712 typed-data prompt.
///
/// `types`, `domain`, and `message` are kept as raw JSON so any signing
/// scheme the relay produces round-trips bit-exactly to the wallet and
/// back into the submission payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eip712TypedData {
    pub types: serde_json::Value,
    #[serde(rename = "primaryType")]
    pub primary_type: String,
    pub domain: serde_json::Value,
    pub message: serde_json::Value,
}

/// One signing request embedded in a quote.
///
/// `kind` (wire name `type`) is an opaque scheme tag the relay expects
/// back unmodified on submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub eip712: Eip712TypedData,
}

/// A quote for a proposed swap, as returned by `GET /api/quote`.
///
/// Immutable once fetched; a changed input produces a new quote (and a
/// fresh signing session) rather than mutating this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Sell token contract address.
    #[serde(rename = "sellTokenAddress", alias = "sellToken")]
    pub sell_token: String,
    /// Buy token contract address.
    #[serde(rename = "buyTokenAddress", alias = "buyToken")]
    pub buy_token: String,
    /// Sell amount in token base units, as an integer string.
    #[serde(rename = "sellAmount")]
    pub sell_amount: String,
    /// Buy amount in token base units, as an integer string.
    #[serde(rename = "buyAmount")]
    pub buy_amount: String,
    /// Gasless approval signing request, present only when required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<SignRequest>,
    /// Trade signing request, always present.
    pub trade: SignRequest,
}

impl Quote {
    /// Whether this quote requires a gasless approval signature.
    pub fn requires_approval(&self) -> bool {
        self.approval.is_some()
    }
}

/// Parameters for a quote request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub sell_token: String,
    pub buy_token: String,
    pub sell_amount: String,
    pub taker_address: Option<String>,
    pub check_approval: bool,
}

impl QuoteRequest {
    pub fn new(
        sell_token: impl Into<String>,
        buy_token: impl Into<String>,
        sell_amount: impl Into<String>,
    ) -> Self {
        Self {
            sell_token: sell_token.into(),
            buy_token: buy_token.into(),
            sell_amount: sell_amount.into(),
            taker_address: None,
            check_approval: true,
        }
    }

    /// Set the taker address.
    pub fn taker(mut self, taker_address: impl Into<String>) -> Self {
        self.taker_address = Some(taker_address.into());
        self
    }

    /// Set whether the relay should check for a missing allowance.
    pub fn check_approval(mut self, check_approval: bool) -> Self {
        self.check_approval = check_approval;
        self
    }

    /// Serialize as the quote endpoint's query string.
    ///
    /// Key order is fixed so identical parameters always produce the
    /// identical request line.
    pub fn query_string(&self) -> String {
        let mut query = format!(
            "sellToken={}&buyToken={}&sellAmount={}",
            self.sell_token, self.buy_token, self.sell_amount
        );
        if let Some(taker) = &self.taker_address {
            query.push_str(&format!("&takerAddress={}", taker));
        }
        query.push_str(&format!("&checkApproval={}", self.check_approval));
        query
    }
}
