//! Error types for the gasless swap flow.

use thiserror::Error;

use crate::session::SigningSlot;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Malformed signature: {detail}")]
    MalformedSignature { detail: String },

    #[error("Order is missing its trade signature")]
    IncompleteOrder,

    #[error("Quote unavailable: {detail}")]
    QuoteUnavailable { detail: String },

    #[error("Submission failed: {detail}")]
    SubmissionFailed { detail: String, status: Option<u16> },

    #[error("Signing prompt already in flight for the {slot} slot")]
    PromptInFlight { slot: SigningSlot },

    #[error("The {slot} slot is already signed")]
    AlreadySigned { slot: SigningSlot },

    #[error("The quote has no {slot} leg to sign")]
    SlotUnavailable { slot: SigningSlot },

    #[error("A submission is already in flight for this session")]
    SubmissionInFlight,

    #[error("Signing error: {message}")]
    Signing { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
