//! Swap Engine
//!
//! Drives the gasless swap flow end to end: fetch a quote, collect the
//! signatures it requires, assemble the order, and submit it to the relay.

pub mod orchestrator;

pub use orchestrator::{OrchestratorConfig, SwapOrchestrator, SwapReport};
