//! Gasless Swap: client-side orchestration for relay-settled token swaps.
//!
//! This is the root crate tying the workspace together for integration
//! tests. For actual functionality, use the individual crates directly:
//!
//! - `gasless-core`: wire types, signature codec, signing session, relay client
//! - `swap-engine`: quote-to-submission orchestration

pub use gasless_core as core;
pub use swap_engine as engine;
