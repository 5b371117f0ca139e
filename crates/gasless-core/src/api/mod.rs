//! API clients for external services.

pub mod relay;

pub use relay::{RelayApi, RelayClient};
