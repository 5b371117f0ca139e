//! Core domain types for the gasless swap flow.

pub mod order;
pub mod quote;
pub mod tokens;

pub use order::*;
pub use quote::*;
pub use tokens::*;
