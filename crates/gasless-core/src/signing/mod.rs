//! EIP-712 signing for the gasless swap flow.
//!
//! The wallet prompt itself is an external capability behind the
//! [`TypedDataSigner`] trait; this module owns everything around it: the
//! raw 65-byte signature representation, the (r, s, v) split the relay
//! expects on submission, and an in-process [`LocalSigner`] for embedders
//! that hold a private key directly.

pub mod signature;
pub mod signer;

pub use signature::{split, RawSignature, SignatureScheme, SplitSignature};
pub use signer::{LocalSigner, TypedDataSigner};
