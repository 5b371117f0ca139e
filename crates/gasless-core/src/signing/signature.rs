//! Signature codec: raw 65-byte wallet output to the relay's (r, s, v) form.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A raw signature as returned by a wallet's typed-data prompt.
///
/// Hex string encoding the 65-byte concatenation of `r` (32 bytes),
/// `s` (32 bytes), and a single recovery byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSignature(String);

impl RawSignature {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Encode 65 signature bytes as a 0x-prefixed hex string.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RawSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A signature decomposed into the components on-chain verifiers consume.
///
/// `v` is normalized to the conventional 27/28 recovery-id domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSignature {
    pub r: B256,
    pub s: B256,
    pub v: u8,
}

/// Signature scheme markers understood by the relay.
///
/// Matches the 0x protocol signature-type enumeration; assembled orders
/// always carry [`SignatureScheme::Eip712`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    Illegal = 0,
    Invalid = 1,
    Eip712 = 2,
    EthSign = 3,
}

impl SignatureScheme {
    /// Get the numeric wire value.
    pub fn as_u8(&self) -> u8 {
        match self {
            SignatureScheme::Illegal => 0,
            SignatureScheme::Invalid => 1,
            SignatureScheme::Eip712 => 2,
            SignatureScheme::EthSign => 3,
        }
    }
}

/// Split a raw signature into its `{ r, s, v }` components.
///
/// The input must decode to exactly 65 bytes (with or without a `0x`
/// prefix). The recovery byte is normalized: wallets returning the low
/// form `{0, 1}` map to `{27, 28}`; canonical `{27, 28}` pass through, as
/// do chain-adjusted values.
pub fn split(raw: &RawSignature) -> Result<SplitSignature> {
    let bytes =
        hex::decode(raw.as_str().trim_start_matches("0x")).map_err(|e| {
            Error::MalformedSignature {
                detail: format!("invalid hex: {}", e),
            }
        })?;

    if bytes.len() != 65 {
        return Err(Error::MalformedSignature {
            detail: format!("expected 65 bytes, got {}", bytes.len()),
        });
    }

    let r = B256::from_slice(&bytes[0..32]);
    let s = B256::from_slice(&bytes[32..64]);
    let v = match bytes[64] {
        0 => 27,
        1 => 28,
        v => v,
    };

    Ok(SplitSignature { r, s, v })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a raw signature with recognizable r/s bytes and the given
    /// recovery byte.
    fn raw_with_recovery(recovery: u8) -> RawSignature {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&[0x11; 32]);
        bytes[32..64].copy_from_slice(&[0x22; 32]);
        bytes[64] = recovery;
        RawSignature::from_bytes(&bytes)
    }

    #[test]
    fn test_split_extracts_components() {
        let split_sig = split(&raw_with_recovery(27)).unwrap();
        assert_eq!(split_sig.r, B256::from([0x11; 32]));
        assert_eq!(split_sig.s, B256::from([0x22; 32]));
        assert_eq!(split_sig.v, 27);
    }

    #[test]
    fn test_split_normalizes_low_recovery_ids() {
        assert_eq!(split(&raw_with_recovery(0)).unwrap().v, 27);
        assert_eq!(split(&raw_with_recovery(1)).unwrap().v, 28);
    }

    #[test]
    fn test_split_is_idempotent_on_canonical_values() {
        assert_eq!(split(&raw_with_recovery(27)).unwrap().v, 27);
        assert_eq!(split(&raw_with_recovery(28)).unwrap().v, 28);
    }

    #[test]
    fn test_split_is_deterministic() {
        let raw = raw_with_recovery(1);
        assert_eq!(split(&raw).unwrap(), split(&raw).unwrap());
    }

    #[test]
    fn test_split_accepts_unprefixed_hex() {
        let raw = RawSignature::new(hex::encode([0x33u8; 65]));
        assert!(split(&raw).is_ok());
    }

    #[test]
    fn test_split_rejects_wrong_length() {
        let short = RawSignature::from_bytes(&[0u8; 64]);
        let long = RawSignature::from_bytes(&[0u8; 66]);
        assert!(matches!(
            split(&short),
            Err(Error::MalformedSignature { .. })
        ));
        assert!(matches!(split(&long), Err(Error::MalformedSignature { .. })));
    }

    #[test]
    fn test_split_rejects_bad_hex() {
        let raw = RawSignature::new("0xzz");
        assert!(matches!(split(&raw), Err(Error::MalformedSignature { .. })));
    }

    #[test]
    fn test_signature_scheme_wire_values() {
        assert_eq!(SignatureScheme::Eip712.as_u8(), 2);
        assert_eq!(SignatureScheme::EthSign.as_u8(), 3);
    }
}
