//! Submission-ready order types and the assembly step.
//!
//! Assembly is the last pure step before the network call: it pairs each
//! signing request from the quote with its collected signature, splits the
//! signature into the relay's (r, s, v) form, and tags it with the fixed
//! EIP-712 scheme marker.

use serde::{Deserialize, Serialize};

use super::quote::{Eip712TypedData, SignRequest};
use crate::signing::{split, RawSignature, SignatureScheme, SplitSignature};
use crate::{Error, Result};

/// Wire form of a split signature, as the submission endpoint expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSignature {
    /// `r` component as a 0x-prefixed 32-byte hex string.
    pub r: String,
    /// `s` component as a 0x-prefixed 32-byte hex string.
    pub s: String,
    /// Recovery id, normalized to the 27/28 domain.
    pub v: u8,
    /// Fixed scheme marker; always the EIP-712 wire value.
    #[serde(rename = "signatureType")]
    pub signature_type: u8,
}

impl From<SplitSignature> for PartSignature {
    fn from(sig: SplitSignature) -> Self {
        Self {
            r: format!("{:?}", sig.r),
            s: format!("{:?}", sig.s),
            v: sig.v,
            signature_type: SignatureScheme::Eip712.as_u8(),
        }
    }
}

/// One leg of the submission payload: the signing request echoed back with
/// its signature attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPart {
    /// Scheme tag from the quote, passed through unmodified.
    #[serde(rename = "type")]
    pub kind: String,
    /// The typed data that was signed, echoed back bit-exactly.
    pub eip712: Eip712TypedData,
    pub signature: PartSignature,
}

impl OrderPart {
    fn build(request: &SignRequest, raw: &RawSignature) -> Result<Self> {
        Ok(Self {
            kind: request.kind.clone(),
            eip712: request.eip712.clone(),
            signature: split(raw)?.into(),
        })
    }
}

/// The complete body for `POST /api/submit`.
///
/// `approval` is omitted from the JSON entirely when the quote had no
/// approval leg; the relay distinguishes omission from null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitOrder {
    pub trade: OrderPart,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<OrderPart>,
}

/// Response body from the submission endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    /// Relay-issued trade identifier.
    #[serde(rename = "tradeHash")]
    pub trade_hash: String,
}

/// Build the submission payload from the quote's signing requests and the
/// collected signatures.
///
/// The trade signature is mandatory; assembly fails with
/// [`Error::IncompleteOrder`] before anything reaches the network without
/// it. The approval leg is included only when the caller supplies one.
pub fn assemble(
    trade: &SignRequest,
    trade_sig: Option<&RawSignature>,
    approval: Option<(&SignRequest, &RawSignature)>,
) -> Result<SubmitOrder> {
    let trade_sig = trade_sig.ok_or(Error::IncompleteOrder)?;

    let approval = approval
        .map(|(request, raw)| OrderPart::build(request, raw))
        .transpose()?;

    Ok(SubmitOrder {
        trade: OrderPart::build(trade, trade_sig)?,
        approval,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sign_request(kind: &str) -> SignRequest {
        serde_json::from_value(json!({
            "type": kind,
            "eip712": {
                "types": { "Trade": [{ "name": "taker", "type": "address" }] },
                "primaryType": "Trade",
                "domain": { "name": "Relay", "chainId": 137 },
                "message": { "taker": "0x0000000000000000000000000000000000000001" },
            },
        }))
        .unwrap()
    }

    fn raw_signature(recovery: u8) -> RawSignature {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&[0xaa; 32]);
        bytes[32..64].copy_from_slice(&[0xbb; 32]);
        bytes[64] = recovery;
        RawSignature::from_bytes(&bytes)
    }

    #[test]
    fn test_assemble_requires_trade_signature() {
        let trade = sign_request("metatransaction_v2");
        let approval = sign_request("permit");
        let approval_sig = raw_signature(0);

        let result = assemble(&trade, None, Some((&approval, &approval_sig)));
        assert!(matches!(result, Err(Error::IncompleteOrder)));
    }

    #[test]
    fn test_assemble_without_approval_omits_key() {
        let trade = sign_request("metatransaction_v2");
        let trade_sig = raw_signature(1);

        let order = assemble(&trade, Some(&trade_sig), None).unwrap();
        assert!(order.approval.is_none());

        let body = serde_json::to_value(&order).unwrap();
        assert!(body.get("approval").is_none());
        assert!(body.get("trade").is_some());
    }

    #[test]
    fn test_assemble_passes_scheme_tags_through() {
        let trade = sign_request("metatransaction_v2");
        let approval = sign_request("permit");
        let trade_sig = raw_signature(27);
        let approval_sig = raw_signature(28);

        let order = assemble(
            &trade,
            Some(&trade_sig),
            Some((&approval, &approval_sig)),
        )
        .unwrap();

        assert_eq!(order.trade.kind, "metatransaction_v2");
        assert_eq!(order.approval.as_ref().unwrap().kind, "permit");
        assert_eq!(order.trade.eip712, trade.eip712);
    }

    #[test]
    fn test_assembled_signature_is_split_and_tagged() {
        let trade = sign_request("metatransaction_v2");
        let trade_sig = raw_signature(0);

        let order = assemble(&trade, Some(&trade_sig), None).unwrap();
        let sig = &order.trade.signature;

        assert_eq!(sig.r, format!("0x{}", "aa".repeat(32)));
        assert_eq!(sig.s, format!("0x{}", "bb".repeat(32)));
        assert_eq!(sig.v, 27);
        assert_eq!(sig.signature_type, SignatureScheme::Eip712.as_u8());
    }

    #[test]
    fn test_assemble_rejects_malformed_signature() {
        let trade = sign_request("metatransaction_v2");
        let bad = RawSignature::from_bytes(&[0u8; 10]);

        let result = assemble(&trade, Some(&bad), None);
        assert!(matches!(result, Err(Error::MalformedSignature { .. })));
    }

    #[test]
    fn test_submit_order_serialization_shape() {
        let trade = sign_request("metatransaction_v2");
        let approval = sign_request("permit");
        let trade_sig = raw_signature(1);
        let approval_sig = raw_signature(0);

        let order = assemble(
            &trade,
            Some(&trade_sig),
            Some((&approval, &approval_sig)),
        )
        .unwrap();

        let body = serde_json::to_value(&order).unwrap();
        assert_eq!(body["trade"]["type"], "metatransaction_v2");
        assert_eq!(body["approval"]["type"], "permit");
        assert_eq!(body["trade"]["signature"]["signatureType"], 2);
        assert_eq!(body["trade"]["signature"]["v"], 28);
        assert_eq!(
            body["trade"]["eip712"]["primaryType"],
            json!("Trade"),
        );
    }
}
