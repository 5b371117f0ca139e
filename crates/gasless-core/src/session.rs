//! Per-quote signing session state.
//!
//! A session owns the signing progress for exactly one quote. Each slot
//! (approval, trade) moves independently through
//! `Unsigned -> Prompting -> Signed`; a failed or cancelled prompt falls
//! back to `Unsigned` with nothing retained, so retries start clean. The
//! session never re-prompts a slot that already holds a signature.

use uuid::Uuid;

use crate::signing::{split, RawSignature};
use crate::types::{Quote, SignRequest};
use crate::{Error, Result};

/// The two signing slots an order can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningSlot {
    Approval,
    Trade,
}

impl std::fmt::Display for SigningSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SigningSlot::Approval => write!(f, "approval"),
            SigningSlot::Trade => write!(f, "trade"),
        }
    }
}

/// State of one signing slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    /// No signature collected; the sign affordance may be offered.
    Unsigned,
    /// A wallet prompt is open; no second prompt may start for this slot.
    Prompting,
    /// Signature collected and validated; never re-requested.
    Signed(RawSignature),
}

impl SlotState {
    pub fn is_signed(&self) -> bool {
        matches!(self, SlotState::Signed(_))
    }

    pub fn is_prompting(&self) -> bool {
        matches!(self, SlotState::Prompting)
    }
}

/// Signing state for one quote instance.
///
/// Created when a quote is applied and discarded when the quote is
/// replaced or the flow is torn down; signatures never carry over between
/// quote instances, even content-identical ones.
#[derive(Debug, Clone)]
pub struct SigningSession {
    id: Uuid,
    quote: Quote,
    approval: SlotState,
    trade: SlotState,
}

impl SigningSession {
    /// Start a fresh session for a quote; both slots begin `Unsigned`.
    pub fn new(quote: Quote) -> Self {
        Self {
            id: Uuid::new_v4(),
            quote,
            approval: SlotState::Unsigned,
            trade: SlotState::Unsigned,
        }
    }

    /// Session identity, used to correlate prompt results and logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    fn state(&self, slot: SigningSlot) -> &SlotState {
        match slot {
            SigningSlot::Approval => &self.approval,
            SigningSlot::Trade => &self.trade,
        }
    }

    fn state_mut(&mut self, slot: SigningSlot) -> &mut SlotState {
        match slot {
            SigningSlot::Approval => &mut self.approval,
            SigningSlot::Trade => &mut self.trade,
        }
    }

    /// The quote's signing request for a slot, if that leg exists.
    pub fn sign_request(&self, slot: SigningSlot) -> Option<&SignRequest> {
        match slot {
            SigningSlot::Approval => self.quote.approval.as_ref(),
            SigningSlot::Trade => Some(&self.quote.trade),
        }
    }

    /// Whether the sign affordance should be offered for a slot: the slot
    /// exists on the quote and holds no signature or open prompt.
    pub fn can_prompt(&self, slot: SigningSlot) -> bool {
        self.sign_request(slot).is_some() && *self.state(slot) == SlotState::Unsigned
    }

    /// Begin a signing prompt for a slot, returning the exact payload to
    /// hand to the signer.
    ///
    /// Rejected when the slot has no request on this quote, already holds
    /// a signature, or has a prompt open.
    pub fn begin_prompt(&mut self, slot: SigningSlot) -> Result<SignRequest> {
        let request = self
            .sign_request(slot)
            .ok_or(Error::SlotUnavailable { slot })?
            .clone();

        match self.state(slot) {
            SlotState::Prompting => return Err(Error::PromptInFlight { slot }),
            SlotState::Signed(_) => return Err(Error::AlreadySigned { slot }),
            SlotState::Unsigned => {}
        }

        *self.state_mut(slot) = SlotState::Prompting;
        Ok(request)
    }

    /// Record a prompt's signature.
    ///
    /// The raw bytes are validated through the codec first; a malformed
    /// signature resets the slot to `Unsigned` and the prompt may be
    /// retried.
    pub fn complete_prompt(&mut self, slot: SigningSlot, raw: RawSignature) -> Result<()> {
        if !self.state(slot).is_prompting() {
            return Err(Error::Signing {
                message: format!("no open prompt for the {} slot", slot),
            });
        }

        if let Err(e) = split(&raw) {
            *self.state_mut(slot) = SlotState::Unsigned;
            return Err(e);
        }

        *self.state_mut(slot) = SlotState::Signed(raw);
        Ok(())
    }

    /// Cancel an open prompt; the slot returns to `Unsigned`.
    ///
    /// A no-op for slots that are not prompting, so wallet rejections can
    /// be reported unconditionally.
    pub fn abort_prompt(&mut self, slot: SigningSlot) {
        if self.state(slot).is_prompting() {
            *self.state_mut(slot) = SlotState::Unsigned;
        }
    }

    /// Whether a slot is satisfied.
    ///
    /// A slot absent from the quote (no approval leg) is vacuously signed
    /// for readiness purposes.
    pub fn is_signed(&self, slot: SigningSlot) -> bool {
        match self.sign_request(slot) {
            None => true,
            Some(_) => self.state(slot).is_signed(),
        }
    }

    /// The collected signature for a slot, if any.
    pub fn raw_signature(&self, slot: SigningSlot) -> Option<&RawSignature> {
        match self.state(slot) {
            SlotState::Signed(raw) => Some(raw),
            _ => None,
        }
    }

    /// The submit-readiness invariant: the trade is signed and, when the
    /// quote required an approval, so is the approval.
    pub fn ready_to_submit(&self) -> bool {
        self.is_signed(SigningSlot::Trade) && self.is_signed(SigningSlot::Approval)
    }
}
