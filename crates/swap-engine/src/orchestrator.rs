//! Swap orchestration: quote lifecycle, signing prompts, and submission.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use gasless_core::api::RelayApi;
use gasless_core::session::{SigningSession, SigningSlot};
use gasless_core::signing::TypedDataSigner;
use gasless_core::types::{assemble, Quote, QuoteRequest, TokenRegistry};
use gasless_core::{Error, Result};

/// Configuration for the swap orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Default taker address attached to quote requests.
    pub taker_address: Option<String>,
    /// Whether quote requests ask the relay to check allowances.
    pub check_approval: bool,
    /// Capacity of the swap report channel.
    pub report_buffer: usize,
    /// Token metadata used for log labels.
    pub tokens: TokenRegistry,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            taker_address: None,
            check_approval: true,
            report_buffer: 64,
            tokens: TokenRegistry::polygon(),
        }
    }
}

/// Report of a completed swap submission.
#[derive(Debug, Clone, Serialize)]
pub struct SwapReport {
    pub session_id: Uuid,
    pub trade_hash: String,
    pub sell_token: String,
    pub buy_token: String,
    pub sell_amount: String,
    pub buy_amount: String,
    pub submitted_at: DateTime<Utc>,
}

/// Drives one swap flow at a time against a relay and a signer.
///
/// The orchestrator owns the signing session for the current quote.
/// Fetching a new quote replaces the session wholesale; results of
/// prompts or fetches that outlive the session they belonged to are
/// discarded rather than applied.
pub struct SwapOrchestrator {
    relay: Arc<dyn RelayApi>,
    signer: Arc<dyn TypedDataSigner>,
    config: OrchestratorConfig,
    /// Session for the current quote, if one is loaded.
    session: RwLock<Option<SigningSession>>,
    /// Bumped on every fetch and teardown; quote responses are applied
    /// only when their generation is still current.
    generation: AtomicU64,
    /// Guard for the single-in-flight submission rule.
    submit_in_flight: AtomicBool,
    /// Channel for swap reports.
    report_tx: mpsc::Sender<SwapReport>,
    /// Receiver for swap reports (taken once).
    report_rx: Option<mpsc::Receiver<SwapReport>>,
}

impl SwapOrchestrator {
    /// Create a new orchestrator with default configuration.
    pub fn new(relay: Arc<dyn RelayApi>, signer: Arc<dyn TypedDataSigner>) -> Self {
        Self::with_config(relay, signer, OrchestratorConfig::default())
    }

    pub fn with_config(
        relay: Arc<dyn RelayApi>,
        signer: Arc<dyn TypedDataSigner>,
        config: OrchestratorConfig,
    ) -> Self {
        let (report_tx, report_rx) = mpsc::channel(config.report_buffer);
        Self {
            relay,
            signer,
            config,
            session: RwLock::new(None),
            generation: AtomicU64::new(0),
            submit_in_flight: AtomicBool::new(false),
            report_tx,
            report_rx: Some(report_rx),
        }
    }

    /// Take the swap report receiver (can only be called once).
    pub fn take_report_receiver(&mut self) -> Option<mpsc::Receiver<SwapReport>> {
        self.report_rx.take()
    }

    /// Fetch a quote for a token pair and amount, using the configured
    /// taker address and approval-check flag.
    pub async fn refresh_quote(
        &self,
        sell_token: impl Into<String>,
        buy_token: impl Into<String>,
        sell_amount: impl Into<String>,
    ) -> Result<bool> {
        let mut request = QuoteRequest::new(sell_token, buy_token, sell_amount)
            .check_approval(self.config.check_approval);
        if let Some(taker) = &self.config.taker_address {
            request = request.taker(taker.clone());
        }
        self.refresh_quote_with(request).await
    }

    /// Fetch a quote with fully explicit parameters.
    ///
    /// Each call supersedes any in-flight fetch: the latest parameters
    /// win, and a response that resolves after a newer fetch was issued is
    /// discarded instead of applied. Returns whether the response was
    /// applied (and the session reset).
    pub async fn refresh_quote_with(&self, request: QuoteRequest) -> Result<bool> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, query = %request.query_string(), "Fetching quote");

        let quote = match self.relay.get_quote(&request).await {
            Ok(quote) => quote,
            Err(e) => {
                // A failed fetch for the current parameters leaves no
                // usable quote; the previous session was for stale
                // parameters and must not stay actionable.
                let mut guard = self.session.write().await;
                if self.generation.load(Ordering::SeqCst) == generation
                    && guard.take().is_some()
                {
                    debug!(generation, "Cleared session after failed quote fetch");
                }
                return Err(e);
            }
        };

        let mut guard = self.session.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding stale quote response");
            return Ok(false);
        }

        self.apply_quote(&mut guard, quote);
        Ok(true)
    }

    fn apply_quote(&self, guard: &mut Option<SigningSession>, quote: Quote) {
        let tokens = &self.config.tokens;
        if tokens.get(&quote.sell_token).is_none() {
            warn!(address = %quote.sell_token, "Sell token not in registry");
        }
        if tokens.get(&quote.buy_token).is_none() {
            warn!(address = %quote.buy_token, "Buy token not in registry");
        }

        let session = SigningSession::new(quote);
        info!(
            session_id = %session.id(),
            sell = %tokens.symbol_or_address(&session.quote().sell_token),
            buy = %tokens.symbol_or_address(&session.quote().buy_token),
            sell_amount = %session.quote().sell_amount,
            buy_amount = %session.quote().buy_amount,
            requires_approval = session.quote().requires_approval(),
            "Quote applied; signing session reset"
        );
        *guard = Some(session);
    }

    /// Drive one signing prompt for a slot.
    ///
    /// Returns `Ok(true)` when a signature was collected and stored,
    /// `Ok(false)` when the prompt was cancelled by the signer or its
    /// result no longer had a session to land in. A malformed signature
    /// is an error; the slot is left `Unsigned` and may be retried.
    pub async fn sign(&self, slot: SigningSlot) -> Result<bool> {
        let (payload, session_id) = {
            let mut guard = self.session.write().await;
            let session = guard.as_mut().ok_or_else(|| Error::QuoteUnavailable {
                detail: "no quote loaded".to_string(),
            })?;
            let request = session.begin_prompt(slot)?;
            (request.eip712, session.id())
        };

        debug!(session_id = %session_id, slot = %slot, "Opening signing prompt");
        let outcome = self.signer.sign_typed_data(&payload).await;

        let mut guard = self.session.write().await;
        let session = match guard.as_mut() {
            Some(session) if session.id() == session_id => session,
            _ => {
                // Quote replaced or flow torn down while the prompt was
                // open; its result must not touch the new session.
                debug!(session_id = %session_id, slot = %slot, "Dropping prompt result for dead session");
                return Ok(false);
            }
        };

        match outcome {
            Ok(raw) => match session.complete_prompt(slot, raw) {
                Ok(()) => {
                    info!(session_id = %session_id, slot = %slot, "Signature collected");
                    Ok(true)
                }
                Err(e) => {
                    warn!(session_id = %session_id, slot = %slot, error = %e, "Rejected signer output");
                    Err(e)
                }
            },
            Err(e) => {
                session.abort_prompt(slot);
                debug!(session_id = %session_id, slot = %slot, error = %e, "Signing prompt declined");
                Ok(false)
            }
        }
    }

    /// Submit the assembled order for the current session.
    ///
    /// Requires the session to be submit-ready and no other submission to
    /// be in flight. A relay failure leaves the session and its
    /// signatures untouched, so the caller can retry without re-signing.
    pub async fn submit(&self) -> Result<String> {
        if self.submit_in_flight.swap(true, Ordering::SeqCst) {
            return Err(Error::SubmissionInFlight);
        }
        let result = self.submit_inner().await;
        self.submit_in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn submit_inner(&self) -> Result<String> {
        let (order, session_id, quote) = {
            let guard = self.session.read().await;
            let session = guard.as_ref().ok_or(Error::IncompleteOrder)?;
            if !session.ready_to_submit() {
                return Err(Error::IncompleteOrder);
            }

            let quote = session.quote();
            let approval = quote
                .approval
                .as_ref()
                .zip(session.raw_signature(SigningSlot::Approval));
            let order = assemble(
                &quote.trade,
                session.raw_signature(SigningSlot::Trade),
                approval,
            )
            .map_err(|e| {
                // A ready session yielding an unassemblable order means a
                // signature the state machine should never have stored.
                error!(session_id = %session.id(), error = %e, "Order assembly invariant violated");
                e
            })?;
            (order, session.id(), quote.clone())
        };

        info!(
            session_id = %session_id,
            has_approval = order.approval.is_some(),
            "Submitting order"
        );
        let trade_hash = self.relay.submit(&order).await.map_err(|e| {
            warn!(session_id = %session_id, error = %e, "Submission failed; session retained");
            e
        })?;

        let report = SwapReport {
            session_id,
            trade_hash: trade_hash.clone(),
            sell_token: quote.sell_token,
            buy_token: quote.buy_token,
            sell_amount: quote.sell_amount,
            buy_amount: quote.buy_amount,
            submitted_at: Utc::now(),
        };
        let _ = self.report_tx.send(report).await;

        Ok(trade_hash)
    }

    /// Abandon the current flow.
    ///
    /// Drops the session and invalidates every in-flight fetch and prompt
    /// so their eventual resolutions are discarded.
    pub async fn teardown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.session.write().await;
        if let Some(session) = guard.take() {
            debug!(session_id = %session.id(), "Session torn down");
        }
    }

    /// The current quote, if one is loaded.
    pub async fn current_quote(&self) -> Option<Quote> {
        self.session.read().await.as_ref().map(|s| s.quote().clone())
    }

    /// Identity of the current session, if one is loaded.
    pub async fn session_id(&self) -> Option<Uuid> {
        self.session.read().await.as_ref().map(|s| s.id())
    }

    /// Whether a slot is satisfied in the current session.
    pub async fn is_signed(&self, slot: SigningSlot) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.is_signed(slot))
    }

    /// Whether the sign affordance should be offered for a slot.
    pub async fn can_prompt(&self, slot: SigningSlot) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.can_prompt(slot))
    }

    /// Whether the current session satisfies the submit invariant.
    pub async fn ready_to_submit(&self) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.ready_to_submit())
    }
}

impl std::fmt::Debug for SwapOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapOrchestrator")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .field(
                "submit_in_flight",
                &self.submit_in_flight.load(Ordering::SeqCst),
            )
            .finish()
    }
}
