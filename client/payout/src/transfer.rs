//! The withdrawal state machine.
//!
//! One tagged enum replaces the pile of independent loading/editing/
//! confirming flags the workflow would otherwise need, so illegal
//! combinations ("submitting" while still "drafting") are unrepresentable.
//! The single in-flight flag makes `POST /payout` fire at most once per
//! confirm action: it is set inside the same lock acquisition that validates
//! the `Confirming` state, before the network call is issued, and cleared
//! only in the terminal handlers.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::DraftError;
use crate::gateway::{Gateway, PayoutSubmission};
use crate::models::{BeneficiaryAccount, Kobo, PayoutReceipt, Wallet, MIN_PAYOUT_KOBO};

/// Where the current draft is in its lifecycle.
///
/// `Settled` and `Failed` are terminal for the draft; the next edit starts
/// drafting again.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TransferState {
    /// No draft yet. Only ever observed before the first edit; a draft that
    /// settled or failed moves straight to `Drafting` on the next edit.
    #[default]
    Idle,
    Drafting,
    Reviewing,
    Confirming,
    Submitting,
    Settled(PayoutReceipt),
    Failed(String),
}

/// The in-progress withdrawal draft.
///
/// `amount_raw` is the user's input kept verbatim, denominated in kobo; it
/// is preserved across a failed submission so nothing has to be retyped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferDraft {
    pub amount_raw: String,
    pub narration: String,
    pub beneficiary: Option<BeneficiaryAccount>,
}

impl TransferDraft {
    /// The amount as kobo, if the raw input parses at all.
    pub fn parsed_amount(&self) -> Option<Kobo> {
        self.amount_raw.trim().parse().ok()
    }

    fn submission(&self) -> Option<PayoutSubmission> {
        let beneficiary = self.beneficiary.as_ref()?;
        let amount = self.parsed_amount()?;
        Some(PayoutSubmission {
            account_number: beneficiary.account_number.clone(),
            bank_code: beneficiary.bank_code.clone(),
            account_name: beneficiary.account_name.clone(),
            amount,
            narration: self.narration.clone(),
        })
    }
}

/// Read models that must be re-fetched after a settled submission.
///
/// The wallet is never decremented locally; raising these flags and
/// re-fetching is what keeps the client out of any read-modify-write race
/// with server-side settlement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Invalidations {
    pub wallet: bool,
    pub history: bool,
}

/// Result of one confirm action.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    Submitted(PayoutReceipt),
    /// The gateway rejected the payout; the draft is preserved.
    Rejected(String),
    /// The machine was not in `Confirming`, or the draft is incomplete.
    NotConfirmable,
    /// A submission for this draft is already in flight; this click is a no-op.
    InFlight,
}

struct OrchestratorInner {
    state: TransferState,
    draft: TransferDraft,
    in_flight: bool,
    invalidations: Invalidations,
}

/// Drives a draft from first edit to a settled or failed payout.
#[derive(Clone)]
pub struct TransferOrchestrator {
    gateway: Arc<dyn Gateway>,
    inner: Arc<Mutex<OrchestratorInner>>,
}

impl TransferOrchestrator {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            inner: Arc::new(Mutex::new(OrchestratorInner {
                state: TransferState::Idle,
                draft: TransferDraft::default(),
                in_flight: false,
                invalidations: Invalidations::default(),
            })),
        }
    }

    /// Edit the amount field. Ignored while a submission is in flight.
    pub async fn edit_amount(&self, raw: &str) {
        let mut inner = self.inner.lock().await;
        if matches!(inner.state, TransferState::Submitting) {
            return;
        }
        inner.draft.amount_raw = raw.trim().to_string();
        inner.state = TransferState::Drafting;
    }

    /// Edit the free-text narration. Ignored while a submission is in flight.
    pub async fn edit_narration(&self, raw: &str) {
        let mut inner = self.inner.lock().await;
        if matches!(inner.state, TransferState::Submitting) {
            return;
        }
        inner.draft.narration = raw.to_string();
        inner.state = TransferState::Drafting;
    }

    /// Select the destination account. Ignored while a submission is in
    /// flight. The caller clears the fee quote alongside (the fee key
    /// changes with the beneficiary).
    pub async fn select_beneficiary(&self, beneficiary: BeneficiaryAccount) {
        let mut inner = self.inner.lock().await;
        if matches!(inner.state, TransferState::Submitting) {
            return;
        }
        inner.draft.beneficiary = Some(beneficiary);
        inner.state = TransferState::Drafting;
    }

    /// `Drafting → Reviewing`, guarded by local validation only. A failed
    /// guard keeps the machine in `Drafting` and returns the field error;
    /// no network call is made either way.
    pub async fn request_review(&self, wallet: &Wallet) -> Result<(), DraftError> {
        let mut inner = self.inner.lock().await;
        if let Err(e) = validate_draft(&inner.draft, wallet) {
            inner.state = TransferState::Drafting;
            return Err(e);
        }
        inner.state = TransferState::Reviewing;
        Ok(())
    }

    /// `Reviewing → Confirming`. Presentation-only; returns whether the
    /// transition happened.
    pub async fn open_confirmation(&self) -> bool {
        let mut inner = self.inner.lock().await;
        if matches!(inner.state, TransferState::Reviewing) {
            inner.state = TransferState::Confirming;
            true
        } else {
            false
        }
    }

    /// Back out of review or confirmation without submitting.
    pub async fn cancel_review(&self) {
        let mut inner = self.inner.lock().await;
        if matches!(
            inner.state,
            TransferState::Reviewing | TransferState::Confirming
        ) {
            inner.state = TransferState::Drafting;
        }
    }

    /// `Confirming → Submitting → Settled | Failed`.
    ///
    /// At most one submission per draft can be in flight: the flag is
    /// checked and set under the lock before the call goes out, so
    /// re-entrant confirm clicks observe it and return [`ConfirmOutcome::InFlight`].
    pub async fn confirm(&self) -> ConfirmOutcome {
        let submission = {
            let mut inner = self.inner.lock().await;
            if inner.in_flight {
                return ConfirmOutcome::InFlight;
            }
            if !matches!(inner.state, TransferState::Confirming) {
                return ConfirmOutcome::NotConfirmable;
            }
            let Some(submission) = inner.draft.submission() else {
                return ConfirmOutcome::NotConfirmable;
            };
            inner.in_flight = true;
            inner.state = TransferState::Submitting;
            submission
        };

        info!(
            amount = submission.amount,
            bank_code = %submission.bank_code,
            "submitting payout"
        );
        let result = self.gateway.submit_payout(&submission).await;

        let mut inner = self.inner.lock().await;
        inner.in_flight = false;
        match result {
            Ok(receipt) => {
                info!(reference = %receipt.reference, "payout accepted");
                // Draft is spent: amount and narration reset, the selected
                // beneficiary stays for the next withdrawal.
                inner.draft.amount_raw.clear();
                inner.draft.narration.clear();
                inner.invalidations.wallet = true;
                inner.invalidations.history = true;
                inner.state = TransferState::Settled(receipt.clone());
                ConfirmOutcome::Submitted(receipt)
            }
            Err(e) => {
                warn!("payout rejected: {e}");
                let reason = e.to_string();
                inner.state = TransferState::Failed(reason.clone());
                ConfirmOutcome::Rejected(reason)
            }
        }
    }

    pub async fn state(&self) -> TransferState {
        self.inner.lock().await.state.clone()
    }

    pub async fn draft(&self) -> TransferDraft {
        self.inner.lock().await.draft.clone()
    }

    /// Hand back the pending refresh flags, resetting them. Issued only
    /// after a `Settled` transition, never speculatively.
    pub async fn take_invalidations(&self) -> Invalidations {
        let mut inner = self.inner.lock().await;
        std::mem::take(&mut inner.invalidations)
    }
}

/// The review guards of the state machine, checked in field order.
fn validate_draft(draft: &TransferDraft, wallet: &Wallet) -> Result<(), DraftError> {
    let amount = match draft.parsed_amount() {
        None | Some(0) => return Err(DraftError::AmountInvalid),
        Some(a) => a,
    };
    if amount < MIN_PAYOUT_KOBO {
        return Err(DraftError::AmountBelowFloor(MIN_PAYOUT_KOBO));
    }
    if amount > wallet.cleared_balance {
        return Err(DraftError::AmountExceedsCleared);
    }
    if draft.beneficiary.is_none() {
        return Err(DraftError::NoBeneficiary);
    }
    Ok(())
}
