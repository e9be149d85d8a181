//! Debounced fee quoting for a candidate payout.
//!
//! Same scheduler shape as the account resolver, keyed on
//! `(account_number, amount)`. A quote is only ever requested when a
//! beneficiary is selected and the amount is at or above the 100-kobo floor;
//! anything less clears the quote immediately so an edited amount never
//! shows a stale fee.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::gateway::Gateway;
use crate::models::{BeneficiaryAccount, FeeQuote, Kobo, MIN_PAYOUT_KOBO};

/// The input pair a quote is tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeKey {
    pub account_number: String,
    pub amount: Kobo,
}

/// Lifecycle of the fee quote for the current inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QuoteState {
    /// No quotable input (no beneficiary, or amount below the floor).
    #[default]
    Empty,
    /// A quote request is scheduled or in flight.
    Pending,
    Ready(FeeQuote),
    Failed(String),
}

impl QuoteState {
    pub fn quote(&self) -> Option<&FeeQuote> {
        match self {
            Self::Ready(quote) => Some(quote),
            _ => None,
        }
    }
}

struct EstimatorInner {
    key: Option<FeeKey>,
    state: QuoteState,
    pending: Option<CancellationToken>,
}

/// Reactive fee estimator for the candidate `(beneficiary, amount)` pair.
pub struct FeeEstimator {
    gateway: Arc<dyn Gateway>,
    debounce: Duration,
    inner: Arc<Mutex<EstimatorInner>>,
}

impl FeeEstimator {
    pub fn new(gateway: Arc<dyn Gateway>, debounce: Duration) -> Self {
        Self {
            gateway,
            debounce,
            inner: Arc::new(Mutex::new(EstimatorInner {
                key: None,
                state: QuoteState::Empty,
                pending: None,
            })),
        }
    }

    /// Record an edit to the amount or a beneficiary change.
    ///
    /// Clears the current quote unconditionally, then schedules a new
    /// request when a beneficiary is selected and `amount` is at least
    /// [`MIN_PAYOUT_KOBO`].
    pub async fn edit(
        &self,
        beneficiary: Option<&BeneficiaryAccount>,
        amount: Option<Kobo>,
    ) -> Option<FeeJob> {
        let mut inner = self.inner.lock().await;
        if let Some(token) = inner.pending.take() {
            token.cancel();
        }
        inner.state = QuoteState::Empty;

        let (beneficiary, amount) = match (beneficiary, amount) {
            (Some(b), Some(a)) if a >= MIN_PAYOUT_KOBO => (b, a),
            _ => {
                inner.key = None;
                return None;
            }
        };

        let key = FeeKey {
            account_number: beneficiary.account_number.clone(),
            amount,
        };
        let token = CancellationToken::new();
        inner.key = Some(key.clone());
        inner.state = QuoteState::Pending;
        inner.pending = Some(token.clone());

        Some(FeeJob {
            gateway: Arc::clone(&self.gateway),
            inner: Arc::clone(&self.inner),
            key,
            token,
            debounce: self.debounce,
        })
    }

    /// Drop any quote and cancel scheduled work. Used when the beneficiary
    /// selection changes.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(token) = inner.pending.take() {
            token.cancel();
        }
        inner.key = None;
        inner.state = QuoteState::Empty;
    }

    pub async fn state(&self) -> QuoteState {
        self.inner.lock().await.state.clone()
    }

    pub async fn key(&self) -> Option<FeeKey> {
        self.inner.lock().await.key.clone()
    }
}

/// A scheduled quote request for one specific key. Same contract as
/// [`crate::resolver::ResolveJob`].
pub struct FeeJob {
    gateway: Arc<dyn Gateway>,
    inner: Arc<Mutex<EstimatorInner>>,
    key: FeeKey,
    token: CancellationToken,
    debounce: Duration,
}

impl FeeJob {
    pub async fn run(self) {
        tokio::select! {
            _ = self.token.cancelled() => return,
            _ = tokio::time::sleep(self.debounce) => {}
        }

        let outcome = self
            .gateway
            .calculate_fees(self.key.amount, &self.key.account_number)
            .await;

        let mut inner = self.inner.lock().await;
        if self.token.is_cancelled() {
            debug!(amount = self.key.amount, "discarding stale fee quote");
            return;
        }
        inner.state = match outcome {
            Ok(quote) => QuoteState::Ready(quote),
            Err(e) => QuoteState::Failed(e.to_string()),
        };
        inner.pending = None;
    }
}
