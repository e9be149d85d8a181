//! Debounced account-name resolution with a last-key-wins policy.
//!
//! Every edit to the account number or bank code resets the visible state to
//! `Unresolved` synchronously and cancels the previous scheduled resolution.
//! A resolution that completes after its token was cancelled is discarded on
//! arrival, so only the response matching the current inputs can transition
//! the state. Cancellation is advisory: the in-flight request itself is not
//! aborted, its result is simply never applied.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::gateway::Gateway;
use crate::models::{Verification, ACCOUNT_NUMBER_LEN};

/// The input pair a resolution attempt is tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountKey {
    pub account_number: String,
    pub bank_code: String,
}

struct ResolverInner {
    key: Option<AccountKey>,
    state: Verification,
    pending: Option<CancellationToken>,
}

/// Reactive resolver for the destination account name.
///
/// Cheap to clone-share via the internal `Arc`; all methods take `&self`.
pub struct AccountResolver {
    gateway: Arc<dyn Gateway>,
    debounce: Duration,
    inner: Arc<Mutex<ResolverInner>>,
}

impl AccountResolver {
    pub fn new(gateway: Arc<dyn Gateway>, debounce: Duration) -> Self {
        Self {
            gateway,
            debounce,
            inner: Arc::new(Mutex::new(ResolverInner {
                key: None,
                state: Verification::Unresolved,
                pending: None,
            })),
        }
    }

    /// Record an edit to either input.
    ///
    /// Always resets the state to `Unresolved` and cancels any scheduled
    /// resolution first, so a stale "verified" badge can never survive new
    /// input. Returns a [`ResolveJob`] to run when the inputs form a
    /// resolvable key (10-digit account number and a chosen bank).
    pub async fn edit(&self, account_number: &str, bank_code: &str) -> Option<ResolveJob> {
        let mut inner = self.inner.lock().await;
        if let Some(token) = inner.pending.take() {
            token.cancel();
        }
        inner.state = Verification::Unresolved;

        if !is_resolvable(account_number, bank_code) {
            inner.key = None;
            return None;
        }

        let key = AccountKey {
            account_number: account_number.to_string(),
            bank_code: bank_code.to_string(),
        };
        let token = CancellationToken::new();
        inner.key = Some(key.clone());
        inner.pending = Some(token.clone());

        Some(ResolveJob {
            gateway: Arc::clone(&self.gateway),
            inner: Arc::clone(&self.inner),
            key,
            token,
            debounce: self.debounce,
        })
    }

    /// The latest verification state for the current inputs.
    pub async fn state(&self) -> Verification {
        self.inner.lock().await.state.clone()
    }

    /// The key the current state belongs to, if any.
    pub async fn key(&self) -> Option<AccountKey> {
        self.inner.lock().await.key.clone()
    }
}

fn is_resolvable(account_number: &str, bank_code: &str) -> bool {
    account_number.len() == ACCOUNT_NUMBER_LEN
        && account_number.bytes().all(|b| b.is_ascii_digit())
        && !bank_code.is_empty()
}

/// A scheduled resolution attempt for one specific key.
///
/// Run it on the caller's runtime (typically `tokio::spawn`). It waits out
/// the debounce window, issues the verify call, and applies the outcome only
/// if no newer edit superseded it in the meantime.
pub struct ResolveJob {
    gateway: Arc<dyn Gateway>,
    inner: Arc<Mutex<ResolverInner>>,
    key: AccountKey,
    token: CancellationToken,
    debounce: Duration,
}

impl ResolveJob {
    pub async fn run(self) {
        tokio::select! {
            _ = self.token.cancelled() => return,
            _ = tokio::time::sleep(self.debounce) => {}
        }

        {
            let mut inner = self.inner.lock().await;
            if self.token.is_cancelled() {
                return;
            }
            inner.state = Verification::Verifying;
        }

        let outcome = self
            .gateway
            .verify_account(&self.key.account_number, &self.key.bank_code)
            .await;

        let mut inner = self.inner.lock().await;
        if self.token.is_cancelled() {
            debug!(
                account_number = %self.key.account_number,
                "discarding stale account resolution"
            );
            return;
        }
        inner.state = match outcome {
            Ok(name) => Verification::Verified(name),
            Err(e) => Verification::Failed(e.to_string()),
        };
        inner.pending = None;
    }
}
