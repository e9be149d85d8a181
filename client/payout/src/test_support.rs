//! Scripted in-process [`Gateway`] for tests.
//!
//! Latencies are plain `tokio::time::sleep`s so staleness and double-submit
//! properties can be exercised deterministically under a paused clock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tracing_subscriber::EnvFilter;

use crate::errors::{PayoutError, Result};
use crate::gateway::{Gateway, PayoutSubmission, SaveAccountRequest};
use crate::models::{
    Bank, BeneficiaryAccount, FeeQuote, Kobo, PayoutReceipt, PayoutRecord, PayoutStatus, Wallet,
};

/// Opt-in structured logging for a test run (RUST_LOG controls verbosity).
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A saved-account fixture.
pub fn beneficiary(account_number: &str, bank_code: &str, account_name: &str) -> BeneficiaryAccount {
    BeneficiaryAccount {
        id: format!("ben-{account_number}"),
        bank_code: bank_code.into(),
        bank_name: "GTBank".into(),
        account_number: account_number.into(),
        account_name: account_name.into(),
        is_primary: false,
    }
}

/// A completed ledger-row fixture.
pub fn payout_record(reference: &str, amount: Kobo, created_at: &str) -> PayoutRecord {
    PayoutRecord {
        reference: reference.into(),
        amount,
        bank_code: "058".into(),
        account_number: "0123456789".into(),
        account_name: "ADAEZE OKONKWO".into(),
        status: PayoutStatus::Completed,
        failure_reason: None,
        created_at: created_at
            .parse::<DateTime<Utc>>()
            .expect("fixture timestamp"),
    }
}

#[derive(Default)]
pub struct MockGateway {
    banks: Vec<Bank>,
    /// `(account_number, bank_code)` → resolved name. Unknown pairs are
    /// rejected the way the gateway rejects a not-found account.
    accounts: HashMap<(String, String), String>,
    verify_latency: HashMap<String, Duration>,
    fee_latency: Duration,
    fee_error: Option<String>,
    saved: Mutex<Vec<BeneficiaryAccount>>,
    submit_latency: Duration,
    submit_error: Option<String>,
    history: Vec<PayoutRecord>,
    wallet: Wallet,
    verify_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    save_calls: AtomicUsize,
}

impl MockGateway {
    pub fn with_account(mut self, account_number: &str, bank_code: &str, name: &str) -> Self {
        self.accounts
            .insert((account_number.into(), bank_code.into()), name.into());
        self
    }

    pub fn with_verify_latency(mut self, account_number: &str, latency: Duration) -> Self {
        self.verify_latency.insert(account_number.into(), latency);
        self
    }

    pub fn with_fee_latency(mut self, latency: Duration) -> Self {
        self.fee_latency = latency;
        self
    }

    pub fn with_fee_error(mut self, message: &str) -> Self {
        self.fee_error = Some(message.into());
        self
    }

    pub fn with_saved(self, account: BeneficiaryAccount) -> Self {
        self.saved.lock().unwrap().push(account);
        self
    }

    pub fn with_submit_latency(mut self, latency: Duration) -> Self {
        self.submit_latency = latency;
        self
    }

    pub fn with_submit_error(mut self, message: &str) -> Self {
        self.submit_error = Some(message.into());
        self
    }

    pub fn with_history(mut self, record: PayoutRecord) -> Self {
        self.history.push(record);
        self
    }

    pub fn with_banks(mut self, banks: Vec<Bank>) -> Self {
        self.banks = banks;
        self
    }

    pub fn verify_count(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn submit_count(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn banks(&self) -> Result<Vec<Bank>> {
        Ok(self.banks.clone())
    }

    async fn verify_account(&self, account_number: &str, bank_code: &str) -> Result<String> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.verify_latency.get(account_number) {
            tokio::time::sleep(*latency).await;
        }
        self.accounts
            .get(&(account_number.to_string(), bank_code.to_string()))
            .cloned()
            .ok_or_else(|| PayoutError::Rejected("could not resolve account name".to_string()))
    }

    async fn calculate_fees(&self, amount: Kobo, _account_number: &str) -> Result<FeeQuote> {
        tokio::time::sleep(self.fee_latency).await;
        if let Some(message) = &self.fee_error {
            return Err(PayoutError::Rejected(message.clone()));
        }
        // 1% provider fee, 0.5% platform fee.
        let provider_fee = amount / 100;
        let platform_fee = amount / 200;
        Ok(FeeQuote {
            provider_fee,
            platform_fee,
            net_amount: amount - provider_fee - platform_fee,
            total_deducted: amount,
            is_internal: false,
        })
    }

    async fn saved_accounts(&self) -> Result<Vec<BeneficiaryAccount>> {
        Ok(self.saved.lock().unwrap().clone())
    }

    async fn save_account(&self, req: &SaveAccountRequest) -> Result<BeneficiaryAccount> {
        let n = self.save_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let account = BeneficiaryAccount {
            id: format!("ben-new-{n}"),
            bank_code: req.bank_code.clone(),
            bank_name: req.bank_name.clone(),
            account_number: req.account_number.clone(),
            account_name: req.account_name.clone(),
            is_primary: false,
        };
        self.saved.lock().unwrap().push(account.clone());
        Ok(account)
    }

    async fn submit_payout(&self, req: &PayoutSubmission) -> Result<PayoutReceipt> {
        let n = self.submit_calls.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.submit_latency).await;
        if let Some(message) = &self.submit_error {
            return Err(PayoutError::Rejected(message.clone()));
        }
        Ok(PayoutReceipt {
            reference: format!("TRF-{n:04}"),
            amount: req.amount,
            account_name: req.account_name.clone(),
            bank_name: "GTBank".into(),
            status: PayoutStatus::Pending,
        })
    }

    async fn payout_history(&self) -> Result<Vec<PayoutRecord>> {
        Ok(self.history.clone())
    }

    async fn wallet(&self) -> Result<Wallet> {
        Ok(self.wallet.clone())
    }
}
