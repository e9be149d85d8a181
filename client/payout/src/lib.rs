//! VTPay withdrawal client.
//!
//! The logic layer of the dashboard's withdrawal page: resolves destination
//! bank accounts, quotes transfer fees, and drives a payout draft through
//! review, confirmation, and submission against the VTPay gateway API.
//!
//! The workflow is event-driven and cooperative: user edits feed the
//! debounced [`resolver::AccountResolver`] and [`fees::FeeEstimator`], the
//! [`transfer::TransferOrchestrator`] gates review on their latest results
//! and owns the single in-flight submission, and a settled payout
//! invalidates the wallet and [`history::PayoutHistoryFeed`] read models for
//! re-fetch. All monetary amounts are kobo end to end; display formatting is
//! the one place that converts.

pub mod banks;
pub mod beneficiaries;
pub mod config;
pub mod errors;
pub mod fees;
pub mod gateway;
pub mod history;
pub mod models;
pub mod resolver;
pub mod transfer;

#[cfg(test)]
pub(crate) mod test_support;

pub use banks::BankDirectory;
pub use beneficiaries::BeneficiaryStore;
pub use config::Config;
pub use errors::{DraftError, PayoutError, Result};
pub use fees::{FeeEstimator, QuoteState};
pub use gateway::{Gateway, HttpGateway};
pub use history::PayoutHistoryFeed;
pub use models::{
    Bank, BeneficiaryAccount, FeeQuote, Kobo, PayoutReceipt, PayoutRecord, PayoutStatus,
    Verification, Wallet, MIN_PAYOUT_KOBO,
};
pub use resolver::AccountResolver;
pub use transfer::{ConfirmOutcome, Invalidations, TransferDraft, TransferOrchestrator, TransferState};
