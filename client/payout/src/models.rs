//! Domain types shared across the withdrawal workflow.
//!
//! All monetary fields are in kobo (minor currency units). The gateway keeps
//! them in kobo on the wire too; [`kobo_to_naira`] is the only place in this
//! crate that divides by 100.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minor currency units (kobo).
pub type Kobo = u64;

/// Smallest amount the gateway will pay out, in kobo.
pub const MIN_PAYOUT_KOBO: Kobo = 100;

/// Saved destination accounts carry 10-digit NUBAN account numbers.
pub const ACCOUNT_NUMBER_LEN: usize = 10;

/// Wallet balances as returned by `GET /wallet`.
///
/// Field names on the wire are historical (`…Naira`); the values are kobo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Wallet {
    #[serde(rename = "balanceNaira")]
    pub total_balance: Kobo,
    /// Portion eligible for immediate withdrawal.
    #[serde(rename = "clearedBalanceNaira")]
    pub cleared_balance: Kobo,
    /// Funds reserved against in-flight payouts.
    #[serde(rename = "lockedBalanceNaira")]
    pub locked_balance: Kobo,
}

/// One entry of the bank directory (`GET /banks`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub code: String,
    pub name: String,
    #[serde(rename = "bankUrl", skip_serializing_if = "Option::is_none")]
    pub bank_url: Option<String>,
}

/// A saved destination account for payouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryAccount {
    pub id: String,
    pub bank_code: String,
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Outcome of resolving an `(account_number, bank_code)` pair.
///
/// Ephemeral and derived; superseded whenever either input changes. The UI
/// must never show a resolved name for an unverified pair, so any edit
/// resets this to `Unresolved` before a new resolution is scheduled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Verification {
    #[default]
    Unresolved,
    Verifying,
    Verified(String),
    Failed(String),
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified(_))
    }

    /// The resolved legal account name, if verification succeeded.
    pub fn verified_name(&self) -> Option<&str> {
        match self {
            Self::Verified(name) => Some(name),
            _ => None,
        }
    }
}

/// Fee breakdown for a candidate payout (`POST /payout/calculate-fees`).
///
/// Both `net_amount` and `total_deducted` are kept exactly as the gateway
/// sent them; the crate never derives one from the other.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeeQuote {
    #[serde(rename = "providerFee")]
    pub provider_fee: Kobo,
    #[serde(rename = "vtpayFee")]
    pub platform_fee: Kobo,
    #[serde(rename = "netAmount")]
    pub net_amount: Kobo,
    #[serde(rename = "totalDeducted")]
    pub total_deducted: Kobo,
    #[serde(rename = "isInternal")]
    pub is_internal: bool,
}

/// Server-side lifecycle of a payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PayoutStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// One row of the payout ledger (`GET /payout/history`). Server-authoritative
/// and append-only; the client only ever re-fetches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRecord {
    pub reference: String,
    /// Requested amount in kobo.
    pub amount: Kobo,
    pub bank_code: String,
    pub account_number: String,
    pub account_name: String,
    pub status: PayoutStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Summary returned by a successful `POST /payout`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutReceipt {
    pub reference: String,
    pub amount: Kobo,
    pub account_name: String,
    pub bank_name: String,
    pub status: PayoutStatus,
}

/// Format a kobo amount as a naira string for display.
///
/// Display boundary: the single ÷100 in the crate.
pub fn kobo_to_naira(minor: Kobo) -> String {
    format!("₦{}.{:02}", minor / 100, minor % 100)
}
