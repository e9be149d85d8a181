//! Saved destination accounts for payouts.
//!
//! A beneficiary can only be created from a successful account resolution;
//! what gets persisted is the gateway-resolved legal name, never anything
//! the user typed. Accounts are immutable once saved apart from which one
//! is selected.

use std::sync::Arc;

use tracing::info;

use crate::errors::{PayoutError, Result};
use crate::gateway::{Gateway, SaveAccountRequest};
use crate::models::{Bank, BeneficiaryAccount, Verification};

/// Read-through cache of the user's saved accounts plus the active selection.
pub struct BeneficiaryStore {
    gateway: Arc<dyn Gateway>,
    accounts: Vec<BeneficiaryAccount>,
    selected: Option<String>,
}

impl BeneficiaryStore {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            accounts: Vec::new(),
            selected: None,
        }
    }

    /// Fetch the saved accounts and pick the initial selection: the account
    /// flagged primary, else the first returned one. With no saved accounts
    /// the selection stays empty and the caller routes the user to the
    /// add-new-beneficiary path.
    pub async fn load(&mut self) -> Result<()> {
        self.accounts = self.gateway.saved_accounts().await?;
        self.selected = self
            .accounts
            .iter()
            .find(|a| a.is_primary)
            .or_else(|| self.accounts.first())
            .map(|a| a.id.clone());
        Ok(())
    }

    pub fn list(&self) -> &[BeneficiaryAccount] {
        &self.accounts
    }

    pub fn has_any(&self) -> bool {
        !self.accounts.is_empty()
    }

    pub fn selected(&self) -> Option<&BeneficiaryAccount> {
        let id = self.selected.as_deref()?;
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Make `id` the active beneficiary and return it.
    ///
    /// An unknown id leaves the selection untouched. The caller clears the
    /// fee quote on success, since its key includes the destination account.
    pub fn select(&mut self, id: &str) -> Option<&BeneficiaryAccount> {
        if self.accounts.iter().any(|a| a.id == id) {
            self.selected = Some(id.to_string());
        } else {
            return None;
        }
        self.selected()
    }

    /// Clear the active selection, e.g. when the user switches to the
    /// add-new-beneficiary path. The saved accounts themselves stay cached,
    /// so re-selecting later restores the exact same fields without any
    /// re-verification.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Persist a newly verified account and select it.
    ///
    /// Only permitted when the candidate's resolution is `Verified`; the
    /// resolved name is what gets saved.
    pub async fn save_verified(
        &mut self,
        bank: &Bank,
        account_number: &str,
        verification: &Verification,
    ) -> Result<BeneficiaryAccount> {
        let Some(account_name) = verification.verified_name() else {
            return Err(PayoutError::Validation(
                "account must be verified before it can be saved".to_string(),
            ));
        };

        let saved = self
            .gateway
            .save_account(&SaveAccountRequest {
                bank_code: bank.code.clone(),
                bank_name: bank.name.clone(),
                account_number: account_number.to_string(),
                account_name: account_name.to_string(),
            })
            .await?;
        info!(account_number, bank_code = %bank.code, "saved beneficiary");

        self.selected = Some(saved.id.clone());
        self.accounts.push(saved.clone());
        Ok(saved)
    }
}
