//! Cached bank directory.
//!
//! Loaded once from `GET /banks`; every lookup after that is synchronous.

use std::collections::HashMap;

use tracing::info;

use crate::errors::Result;
use crate::gateway::Gateway;
use crate::models::Bank;

pub struct BankDirectory {
    banks: Vec<Bank>,
    by_code: HashMap<String, usize>,
}

impl BankDirectory {
    /// Fetch the directory from the gateway.
    pub async fn load(gateway: &dyn Gateway) -> Result<Self> {
        let banks = gateway.banks().await?;
        info!(count = banks.len(), "loaded bank directory");
        Ok(Self::from_banks(banks))
    }

    fn from_banks(banks: Vec<Bank>) -> Self {
        let mut by_code = HashMap::with_capacity(banks.len());
        for (i, bank) in banks.iter().enumerate() {
            // First entry wins on duplicate codes.
            by_code.entry(bank.code.clone()).or_insert(i);
        }
        Self { banks, by_code }
    }

    pub fn get(&self, code: &str) -> Option<&Bank> {
        self.by_code.get(code).map(|&i| &self.banks[i])
    }

    /// Display name for a code, falling back to the raw code when the
    /// gateway lists an account at a bank the directory does not know.
    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).map(|b| b.name.as_str()).unwrap_or(code)
    }

    pub fn all(&self) -> &[Bank] {
        &self.banks
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }
}
