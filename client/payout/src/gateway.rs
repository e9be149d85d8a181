//! Gateway port — the authenticated REST surface the withdrawal page
//! consumes, plus the `reqwest` implementation.
//!
//! Every operation is an idempotent read except `submit_payout`, which moves
//! money and is guarded upstream by the orchestrator's in-flight flag.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::errors::{PayoutError, Result};
use crate::models::{Bank, BeneficiaryAccount, FeeQuote, Kobo, PayoutReceipt, PayoutRecord, Wallet};

// ─────────────────────────────────────────────────────────
// Request wire shapes
// ─────────────────────────────────────────────────────────

/// Body of `POST /payout/saved-accounts`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAccountRequest {
    pub bank_code: String,
    pub bank_name: String,
    pub account_number: String,
    /// Always the gateway-resolved name, never a user-typed value.
    pub account_name: String,
}

/// Body of `POST /payout`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSubmission {
    pub account_number: String,
    pub bank_code: String,
    pub account_name: String,
    /// Kobo.
    pub amount: Kobo,
    pub narration: String,
}

#[derive(Debug, Deserialize)]
struct VerifyAccountResponse {
    #[serde(rename = "accountName")]
    account_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyAccountRequest<'a> {
    account_number: &'a str,
    bank_code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateFeesRequest<'a> {
    /// Kobo.
    amount: Kobo,
    account_number: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ─────────────────────────────────────────────────────────
// Port
// ─────────────────────────────────────────────────────────

/// The remote gateway as seen by this crate.
///
/// Kept behind a trait object so every component runs against an in-process
/// mock in tests.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `GET /banks`
    async fn banks(&self) -> Result<Vec<Bank>>;

    /// `POST /payout/verify-account` — returns the resolved legal account name.
    async fn verify_account(&self, account_number: &str, bank_code: &str) -> Result<String>;

    /// `POST /payout/calculate-fees`
    async fn calculate_fees(&self, amount: Kobo, account_number: &str) -> Result<FeeQuote>;

    /// `GET /payout/saved-accounts`
    async fn saved_accounts(&self) -> Result<Vec<BeneficiaryAccount>>;

    /// `POST /payout/saved-accounts`
    async fn save_account(&self, req: &SaveAccountRequest) -> Result<BeneficiaryAccount>;

    /// `POST /payout` — the only operation with a side effect.
    async fn submit_payout(&self, req: &PayoutSubmission) -> Result<PayoutReceipt>;

    /// `GET /payout/history`
    async fn payout_history(&self) -> Result<Vec<PayoutRecord>>;

    /// `GET /wallet`
    async fn wallet(&self) -> Result<Wallet>;
}

// ─────────────────────────────────────────────────────────
// HTTP implementation
// ─────────────────────────────────────────────────────────

/// Bearer-authenticated `reqwest` implementation of [`Gateway`].
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("GET {path}");
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!("POST {path}");
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

/// Parse a success body, or surface the gateway's error message on a
/// non-2xx response.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let body = response.text().await.unwrap_or_default();
    Err(PayoutError::Rejected(error_message(status.as_u16(), &body)))
}

/// Prefer the gateway's `{"message": …}` payload; fall back to the raw body.
fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) if body.is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {status}: {body}"),
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn banks(&self) -> Result<Vec<Bank>> {
        self.get_json("/banks").await
    }

    async fn verify_account(&self, account_number: &str, bank_code: &str) -> Result<String> {
        let body = VerifyAccountRequest {
            account_number,
            bank_code,
        };
        let resolved: VerifyAccountResponse =
            self.post_json("/payout/verify-account", &body).await?;
        Ok(resolved.account_name)
    }

    async fn calculate_fees(&self, amount: Kobo, account_number: &str) -> Result<FeeQuote> {
        let body = CalculateFeesRequest {
            amount,
            account_number,
        };
        self.post_json("/payout/calculate-fees", &body).await
    }

    async fn saved_accounts(&self) -> Result<Vec<BeneficiaryAccount>> {
        self.get_json("/payout/saved-accounts").await
    }

    async fn save_account(&self, req: &SaveAccountRequest) -> Result<BeneficiaryAccount> {
        self.post_json("/payout/saved-accounts", req).await
    }

    async fn submit_payout(&self, req: &PayoutSubmission) -> Result<PayoutReceipt> {
        self.post_json("/payout", req).await
    }

    async fn payout_history(&self) -> Result<Vec<PayoutRecord>> {
        self.get_json("/payout/history").await
    }

    async fn wallet(&self) -> Result<Wallet> {
        self.get_json("/wallet").await
    }
}
