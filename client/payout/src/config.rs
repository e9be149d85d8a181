//! Application configuration loaded from environment variables.

use crate::errors::{PayoutError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the VTPay gateway API (e.g. https://api.vtpay.example)
    pub api_base_url: String,
    /// Bearer token attached to every request
    pub api_token: String,
    /// HTTP client timeout in seconds
    pub http_timeout_secs: u64,
    /// Quiet period after the last account-number/bank edit before the
    /// verify-account call is issued
    pub resolve_debounce_ms: u64,
    /// Quiet period after the last amount edit before the fee call is issued
    pub fee_debounce_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load an optional .env file first (ignored if missing). The crate
        // has no binary entry point of its own, so this happens here.
        let _ = dotenvy::dotenv();

        Ok(Config {
            api_base_url: env_var("VTPAY_API_URL").map_err(|_| {
                PayoutError::Config("VTPAY_API_URL environment variable is required".to_string())
            })?,
            api_token: env_var("VTPAY_API_TOKEN").map_err(|_| {
                PayoutError::Config("VTPAY_API_TOKEN environment variable is required".to_string())
            })?,
            http_timeout_secs: env_var("VTPAY_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| PayoutError::Config("Invalid VTPAY_HTTP_TIMEOUT_SECS".to_string()))?,
            resolve_debounce_ms: env_var("VTPAY_RESOLVE_DEBOUNCE_MS")
                .unwrap_or_else(|_| "800".to_string())
                .parse()
                .map_err(|_| {
                    PayoutError::Config("Invalid VTPAY_RESOLVE_DEBOUNCE_MS".to_string())
                })?,
            fee_debounce_ms: env_var("VTPAY_FEE_DEBOUNCE_MS")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .map_err(|_| PayoutError::Config("Invalid VTPAY_FEE_DEBOUNCE_MS".to_string()))?,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| PayoutError::Config(format!("Missing env var: {key}")))
}
