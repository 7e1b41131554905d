use tracing::{error, info};

use crate::contract::ApiError;

/// Base URL of the hosted Harness instance.
pub const DEFAULT_BASE_URL: &str = "https://app.harness.io";

/// Connection settings for the Harness API, sourced from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API token, sent as the `x-api-key` header on every request.
    pub api_token: String,
    /// Account identifier, sent as the `accountIdentifier` query parameter.
    pub account_id: String,
    pub base_url: String,
}

impl Settings {
    /// Reads `HARNESS_API_TOKEN` and `HARNESS_ACCT_ID` from the environment.
    /// `HARNESS_BASE_URL` optionally overrides the hosted instance URL.
    pub fn from_env() -> Result<Self, ApiError> {
        let api_token = require_env("HARNESS_API_TOKEN")?;
        let account_id = require_env("HARNESS_ACCT_ID")?;
        let base_url = std::env::var("HARNESS_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Settings {
            api_token,
            account_id,
            base_url,
        })
    }

    pub fn trace_loaded(&self) {
        info!(
            account_id = %self.account_id,
            base_url = %self.base_url,
            token_set = !self.api_token.is_empty(),
            "Loaded Harness settings"
        );
    }
}

fn require_env(name: &str) -> Result<String, ApiError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => {
            error!(variable = name, "Required environment variable is not set");
            Err(format!("{name} environment variable must be set").into())
        }
    }
}
