use crate::model::INITIAL_ACCOUNT_BALANCE;
use crate::registration::{AccountNumberPolicy, ProvisioningPolicy};
use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub account_number_policy: AccountNumberPolicy,
    /// Let the profile store refuse a second profile for the same phone.
    pub enforce_unique_phone: bool,
    /// Delete an identity whose profile could not be written.
    pub compensate_partial_failures: bool,
    pub initial_balance: f64,
    pub mailbox_buffer: usize,
    /// Directory of the file-backed session cache; in-memory when unset.
    pub session_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            account_number_policy: AccountNumberPolicy::FixedOffset,
            enforce_unique_phone: true,
            compensate_partial_failures: true,
            initial_balance: INITIAL_ACCOUNT_BALANCE,
            mailbox_buffer: 32,
            session_dir: None,
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("{} must be a boolean, got {:?}", name, other)),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let account_number_policy = match lookup("BANKIFY_ACCOUNT_NUMBER_POLICY") {
            Some(v) => v
                .parse()
                .map_err(|e: String| anyhow!(e))
                .context("BANKIFY_ACCOUNT_NUMBER_POLICY must be fixed-offset or country-code")?,
            None => defaults.account_number_policy,
        };
        let enforce_unique_phone = match lookup("BANKIFY_ENFORCE_UNIQUE_PHONE") {
            Some(v) => parse_flag("BANKIFY_ENFORCE_UNIQUE_PHONE", &v)?,
            None => defaults.enforce_unique_phone,
        };
        let compensate_partial_failures = match lookup("BANKIFY_COMPENSATE_PARTIAL_FAILURES") {
            Some(v) => parse_flag("BANKIFY_COMPENSATE_PARTIAL_FAILURES", &v)?,
            None => defaults.compensate_partial_failures,
        };
        let initial_balance = match lookup("BANKIFY_INITIAL_BALANCE") {
            Some(v) => v
                .trim()
                .parse()
                .context("BANKIFY_INITIAL_BALANCE must be a number")?,
            None => defaults.initial_balance,
        };
        let mailbox_buffer: usize = match lookup("BANKIFY_MAILBOX_BUFFER") {
            Some(v) => v
                .trim()
                .parse()
                .context("BANKIFY_MAILBOX_BUFFER must be a positive integer")?,
            None => defaults.mailbox_buffer,
        };
        if mailbox_buffer == 0 {
            return Err(anyhow!("BANKIFY_MAILBOX_BUFFER must be a positive integer"));
        }

        Ok(Self {
            account_number_policy,
            enforce_unique_phone,
            compensate_partial_failures,
            initial_balance,
            mailbox_buffer,
            session_dir: lookup("BANKIFY_SESSION_DIR").map(PathBuf::from),
        })
    }

    pub fn provisioning_policy(&self) -> ProvisioningPolicy {
        ProvisioningPolicy {
            account_numbers: self.account_number_policy,
            compensate: self.compensate_partial_failures,
            initial_balance: self.initial_balance,
        }
    }
}
