// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::{
    self, BPS_BASE, CHAIN_ETHEREUM, DEFAULT_LOG_LEVEL, PERMIT_EXPIRATION_SECS,
    PERMIT_SIG_DEADLINE_SECS, REPAY_MARGIN_BPS,
};
use crate::domain::error::AppError;
use crate::infrastructure::data::address_book::AddressBook;
use crate::services::logics::permit2::allowance::PermitWindows;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalSettings {
    // General
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    #[serde(default)]
    pub http_provider: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_json: bool,

    // Addresses
    pub address_book_path: Option<String>,

    // Permits
    #[serde(default = "default_permit_expiration_secs")]
    pub permit_expiration_secs: u64,
    #[serde(default = "default_permit_sig_deadline_secs")]
    pub permit_sig_deadline_secs: u64,

    // Quotes
    #[serde(default = "default_repay_margin_bps")]
    pub repay_margin_bps: u16,

    // Remote token lists
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_chain_id() -> u64 {
    CHAIN_ETHEREUM
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_permit_expiration_secs() -> u64 {
    PERMIT_EXPIRATION_SECS
}
fn default_permit_sig_deadline_secs() -> u64 {
    PERMIT_SIG_DEADLINE_SECS
}
fn default_repay_margin_bps() -> u16 {
    REPAY_MARGIN_BPS
}
fn default_http_timeout_secs() -> u64 {
    10
}

impl GlobalSettings {
    pub fn load_with_path(path: Option<&str>) -> Result<Self, AppError> {
        let settings = Self::load_unvalidated(path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads without validating, so CLI overrides can be applied first.
    pub fn load_unvalidated(path: Option<&str>) -> Result<Self, AppError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(selected_path) = path {
            builder = builder.add_source(File::from(Path::new(selected_path)).required(true));
        } else {
            builder = builder.add_source(File::with_name("config").required(false));
        }
        // Precedence: CLI (in main) > env/.env > config file.
        builder = builder.add_source(Environment::default());

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn load() -> Result<Self, AppError> {
        Self::load_with_path(None)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !constants::is_supported_chain(self.chain_id) {
            return Err(AppError::Validation {
                field: "chain_id".into(),
                message: format!("chain {} is not supported", self.chain_id),
            });
        }
        if self.http_provider.trim().is_empty() {
            return Err(AppError::Config("HTTP_PROVIDER is missing".to_string()));
        }
        Url::parse(self.http_provider.trim())
            .map_err(|e| AppError::Config(format!("Invalid HTTP_PROVIDER: {e}")))?;
        if self.permit_sig_deadline_secs >= self.permit_expiration_secs {
            return Err(AppError::Validation {
                field: "permit_sig_deadline_secs".into(),
                message: format!(
                    "{} must be shorter than permit_expiration_secs ({})",
                    self.permit_sig_deadline_secs, self.permit_expiration_secs
                ),
            });
        }
        if self.repay_margin_bps > BPS_BASE {
            return Err(AppError::Validation {
                field: "repay_margin_bps".into(),
                message: format!("{} exceeds {BPS_BASE}", self.repay_margin_bps),
            });
        }
        if self.http_timeout_secs == 0 {
            return Err(AppError::Validation {
                field: "http_timeout_secs".into(),
                message: "must be positive".into(),
            });
        }
        Ok(())
    }

    pub fn permit_windows(&self) -> PermitWindows {
        PermitWindows {
            expiration_secs: self.permit_expiration_secs,
            sig_deadline_secs: self.permit_sig_deadline_secs,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Built-in defaults, layered with the configured override file when set.
    pub fn address_book(&self) -> Result<AddressBook, AppError> {
        match self
            .address_book_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            Some(path) => AddressBook::load_from_file(path),
            None => Ok(AddressBook::with_defaults(&[self.chain_id])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings() -> GlobalSettings {
        GlobalSettings {
            chain_id: default_chain_id(),
            http_provider: "http://127.0.0.1:8545".to_string(),
            log_level: default_log_level(),
            log_json: false,
            address_book_path: None,
            permit_expiration_secs: default_permit_expiration_secs(),
            permit_sig_deadline_secs: default_permit_sig_deadline_secs(),
            repay_margin_bps: default_repay_margin_bps(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }

    #[test]
    fn defaults_validate() {
        assert!(base_settings().validate().is_ok());
        assert_eq!(base_settings().permit_windows(), PermitWindows::default());
    }

    #[test]
    fn sig_deadline_must_be_shorter_than_expiration() {
        let mut settings = base_settings();
        settings.permit_sig_deadline_secs = settings.permit_expiration_secs;
        assert!(matches!(
            settings.validate(),
            Err(AppError::Validation { ref field, .. }) if field == "permit_sig_deadline_secs"
        ));
    }

    #[test]
    fn margin_and_provider_are_checked() {
        let mut settings = base_settings();
        settings.repay_margin_bps = BPS_BASE + 1;
        assert!(settings.validate().is_err());

        let mut settings = base_settings();
        settings.http_provider = "  ".to_string();
        assert!(matches!(settings.validate(), Err(AppError::Config(_))));

        let mut settings = base_settings();
        settings.chain_id = 5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn missing_address_book_path_uses_defaults() {
        let book = base_settings().address_book().expect("defaults");
        assert!(book.chain(CHAIN_ETHEREUM).aave_v3_pool.is_some());
    }
}
