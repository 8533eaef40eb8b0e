//! # Quote Error Type
//!
//! Everything that can stop the CLI, wrapped into one enum so `main` has a
//! single place to report failures.
//!
//! ```text
//! std::io::Error        ──┐
//! serde_json::Error     ──┤
//! toml::de::Error       ──┼──► QuoteError ──► stderr + exit code 1
//! SettingsError         ──┤
//! ValidationError       ──┤
//! ChargeError           ──┘
//! ```

use std::path::PathBuf;

use regfee_core::{ChargeError, SettingsError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid pricing config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Pricing config failed validation: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Charge(#[from] ChargeError),

    /// `--now` or `--conference-start` could not be parsed.
    #[error("Invalid date for {flag}: '{value}' (expected RFC 3339 or YYYY-MM-DD)")]
    InvalidDate { flag: &'static str, value: String },
}

pub type QuoteResult<T> = Result<T, QuoteError>;
