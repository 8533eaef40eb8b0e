//! # Settings Loading
//!
//! Builds [`EngineSettings`] for the CLI.
//!
//! ## Load Order (later overrides earlier)
//! 1. Default values
//! 2. Settings file (`--settings`, else `<config dir>/settings.toml`)
//! 3. Environment variables
//!
//! | Variable                         | Setting                   |
//! |----------------------------------|---------------------------|
//! | `REGFEE_DEFAULT_CURRENCY`        | `default_currency`        |
//! | `REGFEE_TAMPER_EPSILON`          | `tamper_epsilon`          |
//! | `REGFEE_CURRENCY_FALLBACK`       | `currency_fallback`       |
//! | `REGFEE_LAST_MINUTE_WINDOW_DAYS` | `last_minute_window_days` |

use std::path::{Path, PathBuf};

use regfee_core::{CurrencyFallback, EngineSettings};
use tracing::{debug, info, warn};

use crate::error::{QuoteError, QuoteResult};

/// Loads settings from file and environment, then validates them.
pub fn load_settings(settings_path: Option<PathBuf>) -> QuoteResult<EngineSettings> {
    let explicit = settings_path.is_some();
    let mut settings = EngineSettings::default();

    if let Some(path) = settings_path.or_else(default_settings_path) {
        if explicit || path.exists() {
            info!(?path, "Loading engine settings from file");
            settings = read_settings_file(&path)?;
        } else {
            debug!(?path, "Settings file not found, using defaults");
        }
    }

    apply_overrides(&mut settings, |key| std::env::var(key).ok())?;

    settings.validate()?;
    Ok(settings)
}

fn read_settings_file(path: &Path) -> QuoteResult<EngineSettings> {
    let contents = std::fs::read_to_string(path).map_err(|source| QuoteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&contents)?)
}

/// Applies `REGFEE_*` overrides read through `lookup`.
///
/// Numbers that fail to parse are logged and ignored. An unknown fallback
/// policy is an error.
pub fn apply_overrides<F>(settings: &mut EngineSettings, lookup: F) -> QuoteResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(code) = lookup("REGFEE_DEFAULT_CURRENCY") {
        debug!(currency = %code, "Overriding default currency from environment");
        settings.default_currency = code.trim().to_uppercase();
    }

    if let Some(raw) = lookup("REGFEE_TAMPER_EPSILON") {
        match raw.trim().parse::<f64>() {
            Ok(epsilon) => settings.tamper_epsilon = epsilon,
            Err(_) => warn!(value = %raw, "Ignoring unparsable REGFEE_TAMPER_EPSILON"),
        }
    }

    if let Some(raw) = lookup("REGFEE_CURRENCY_FALLBACK") {
        let policy: CurrencyFallback = raw.parse()?;
        debug!(%policy, "Overriding currency fallback from environment");
        settings.currency_fallback = policy;
    }

    if let Some(raw) = lookup("REGFEE_LAST_MINUTE_WINDOW_DAYS") {
        match raw.trim().parse::<i64>() {
            Ok(days) => settings.last_minute_window_days = days,
            Err(_) => warn!(value = %raw, "Ignoring unparsable REGFEE_LAST_MINUTE_WINDOW_DAYS"),
        }
    }

    Ok(())
}

fn default_settings_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "regfee", "regfee")
        .map(|dirs| dirs.config_dir().join("settings.toml"))
}
