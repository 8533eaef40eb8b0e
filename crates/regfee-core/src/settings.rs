//! # Engine Settings
//!
//! Tunables for the fee engine. These are deployment settings, not pricing:
//! organizers never edit them.
//!
//! ## Settings File Format
//! ```toml
//! # regfee.toml
//! default_currency = "EUR"
//! tamper_epsilon = 0.01
//! currency_fallback = "first_listed"   # first_listed | reject
//! last_minute_window_days = 14
//! ```
//!
//! Loading from files and the environment is the caller's job; this crate
//! only defines the shape, the defaults and validation.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::currency::CurrencyFallback;
use crate::error::{SettingsError, SettingsResult};
use crate::{DEFAULT_CURRENCY, LAST_MINUTE_WINDOW_DAYS, TAMPER_EPSILON};

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Currency used when a pricing config names none.
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Largest accepted difference between a client amount and the
    /// recomputed charge.
    #[serde(default = "default_tamper_epsilon")]
    pub tamper_epsilon: f64,

    /// Behavior when a per-currency map lacks the requested currency.
    #[serde(default)]
    pub currency_fallback: CurrencyFallback,

    /// Days before the conference start treated as late when no explicit
    /// late tier exists.
    #[serde(default = "default_last_minute_window_days")]
    pub last_minute_window_days: i64,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_tamper_epsilon() -> f64 {
    TAMPER_EPSILON
}

fn default_last_minute_window_days() -> i64 {
    LAST_MINUTE_WINDOW_DAYS
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            default_currency: default_currency(),
            tamper_epsilon: default_tamper_epsilon(),
            currency_fallback: CurrencyFallback::default(),
            last_minute_window_days: default_last_minute_window_days(),
        }
    }
}

impl EngineSettings {
    /// Validates the settings.
    pub fn validate(&self) -> SettingsResult<()> {
        let code = self.default_currency.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(SettingsError::Invalid {
                field: "default_currency".into(),
                reason: format!("'{}' is not a three-letter currency code", self.default_currency),
            });
        }

        if !self.tamper_epsilon.is_finite() || self.tamper_epsilon < 0.0 {
            return Err(SettingsError::Invalid {
                field: "tamper_epsilon".into(),
                reason: "must be a non-negative number".into(),
            });
        }

        // Bounded so Duration::days can never overflow
        if !(0..=3650).contains(&self.last_minute_window_days) {
            return Err(SettingsError::Invalid {
                field: "last_minute_window_days".into(),
                reason: "must be between 0 and 3650".into(),
            });
        }

        Ok(())
    }

    /// The last-minute window as a duration.
    pub fn last_minute_window(&self) -> Duration {
        Duration::days(self.last_minute_window_days.clamp(0, 3650))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = EngineSettings::default();
        assert_eq!(settings.default_currency, "EUR");
        assert_eq!(settings.tamper_epsilon, 0.01);
        assert_eq!(settings.currency_fallback, CurrencyFallback::FirstListed);
        assert_eq!(settings.last_minute_window(), Duration::days(14));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: EngineSettings = from_json(r#"{ "currency_fallback": "reject" }"#);
        assert_eq!(settings.currency_fallback, CurrencyFallback::Reject);
        assert_eq!(settings.default_currency, "EUR");
        assert_eq!(settings.last_minute_window_days, 14);
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = EngineSettings::default();

        settings.default_currency = "EURO".into();
        assert!(settings.validate().is_err());

        settings.default_currency = "usd".into();
        assert!(settings.validate().is_ok());

        settings.tamper_epsilon = -0.5;
        assert!(settings.validate().is_err());

        settings.tamper_epsilon = 0.0;
        settings.last_minute_window_days = -1;
        assert!(settings.validate().is_err());
    }

    fn from_json(json: &str) -> EngineSettings {
        serde_json::from_str(json).unwrap()
    }
}
