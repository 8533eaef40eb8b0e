//! # Currency Resolution
//!
//! Turns an [`AmountField`] into a number for the requested currency.
//!
//! ## Resolution Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AmountField              Requested    FirstListed     Reject          │
//! │  ───────────────────────  ─────────    ───────────     ──────          │
//! │  Fixed(450)               any          450             450             │
//! │  { EUR: 450, USD: 490 }   USD          490             490             │
//! │  { USD: 100, GBP: 80 }    EUR          100 (first)     None            │
//! │  { }                      any          None            None            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is storage of independent price lists. Nothing here converts
//! between currencies.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::types::AmountField;

/// What to do when a per-currency map has no entry for the requested code.
///
/// `FirstListed` charges the first stored entry, whatever its currency.
/// `Reject` treats the miss as a configuration gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyFallback {
    #[default]
    FirstListed,
    Reject,
}

impl std::fmt::Display for CurrencyFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurrencyFallback::FirstListed => write!(f, "first_listed"),
            CurrencyFallback::Reject => write!(f, "reject"),
        }
    }
}

impl std::str::FromStr for CurrencyFallback {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first_listed" | "first" => Ok(CurrencyFallback::FirstListed),
            "reject" | "strict" => Ok(CurrencyFallback::Reject),
            other => Err(SettingsError::UnknownFallback(other.to_string())),
        }
    }
}

/// Resolves a field for `currency` under the given fallback policy.
///
/// Returns `None` when nothing usable is configured; callers decide whether
/// that is a configuration gap.
pub fn resolve_amount(
    field: &AmountField,
    currency: &str,
    fallback: CurrencyFallback,
) -> Option<f64> {
    match field {
        AmountField::Fixed(amount) => Some(*amount),
        AmountField::PerCurrency(prices) => prices.get(currency).or_else(|| match fallback {
            CurrencyFallback::FirstListed => {
                let (code, amount) = prices.first()?;
                tracing::debug!(
                    requested = currency,
                    used = code,
                    "Currency missing from price map, using first listed entry"
                );
                Some(amount)
            }
            CurrencyFallback::Reject => None,
        }),
    }
}

/// Resolves an optional field; an absent field resolves to `None`.
pub fn resolve_optional(
    field: Option<&AmountField>,
    currency: &str,
    fallback: CurrencyFallback,
) -> Option<f64> {
    field.and_then(|f| resolve_amount(f, currency, fallback))
}

// =============================================================================
// Unit Tests
// =============================================================================
