//! # Validation Module
//!
//! Config-time checks for a [`PricingConfig`], run by the settings editor
//! before the organizer's changes are saved.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Settings editor (save)                                                │
//! │  └── THIS MODULE: VAT range, amounts, dates, ids                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Stored PricingConfig (trusted from here on)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Charge path: never re-validates, gaps resolve to 0                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use regfee_core::validation::{validate_pricing_config, validate_vat_percentage};
//! use regfee_core::PricingConfig;
//!
//! assert!(validate_vat_percentage(25.0).is_ok());
//! assert!(validate_vat_percentage(100.0).is_err());
//! assert!(validate_pricing_config(&PricingConfig::default()).is_ok());
//! ```

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::error::{ValidationError, ValidationResult};
use crate::types::{AmountField, PricingConfig};

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a VAT percentage.
///
/// ## Rules
/// - Must be finite
/// - `0 <= pct < 100`
pub fn validate_vat_percentage(value: f64) -> ValidationResult<()> {
    if !value.is_finite() || !(0.0..100.0).contains(&value) {
        return Err(ValidationError::InvalidVatPercentage { value });
    }
    Ok(())
}

/// Validates an ISO 4217 style code: three ASCII letters, any case.
pub fn validate_currency_code(field: &str, code: &str) -> ValidationResult<()> {
    let trimmed = code.trim();
    if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidCurrencyCode {
            field: field.to_string(),
            code: code.to_string(),
        });
    }
    Ok(())
}

fn validate_amount(field: &str, amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::NegativeAmount {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a fixed or per-currency amount.
///
/// Per-currency entries are reported as `field.CODE`.
pub fn validate_amount_field(field: &str, value: &AmountField) -> ValidationResult<()> {
    match value {
        AmountField::Fixed(amount) => validate_amount(field, *amount),
        AmountField::PerCurrency(prices) => {
            for (code, amount) in prices.iter() {
                let entry = format!("{field}.{code}");
                validate_currency_code(&entry, code)?;
                validate_amount(&entry, amount)?;
            }
            Ok(())
        }
    }
}

fn validate_optional(field: &str, value: Option<&AmountField>) -> ValidationResult<()> {
    match value {
        Some(value) => validate_amount_field(field, value),
        None => Ok(()),
    }
}

fn validate_order(
    field: &str,
    first: Option<DateTime<Utc>>,
    second: Option<DateTime<Utc>>,
    reason: &str,
) -> ValidationResult<()> {
    if let (Some(first), Some(second)) = (first, second) {
        if first > second {
            return Err(ValidationError::InvalidDateRange {
                field: field.to_string(),
                reason: reason.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_ids<'a>(field: &str, ids: impl Iterator<Item = &'a str>) -> ValidationResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        let id = id.trim();
        if id.is_empty() {
            return Err(ValidationError::EmptyId {
                field: field.to_string(),
            });
        }
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                field: field.to_string(),
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Config Validator
// =============================================================================

/// Validates a whole pricing config, stopping at the first problem.
///
/// ## Checks
/// ```text
/// currency              three-letter code, when present and not blank
/// vat_percentage        0 <= pct < 100
/// every amount          finite and >= 0, per-currency codes well formed
/// regular window        start_date <= end_date
/// early bird vs late    deadline <= late.start_date
/// fee types / fields    ids non-empty and unique
/// ```
pub fn validate_pricing_config(config: &PricingConfig) -> ValidationResult<()> {
    if let Some(code) = config.currency.as_deref().filter(|c| !c.trim().is_empty()) {
        validate_currency_code("currency", code)?;
    }

    if let Some(pct) = config.vat_percentage {
        validate_vat_percentage(pct)?;
    }

    validate_optional("early_bird.amount", config.early_bird.amount.as_ref())?;
    validate_optional("regular.amount", config.regular.amount.as_ref())?;
    validate_optional("late.amount", config.late.amount.as_ref())?;
    validate_optional("student_discount", config.student_discount.as_ref())?;
    validate_optional("student_price", config.student_price.as_ref())?;
    validate_optional(
        "accompanying_person_price",
        config.accompanying_person_price.as_ref(),
    )?;

    validate_order(
        "regular",
        config.regular.start_date,
        config.regular.end_date,
        "start_date is after end_date",
    )?;
    validate_order(
        "late",
        config.early_bird.deadline,
        config.late.start_date,
        "late pricing starts before the early bird deadline",
    )?;

    validate_ids(
        "custom_fee_types",
        config.custom_fee_types.iter().map(|f| f.id.as_str()),
    )?;
    for fee_type in &config.custom_fee_types {
        let prefix = format!("custom_fee_types[{}]", fee_type.id);
        validate_optional(&format!("{prefix}.amount"), fee_type.amount.as_ref())?;
        validate_optional(&format!("{prefix}.early_bird"), fee_type.early_bird.as_ref())?;
        validate_optional(&format!("{prefix}.regular"), fee_type.regular.as_ref())?;
        validate_optional(&format!("{prefix}.late"), fee_type.late.as_ref())?;
    }

    validate_ids(
        "custom_fields",
        config.custom_fields.iter().map(|f| f.id.as_str()),
    )?;
    for field in &config.custom_fields {
        validate_optional(&format!("custom_fields[{}].value", field.id), field.value.as_ref())?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
