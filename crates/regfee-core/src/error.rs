//! # Error Types
//!
//! Domain-specific error types for regfee-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  regfee-core errors (this file)                                        │
//! │  ├── ChargeError      - Charge-time hard failures (tampered amount)    │
//! │  ├── ValidationError  - Config-time pricing validation failures        │
//! │  └── SettingsError    - Invalid engine settings                        │
//! │                                                                         │
//! │  regfee-quote errors (CLI crate)                                       │
//! │  └── QuoteError       - File, parse and charge failures                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! A fee selector with no matching price is a *configuration gap*: it
//! resolves to 0 and logs a warning. Registration must never be blocked by a
//! half-configured conference.

use thiserror::Error;

// =============================================================================
// Charge Error
// =============================================================================

/// Failures raised while computing or confirming a charge.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChargeError {
    /// The amount shown to the client no longer matches the server-side
    /// recomputation.
    ///
    /// ## When This Occurs
    /// - Pricing was edited between page load and checkout
    /// - A tier deadline passed while the form was open
    /// - The submitted amount was manipulated
    ///
    /// ## User Workflow
    /// ```text
    /// Client shows: 450.00 EUR
    ///      │
    ///      ▼
    /// Server recomputes: 500.00 EUR
    ///      │
    ///      ▼
    /// TamperedAmount { expected: 500.0, submitted: 450.0, .. }
    ///      │
    ///      ▼
    /// UI shows: "Pricing has changed, please retry"
    /// ```
    #[error(
        "Pricing has changed, please retry (expected {expected:.2} {currency}, submitted {submitted:.2} {currency})"
    )]
    TamperedAmount {
        expected: f64,
        submitted: f64,
        currency: String,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Pricing configuration validation errors.
///
/// Raised by the settings editor before a config is saved. The engine itself
/// assumes pre-validated config and never re-checks on the charge path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// VAT percentage outside `[0, 100)`.
    #[error("VAT percentage must be at least 0 and below 100, got {value}")]
    InvalidVatPercentage { value: f64 },

    /// An amount is negative or not a finite number.
    #[error("{field} must be a non-negative amount")]
    NegativeAmount { field: String },

    /// Currency code is not a three-letter ISO code.
    #[error("{field} has invalid currency code '{code}'")]
    InvalidCurrencyCode { field: String, code: String },

    /// Tier dates are out of order.
    #[error("{field} has invalid date range: {reason}")]
    InvalidDateRange { field: String, reason: String },

    /// An id is missing or blank.
    #[error("{field} id is required")]
    EmptyId { field: String },

    /// Two entries share an id.
    #[error("{field} id '{id}' is used more than once")]
    DuplicateId { field: String, id: String },
}

// =============================================================================
// Settings Error
// =============================================================================

/// Invalid engine settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("Unknown currency fallback policy: '{0}'. Valid options: first_listed, reject")]
    UnknownFallback(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with ChargeError.
pub type ChargeResult<T> = Result<T, ChargeError>;

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Convenience type alias for Results with SettingsError.
pub type SettingsResult<T> = Result<T, SettingsError>;

// =============================================================================
// Unit Tests
// =============================================================================
