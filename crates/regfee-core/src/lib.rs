//! # regfee-core: Pure Fee Engine for Conference Registration
//!
//! This crate decides what a registrant owes. It contains all pricing logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Registration Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Registration UI / Payment backend / Invoicing          │   │
//! │  │   show price ──► create payment intent ──► invoice line items   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ PricingConfig + FeeSelector + now      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ regfee-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   tier    │─►│   price   │─►│    vat    │─►│  charge   │  │   │
//! │  │   │ resolver  │  │ resolver  │  │calculator │  │  service  │  │   │
//! │  │   └───────────┘  └─────┬─────┘  └───────────┘  └───────────┘  │   │
//! │  │                        ▼                                        │   │
//! │  │                  ┌───────────┐   ┌───────────┐                  │   │
//! │  │                  │ currency  │   │  format   │                  │   │
//! │  │                  └───────────┘   └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Pricing configuration, fee selectors, quote DTOs
//! - [`currency`] - "fixed or per-currency" amount resolution
//! - [`tier`] - Ordered tier rules (early bird / regular / late)
//! - [`price`] - Fee selector → configured unit amount
//! - [`vat`] - Net/gross conversion and margin-scheme VAT
//! - [`charge`] - The authoritative charge computation
//! - [`format`] - Display helpers shared with the UI
//! - [`settings`] - Engine tunables
//! - [`validation`] - Config-time checks for the settings editor
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use regfee_core::{compute_charge, Conference, PricingConfig, Registration};
//!
//! let pricing: PricingConfig = serde_json::from_str(r#"{
//!     "currency": "EUR",
//!     "early_bird": { "amount": 300, "deadline": "2025-01-01" },
//!     "regular": { "amount": 400 },
//!     "vat_percentage": 25,
//!     "prices_include_vat": false
//! }"#).unwrap();
//!
//! let conference = Conference::new(pricing);
//! let registration = Registration::new("regular".parse().unwrap());
//! let now = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
//!
//! let charge = compute_charge(&registration, &conference, now);
//! assert_eq!(charge.amount, 500.0);
//! assert_eq!(charge.currency, "EUR");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod charge;
pub mod currency;
pub mod error;
pub mod format;
pub mod price;
pub mod settings;
pub mod tier;
pub mod types;
pub mod validation;
pub mod vat;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use charge::{compute_charge, ChargeAmountService};
pub use currency::{resolve_amount, CurrencyFallback};
pub use error::{ChargeError, SettingsError, ValidationError};
pub use format::{currency_symbol, format_price, format_price_without_zeros};
pub use price::{resolve_price, PriceResolver, PriceTable};
pub use settings::EngineSettings;
pub use tier::{explain_tier, resolve_tier, TierDecision};
pub use types::*;
pub use vat::{MarginVat, VatBreakdown};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency used when a pricing config does not name one.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Days before the conference start that count as "late" when no explicit
/// late tier start date is configured.
pub const LAST_MINUTE_WINDOW_DAYS: i64 = 14;

/// Largest difference between a client-displayed amount and the recomputed
/// charge that is still accepted, in currency units.
pub const TAMPER_EPSILON: f64 = 0.01;

/// Margin-scheme VAT rate in percent. A jurisdiction constant, not config.
pub const MARGIN_VAT_RATE: f64 = 20.0;
