//! # VAT Calculator
//!
//! Pure net ↔ gross conversion and margin-scheme VAT.
//!
//! ## Precision Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ROUND ONCE, AT THE BOUNDARY                                            │
//! │                                                                         │
//! │  config amount ──► net/gross math (full f64) ──► round_money() ──► out │
//! │                                                                         │
//! │  Rounding between steps compounds: 99.99 / 1.25 rounded, then × 1.25,  │
//! │  drifts by a cent. Every function in this module works in full         │
//! │  precision; only `round_money` and `VatBreakdown::rounded` round.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use regfee_core::vat::{breakdown_from_input, margin_vat};
//!
//! // 500 gross at 25% VAT
//! let b = breakdown_from_input(500.0, Some(25.0), true);
//! assert_eq!(b.without_vat, 400.0);
//! assert_eq!(b.vat_amount, 100.0);
//!
//! // Agency resale: VAT only on the margin
//! let m = margin_vat(1200.0, 1000.0);
//! assert_eq!(m.vat_amount, 40.0);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::MARGIN_VAT_RATE;

// =============================================================================
// Scalar Conversions
// =============================================================================

/// Net → gross: `net × (1 + pct/100)`.
#[inline]
pub fn with_vat(net: f64, vat_percentage: f64) -> f64 {
    net * (1.0 + vat_percentage / 100.0)
}

/// Gross → net: `gross / (1 + pct/100)`.
#[inline]
pub fn without_vat(gross: f64, vat_percentage: f64) -> f64 {
    gross / (1.0 + vat_percentage / 100.0)
}

/// VAT due on a net amount: `net × pct/100`.
#[inline]
pub fn vat_amount(net: f64, vat_percentage: f64) -> f64 {
    net * vat_percentage / 100.0
}

/// Relative nudge applied before rounding to cents. Larger than the f64
/// error of the VAT math, far below a cent for any real amount.
const ROUNDING_NUDGE: f64 = 1e-12;

/// Rounds a monetary value to 2 decimals, decimal halves away from zero.
///
/// `1.005` is stored as `1.00499999…`; the nudge lifts such values back
/// onto the half so they round up like their decimal form.
///
/// Only call this at an output boundary.
pub fn round_money(value: f64) -> f64 {
    let rounded = (value * 100.0 * (1.0 + ROUNDING_NUDGE)).round() / 100.0;
    // Normalize -0.0 so it never displays as "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

// =============================================================================
// Breakdown
// =============================================================================

/// Net, gross and VAT for one amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VatBreakdown {
    pub without_vat: f64,
    pub with_vat: f64,
    pub vat_amount: f64,
    pub vat_percentage: f64,
}

impl VatBreakdown {
    /// No VAT: every amount equals the input.
    fn identity(amount: f64) -> Self {
        VatBreakdown {
            without_vat: amount,
            with_vat: amount,
            vat_amount: 0.0,
            vat_percentage: 0.0,
        }
    }

    /// Display copy with every amount rounded to 2 decimals.
    pub fn rounded(&self) -> Self {
        VatBreakdown {
            without_vat: round_money(self.without_vat),
            with_vat: round_money(self.with_vat),
            vat_amount: round_money(self.vat_amount),
            vat_percentage: self.vat_percentage,
        }
    }
}

fn effective_rate(vat_percentage: Option<f64>) -> Option<f64> {
    vat_percentage.filter(|pct| *pct != 0.0)
}

/// Breakdown of a net amount.
///
/// An absent or zero VAT percentage collapses every amount to `net`.
pub fn breakdown(net: f64, vat_percentage: Option<f64>) -> VatBreakdown {
    match effective_rate(vat_percentage) {
        None => VatBreakdown::identity(net),
        Some(pct) => VatBreakdown {
            without_vat: net,
            with_vat: with_vat(net, pct),
            vat_amount: vat_amount(net, pct),
            vat_percentage: pct,
        },
    }
}

/// Breakdown of a configured amount whose polarity is `amount_is_gross`.
///
/// For gross input the net is derived by division and VAT is `gross − net`,
/// so net + VAT always reproduces the configured gross exactly.
pub fn breakdown_from_input(
    amount: f64,
    vat_percentage: Option<f64>,
    amount_is_gross: bool,
) -> VatBreakdown {
    if !amount_is_gross {
        return breakdown(amount, vat_percentage);
    }

    match effective_rate(vat_percentage) {
        None => VatBreakdown::identity(amount),
        Some(pct) => {
            let net = without_vat(amount, pct);
            VatBreakdown {
                without_vat: net,
                with_vat: amount,
                vat_amount: amount - net,
                vat_percentage: pct,
            }
        }
    }
}

// =============================================================================
// Margin Scheme
// =============================================================================

/// VAT due under the margin scheme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MarginVat {
    pub margin: f64,
    pub vat_rate: f64,
    pub vat_amount: f64,
}

/// Margin-scheme VAT for reseller/agency transactions.
///
/// VAT is due on `max(0, selling − cost)` at the fixed [`MARGIN_VAT_RATE`].
/// Used by invoicing and reporting; the charge path never calls it.
pub fn margin_vat(selling_gross: f64, cost_gross: f64) -> MarginVat {
    let margin = (selling_gross - cost_gross).max(0.0);
    MarginVat {
        margin,
        vat_rate: MARGIN_VAT_RATE,
        vat_amount: margin * MARGIN_VAT_RATE / 100.0,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_vat_is_identity() {
        assert_eq!(with_vat(123.45, 0.0), 123.45);
        assert_eq!(without_vat(123.45, 0.0), 123.45);
        assert_eq!(vat_amount(123.45, 0.0), 0.0);
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(with_vat(400.0, 25.0), 500.0);
        assert_eq!(without_vat(500.0, 25.0), 400.0);
        assert_eq!(vat_amount(400.0, 25.0), 100.0);
    }

    #[test]
    fn test_breakdown_without_rate_collapses() {
        for pct in [None, Some(0.0)] {
            let b = breakdown(250.0, pct);
            assert_eq!(b.without_vat, 250.0);
            assert_eq!(b.with_vat, 250.0);
            assert_eq!(b.vat_amount, 0.0);
        }
    }

    #[test]
    fn test_breakdown_net_input() {
        let b = breakdown_from_input(400.0, Some(25.0), false);
        assert_eq!(b.without_vat, 400.0);
        assert_eq!(b.with_vat, 500.0);
        assert_eq!(b.vat_amount, 100.0);
        assert_eq!(b.vat_percentage, 25.0);
    }

    #[test]
    fn test_breakdown_gross_input_reconciles_exactly() {
        let b = breakdown_from_input(99.99, Some(25.0), true);
        assert_eq!(b.with_vat, 99.99);
        assert!((b.without_vat - 79.992).abs() < 1e-9);
        // net + vat reproduces the gross without drift
        assert_eq!(b.without_vat + b.vat_amount, 99.99);
    }

    #[test]
    fn test_breakdown_gross_input_without_rate() {
        let b = breakdown_from_input(80.0, None, true);
        assert_eq!(b, VatBreakdown::identity(80.0));
    }

    #[test]
    fn test_rounded_breakdown() {
        let b = breakdown_from_input(99.99, Some(25.0), true).rounded();
        assert_eq!(b.without_vat, 79.99);
        assert_eq!(b.vat_amount, 20.0);
        assert_eq!(b.with_vat, 99.99);
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(450.567), 450.57);
        assert_eq!(round_money(450.5), 450.5);
        assert_eq!(round_money(-0.001), 0.0);
        assert!(round_money(-0.001).is_sign_positive());
    }

    #[test]
    fn test_round_money_decimal_halves() {
        assert_eq!(round_money(1.005), 1.01);
        assert_eq!(round_money(-1.005), -1.01);
        assert_eq!(round_money(2.675), 2.68);
        assert_eq!(round_money(1.004), 1.0);
    }

    #[test]
    fn test_gross_on_a_half_cent_rounds_up() {
        // 4.02 × 1.25 = 5.025, computed as 5.0249999999999995
        let b = breakdown(4.02, Some(25.0)).rounded();
        assert_eq!(b.with_vat, 5.03);
        assert_eq!(b.without_vat, 4.02);
        assert_eq!(b.vat_amount, 1.01);
    }

    #[test]
    fn test_margin_vat() {
        let m = margin_vat(1200.0, 1000.0);
        assert_eq!(m.margin, 200.0);
        assert_eq!(m.vat_rate, 20.0);
        assert_eq!(m.vat_amount, 40.0);
    }

    #[test]
    fn test_margin_vat_never_negative() {
        let m = margin_vat(900.0, 1000.0);
        assert_eq!(m.margin, 0.0);
        assert_eq!(m.vat_amount, 0.0);
    }
}
