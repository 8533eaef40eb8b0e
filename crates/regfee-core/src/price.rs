//! # Price Resolution
//!
//! Maps a registration's [`FeeSelector`] to the configured unit amount.
//!
//! ## Selector Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Selector              Source                          Tier-aware?      │
//! │  ────────────────────  ──────────────────────────────  ───────────      │
//! │  early_bird/regular/   matching top-level tier amount  no (locked in)   │
//! │  late                                                                   │
//! │  student               student_price, else             no               │
//! │                        max(0, regular − discount)                       │
//! │  accompanying_person   accompanying_person_price       no               │
//! │  fee_type_<id>         flat amount, else own tier      yes              │
//! │                        table at the resolved tier                       │
//! │  custom_<id>           custom_fields[id].value         no               │
//! │  anything else         0 (configuration gap)           -                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Polarity
//! Amounts come back exactly as configured: net when the conference stores
//! prices without VAT, gross when `prices_include_vat` is set. The charge
//! service reconciles VAT afterwards with the single global polarity.
//!
//! ## Configuration Gaps
//! A selector with nothing configured resolves to 0 and logs a warning.
//! Registration is never blocked by a pricing gap; a visible zero is caught
//! by the organizer while testing the form.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::currency::{resolve_optional, CurrencyFallback};
use crate::types::{AmountField, FeeSelector, PricingConfig, Tier};

/// Resolves fee selectors against a pricing config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceResolver {
    fallback: CurrencyFallback,
}

impl PriceResolver {
    pub fn new(fallback: CurrencyFallback) -> Self {
        PriceResolver { fallback }
    }

    pub fn fallback(&self) -> CurrencyFallback {
        self.fallback
    }

    /// The configured amount for `selector`, or 0 for a configuration gap.
    pub fn resolve(
        &self,
        config: &PricingConfig,
        selector: &FeeSelector,
        tier: Tier,
        currency: &str,
    ) -> f64 {
        match self.try_resolve(config, selector, tier, currency) {
            Some(amount) => amount,
            None => {
                tracing::warn!(
                    selector = %selector,
                    tier = %tier,
                    currency,
                    "No fee configured for selector, resolving to 0"
                );
                0.0
            }
        }
    }

    /// The configured amount for `selector`, or `None` when nothing usable
    /// is configured.
    pub fn try_resolve(
        &self,
        config: &PricingConfig,
        selector: &FeeSelector,
        tier: Tier,
        currency: &str,
    ) -> Option<f64> {
        let amount = match selector {
            FeeSelector::EarlyBird | FeeSelector::Regular | FeeSelector::Late => {
                // Standard selectors are locked-in tiers
                let locked = selector.tier().unwrap_or(tier);
                self.lookup(config.tier_amount(locked), currency)
            }
            FeeSelector::Student => self.student(config, currency),
            FeeSelector::AccompanyingPerson => {
                self.lookup(config.accompanying_person_price.as_ref(), currency)
            }
            FeeSelector::FeeType(id) => {
                let fee_type = config.fee_type(id)?;
                match &fee_type.amount {
                    Some(flat) => self.lookup(Some(flat), currency),
                    None => self.lookup(fee_type.tier_amount(tier), currency),
                }
            }
            FeeSelector::Custom(id) => {
                let field = config.custom_field(id)?;
                self.lookup(field.value.as_ref(), currency)
            }
            FeeSelector::Unknown(_) => None,
        };

        tracing::debug!(selector = %selector, tier = %tier, currency, ?amount, "Resolved fee");
        amount
    }

    /// All three standard tier amounts, for price tables in the UI.
    pub fn price_table(&self, config: &PricingConfig, currency: &str) -> PriceTable {
        PriceTable {
            currency: currency.to_string(),
            early_bird: self.lookup(config.tier_amount(Tier::EarlyBird), currency),
            regular: self.lookup(config.tier_amount(Tier::Regular), currency),
            late: self.lookup(config.tier_amount(Tier::Late), currency),
        }
    }

    fn student(&self, config: &PricingConfig, currency: &str) -> Option<f64> {
        if let Some(price) = self.lookup(config.student_price.as_ref(), currency) {
            return Some(price.max(0.0));
        }
        let regular = self.lookup(config.regular.amount.as_ref(), currency)?;
        let discount = self
            .lookup(config.student_discount.as_ref(), currency)
            .unwrap_or(0.0);
        Some((regular - discount).max(0.0))
    }

    fn lookup(&self, field: Option<&AmountField>, currency: &str) -> Option<f64> {
        resolve_optional(field, currency, self.fallback)
    }
}

/// Standard tier amounts as configured, `None` where a tier has no price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceTable {
    pub currency: String,
    pub early_bird: Option<f64>,
    pub regular: Option<f64>,
    pub late: Option<f64>,
}

/// Resolves with the default currency fallback policy.
pub fn resolve_price(
    config: &PricingConfig,
    selector: &FeeSelector,
    tier: Tier,
    currency: &str,
) -> f64 {
    PriceResolver::default().resolve(config, selector, tier, currency)
}

// =============================================================================
// Unit Tests
// =============================================================================
