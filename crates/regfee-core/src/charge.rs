//! # Charge Amount Service
//!
//! The one place a trusted backend asks "what do we charge for this
//! registration?".
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         compute_charge()                                │
//! │                                                                         │
//! │   &PricingConfig (one snapshot, threaded through every step)            │
//! │        │                                                                │
//! │        ├──► currency      config.currency or default "EUR"              │
//! │        ├──► tier          TierResolver(now, conference start)           │
//! │        ├──► amount        PriceResolver(persisted fee selector, tier)   │
//! │        ├──► breakdown     VAT with the global prices_include_vat flag   │
//! │        └──► round         gross to 2 decimals, exactly once             │
//! │                                                                         │
//! │   Output: Charge { amount, currency }                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tamper Check
//! A client-submitted amount is never charged directly. The server
//! recomputes from the registration's stored fee selector and the
//! authoritative config, then rejects the request when the two disagree by
//! more than the configured epsilon.

use chrono::{DateTime, Utc};

use crate::error::{ChargeError, ChargeResult};
use crate::price::{PriceResolver, PriceTable};
use crate::settings::EngineSettings;
use crate::tier::explain_tier_with_window;
use crate::types::{Charge, Conference, Registration, ResolvedPrice};
use crate::vat::{breakdown_from_input, round_money};

/// Floating point slack on top of the epsilon so a difference of exactly
/// one cent is accepted.
const EPSILON_SLACK: f64 = 1e-9;

/// Orchestrates tier, price and VAT resolution.
///
/// Holds only settings; every call is a pure function of its arguments, so
/// one service may be shared freely across threads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargeAmountService {
    settings: EngineSettings,
}

impl ChargeAmountService {
    pub fn new(settings: EngineSettings) -> Self {
        ChargeAmountService { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn resolver(&self) -> PriceResolver {
        PriceResolver::new(self.settings.currency_fallback)
    }

    /// Full breakdown for display: tier, net, gross, VAT and currency.
    pub fn quote(
        &self,
        registration: &Registration,
        conference: &Conference,
        now: DateTime<Utc>,
    ) -> ResolvedPrice {
        let config = &conference.pricing_config;
        let currency = config.currency_or(&self.settings.default_currency);

        let decision = explain_tier_with_window(
            config,
            now,
            conference.start_date,
            self.settings.last_minute_window(),
        );
        let amount = self
            .resolver()
            .resolve(config, &registration.fee_selector, decision.tier, currency);
        let breakdown = breakdown_from_input(amount, config.vat_percentage, config.prices_include_vat);

        tracing::debug!(
            selector = %registration.fee_selector,
            tier = %decision.tier,
            rule = decision.rule,
            amount,
            gross = breakdown.with_vat,
            currency,
            "Quoted registration fee"
        );

        ResolvedPrice {
            tier: decision.tier,
            net_amount: round_money(breakdown.without_vat),
            gross_amount: round_money(breakdown.with_vat),
            vat_amount: round_money(breakdown.vat_amount),
            vat_percentage: breakdown.vat_percentage,
            currency: currency.to_string(),
        }
    }

    /// The amount to charge for a registration.
    pub fn compute_charge(
        &self,
        registration: &Registration,
        conference: &Conference,
        now: DateTime<Utc>,
    ) -> Charge {
        let quote = self.quote(registration, conference, now);
        Charge {
            amount: quote.gross_amount,
            currency: quote.currency,
        }
    }

    /// Recomputes the charge and checks it against what the client showed.
    ///
    /// ## Returns
    /// - `Ok(charge)` with the authoritative amount when they agree
    /// - `Err(ChargeError::TamperedAmount)` when they differ by more than
    ///   `tamper_epsilon`
    pub fn verify_client_amount(
        &self,
        registration: &Registration,
        conference: &Conference,
        now: DateTime<Utc>,
        submitted: f64,
    ) -> ChargeResult<Charge> {
        let charge = self.compute_charge(registration, conference, now);
        let difference = (submitted - charge.amount).abs();

        // NaN never compares within epsilon
        if !(difference <= self.settings.tamper_epsilon + EPSILON_SLACK) {
            tracing::warn!(
                selector = %registration.fee_selector,
                expected = charge.amount,
                submitted,
                currency = %charge.currency,
                "Client amount does not match recomputed charge"
            );
            return Err(ChargeError::TamperedAmount {
                expected: charge.amount,
                submitted,
                currency: charge.currency,
            });
        }

        Ok(charge)
    }

    /// Standard tier amounts for a conference, in its currency.
    pub fn price_table(&self, conference: &Conference) -> PriceTable {
        let config = &conference.pricing_config;
        let currency = config.currency_or(&self.settings.default_currency);
        self.resolver().price_table(config, currency)
    }
}

/// [`ChargeAmountService::compute_charge`] with default settings.
pub fn compute_charge(
    registration: &Registration,
    conference: &Conference,
    now: DateTime<Utc>,
) -> Charge {
    ChargeAmountService::default().compute_charge(registration, conference, now)
}

// =============================================================================
// Unit Tests
// =============================================================================
