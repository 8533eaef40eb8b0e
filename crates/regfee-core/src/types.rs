//! # Domain Types
//!
//! Core domain types used throughout the fee engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐   ┌─────────────────┐   ┌─────────────────┐  │
//! │  │    PricingConfig     │   │   FeeSelector   │   │  ResolvedPrice  │  │
//! │  │  ──────────────────  │   │  ─────────────  │   │  ─────────────  │  │
//! │  │  currency            │   │  early_bird     │   │  tier           │  │
//! │  │  early_bird/regular/ │   │  regular / late │   │  netAmount      │  │
//! │  │  late tiers          │   │  student        │   │  grossAmount    │  │
//! │  │  student_discount    │   │  accompanying_  │   │  vatAmount      │  │
//! │  │  vat_percentage      │   │  person         │   │  currency       │  │
//! │  │  prices_include_vat  │   │  fee_type_<id>  │   └─────────────────┘  │
//! │  │  custom_fee_types[]  │   │  custom_<id>    │                        │
//! │  │  custom_fields[]     │   └─────────────────┘                        │
//! │  └──────────────────────┘                                               │
//! │                                                                         │
//! │  Every amount is an AmountField:                                        │
//! │      Fixed(450.0)  |  PerCurrency { "EUR": 450, "USD": 490 }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Format
//! `PricingConfig` deserializes from the JSON stored with conference
//! settings. Every field is optional and `null` is treated like an absent
//! field, so a half-authored conference still loads.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

// =============================================================================
// Tier
// =============================================================================

/// A time-windowed pricing bracket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    EarlyBird,
    #[default]
    Regular,
    Late,
}

impl Tier {
    /// All tiers in chronological order.
    pub const ALL: [Tier; 3] = [Tier::EarlyBird, Tier::Regular, Tier::Late];

    /// The storage tag for this tier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Tier::EarlyBird => "early_bird",
            Tier::Regular => "regular",
            Tier::Late => "late",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Amount Fields
// =============================================================================

/// Independent price list per currency code, in stored order.
///
/// Order is significant: [`CurrencyFallback::FirstListed`] picks the entry
/// the admin stored first.
///
/// [`CurrencyFallback::FirstListed`]: crate::CurrencyFallback::FirstListed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrencyPrices(Vec<(String, f64)>);

impl CurrencyPrices {
    /// Creates an empty price list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a price for a currency.
    pub fn with(mut self, code: impl Into<String>, amount: f64) -> Self {
        self.0.push((code.into(), amount));
        self
    }

    /// Returns the price for a currency code (case-insensitive).
    pub fn get(&self, code: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(code))
            .map(|(_, amount)| *amount)
    }

    /// Returns the first stored entry.
    pub fn first(&self) -> Option<(&str, f64)> {
        self.0.first().map(|(c, amount)| (c.as_str(), *amount))
    }

    /// Iterates entries in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(c, amount)| (c.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for CurrencyPrices {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        CurrencyPrices(iter.into_iter().map(|(c, a)| (c.into(), a)).collect())
    }
}

impl Serialize for CurrencyPrices {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, amount) in &self.0 {
            map.serialize_entry(code, amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CurrencyPrices {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PricesVisitor;

        impl<'de> Visitor<'de> for PricesVisitor {
            type Value = CurrencyPrices;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of currency code to amount")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                // Blank cells (`"EUR": null`) are left out
                while let Some((code, amount)) = access.next_entry::<String, Option<f64>>()? {
                    if let Some(amount) = amount {
                        entries.push((code, amount));
                    }
                }
                Ok(CurrencyPrices(entries))
            }
        }

        deserializer.deserialize_map(PricesVisitor)
    }
}

/// A configured amount: one number for every currency, or one per currency.
///
/// JSON: `450` or `{ "EUR": 450, "USD": 490 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    Fixed(f64),
    PerCurrency(CurrencyPrices),
}

impl From<f64> for AmountField {
    fn from(amount: f64) -> Self {
        AmountField::Fixed(amount)
    }
}

impl From<CurrencyPrices> for AmountField {
    fn from(prices: CurrencyPrices) -> Self {
        AmountField::PerCurrency(prices)
    }
}

// =============================================================================
// Tier Configuration
// =============================================================================

/// Early bird pricing: valid up to and including `deadline`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EarlyBirdTier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountField>,

    #[serde(default, with = "optional_instant", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

/// Regular pricing with an optional explicit window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegularTier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountField>,

    #[serde(default, with = "optional_instant", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, with = "optional_instant", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

/// Late pricing from `start_date` on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LateTier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountField>,

    #[serde(default, with = "optional_instant", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
}

/// An admin-defined fee type (workshop pass, VIP, ...).
///
/// Either a flat `amount` that ignores tiers, or its own three-tier table
/// mirroring the top-level one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomFeeType {
    /// Blank while the admin is still filling in the row; never matches a
    /// selector.
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_bird: Option<AmountField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular: Option<AmountField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late: Option<AmountField>,
}

impl CustomFeeType {
    /// The fee type's own amount for a tier (ignores the flat amount).
    pub fn tier_amount(&self, tier: Tier) -> Option<&AmountField> {
        match tier {
            Tier::EarlyBird => self.early_bird.as_ref(),
            Tier::Regular => self.regular.as_ref(),
            Tier::Late => self.late.as_ref(),
        }
    }
}

/// An ad-hoc priced field (conference dinner, excursion, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<AmountField>,
}

// =============================================================================
// Pricing Config
// =============================================================================

/// Conference pricing, as edited by the organizer.
///
/// ## VAT Polarity
/// `prices_include_vat` is a single global switch. Every amount in this
/// struct, nested fee types and custom fields included, is gross when it is
/// set and net when it is not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// ISO 4217 code. Absent or blank means the engine default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub early_bird: EarlyBirdTier,

    #[serde(default, deserialize_with = "null_as_default")]
    pub regular: RegularTier,

    #[serde(default, deserialize_with = "null_as_default")]
    pub late: LateTier,

    /// Subtracted from the regular amount for the `student` selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_discount: Option<AmountField>,

    /// Explicit student amount; wins over `student_discount` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_price: Option<AmountField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accompanying_person_price: Option<AmountField>,

    /// VAT in percent, `[0, 100)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_percentage: Option<f64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub prices_include_vat: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_fee_types: Vec<CustomFeeType>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_fields: Vec<CustomField>,
}

impl PricingConfig {
    /// Configured currency, or `fallback` when absent or blank.
    pub fn currency_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.currency.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code,
            _ => fallback,
        }
    }

    /// Top-level amount for a tier.
    pub fn tier_amount(&self, tier: Tier) -> Option<&AmountField> {
        match tier {
            Tier::EarlyBird => self.early_bird.amount.as_ref(),
            Tier::Regular => self.regular.amount.as_ref(),
            Tier::Late => self.late.amount.as_ref(),
        }
    }

    pub fn fee_type(&self, id: &str) -> Option<&CustomFeeType> {
        self.custom_fee_types.iter().find(|f| f.id == id)
    }

    pub fn custom_field(&self, id: &str) -> Option<&CustomField> {
        self.custom_fields.iter().find(|f| f.id == id)
    }
}

// =============================================================================
// Fee Selector
// =============================================================================

const FEE_TYPE_PREFIX: &str = "fee_type_";
const CUSTOM_PREFIX: &str = "custom_";

/// Which price rule applies to a registration.
///
/// Chosen at signup and stored on the registration as its string tag. It is
/// never re-derived from current pricing, so a locked-in fee type survives
/// later pricing edits.
///
/// Unknown tags parse to [`FeeSelector::Unknown`] instead of failing; they
/// price at 0 like any other configuration gap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeeSelector {
    EarlyBird,
    Regular,
    Late,
    Student,
    AccompanyingPerson,
    /// `fee_type_<id>`
    FeeType(String),
    /// `custom_<id>`
    Custom(String),
    Unknown(String),
}

impl FeeSelector {
    /// Selector for a standard tier.
    pub const fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::EarlyBird => FeeSelector::EarlyBird,
            Tier::Regular => FeeSelector::Regular,
            Tier::Late => FeeSelector::Late,
        }
    }

    /// The standard tier named by this selector, if any.
    pub fn tier(&self) -> Option<Tier> {
        match self {
            FeeSelector::EarlyBird => Some(Tier::EarlyBird),
            FeeSelector::Regular => Some(Tier::Regular),
            FeeSelector::Late => Some(Tier::Late),
            _ => None,
        }
    }
}

impl FromStr for FeeSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        let selector = match tag {
            "early_bird" => FeeSelector::EarlyBird,
            "regular" => FeeSelector::Regular,
            "late" => FeeSelector::Late,
            "student" => FeeSelector::Student,
            "accompanying_person" => FeeSelector::AccompanyingPerson,
            _ => match (
                tag.strip_prefix(FEE_TYPE_PREFIX),
                tag.strip_prefix(CUSTOM_PREFIX),
            ) {
                (Some(id), _) if !id.is_empty() => FeeSelector::FeeType(id.to_string()),
                (_, Some(id)) if !id.is_empty() => FeeSelector::Custom(id.to_string()),
                _ => FeeSelector::Unknown(tag.to_string()),
            },
        };
        Ok(selector)
    }
}

impl fmt::Display for FeeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeSelector::EarlyBird => f.write_str("early_bird"),
            FeeSelector::Regular => f.write_str("regular"),
            FeeSelector::Late => f.write_str("late"),
            FeeSelector::Student => f.write_str("student"),
            FeeSelector::AccompanyingPerson => f.write_str("accompanying_person"),
            FeeSelector::FeeType(id) => write!(f, "{FEE_TYPE_PREFIX}{id}"),
            FeeSelector::Custom(id) => write!(f, "{CUSTOM_PREFIX}{id}"),
            FeeSelector::Unknown(tag) => f.write_str(tag),
        }
    }
}

impl Serialize for FeeSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FeeSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(FeeSelector::from_str(&tag).unwrap_or_else(|never| match never {}))
    }
}

// =============================================================================
// Engine Inputs
// =============================================================================

/// The part of a registration record the engine reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub fee_selector: FeeSelector,
}

impl Registration {
    pub fn new(fee_selector: FeeSelector) -> Self {
        Registration { fee_selector }
    }
}

/// The part of a conference record the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conference {
    #[serde(default)]
    pub pricing_config: PricingConfig,

    #[serde(default, with = "optional_instant", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
}

impl Conference {
    pub fn new(pricing_config: PricingConfig) -> Self {
        Conference {
            pricing_config,
            start_date: None,
        }
    }

    /// Sets the conference start date (drives the last-minute late window).
    pub fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }
}

// =============================================================================
// Engine Outputs
// =============================================================================

/// Full price breakdown for display, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrice {
    pub tier: Tier,
    pub net_amount: f64,
    pub gross_amount: f64,
    pub vat_amount: f64,
    pub vat_percentage: f64,
    pub currency: String,
}

/// The amount to actually charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    pub amount: f64,
    pub currency: String,
}

// =============================================================================
// Date Parsing
// =============================================================================

/// Parses an instant from RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as
/// UTC) or a plain `YYYY-MM-DD` date (00:00:00 UTC of that day).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Serde adapter for optional tier dates. Blank strings read as `None`.
mod optional_instant {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(instant) => serializer.serialize_some(&instant.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_instant(text)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date '{text}'"))),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Unit Tests
// =============================================================================
