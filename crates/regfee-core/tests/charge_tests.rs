//! End-to-end charge tests driven by pricing configs in their stored JSON
//! form.

use chrono::{DateTime, TimeZone, Utc};
use regfee_core::{
    compute_charge, explain_tier, format_price, ChargeAmountService, ChargeError, Conference,
    CurrencyFallback, EngineSettings, PricingConfig, Registration, Tier,
};

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn pricing(json: &str) -> PricingConfig {
    serde_json::from_str(json).expect("pricing fixture must parse")
}

fn registration(tag: &str) -> Registration {
    Registration::new(tag.parse().unwrap())
}

const SUMMIT: &str = r#"{
    "currency": "EUR",
    "early_bird": { "amount": 300, "deadline": "2025-01-01" },
    "regular": { "amount": 400 },
    "late": { "amount": 550, "start_date": "2025-05-01T00:00:00Z" },
    "student_discount": 100,
    "accompanying_person_price": { "EUR": 150, "USD": 170 },
    "vat_percentage": 25,
    "prices_include_vat": false,
    "custom_fee_types": [
        { "id": "workshop", "amount": 80 },
        { "id": "vip", "early_bird": 900, "regular": 1000, "late": 1100 }
    ],
    "custom_fields": [
        { "id": "dinner", "value": 60 }
    ]
}"#;

// ─────────────────────────────────────────────────────────────────────────────
// Charges
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn regular_registration_after_early_bird() {
    let conference = Conference::new(pricing(SUMMIT));
    let service = ChargeAmountService::default();

    let quote = service.quote(&registration("regular"), &conference, at(2025, 2, 1));
    assert_eq!(quote.tier, Tier::Regular);
    assert_eq!(quote.net_amount, 400.0);
    assert_eq!(quote.gross_amount, 500.0);

    let charge = compute_charge(&registration("regular"), &conference, at(2025, 2, 1));
    assert_eq!(charge.amount, 500.0);
    assert_eq!(charge.currency, "EUR");
}

#[test]
fn tier_follows_the_clock() {
    let config = pricing(SUMMIT);
    assert_eq!(explain_tier(&config, at(2024, 12, 31), None).tier, Tier::EarlyBird);
    assert_eq!(explain_tier(&config, at(2025, 3, 1), None).tier, Tier::Regular);
    assert_eq!(explain_tier(&config, at(2025, 5, 2), None).tier, Tier::Late);
}

#[test]
fn fee_type_tier_table_tracks_resolved_tier() {
    let conference = Conference::new(pricing(SUMMIT));
    let vip = registration("fee_type_vip");

    // 900/1000/1100 net, plus 25% VAT
    assert_eq!(compute_charge(&vip, &conference, at(2024, 12, 1)).amount, 1125.0);
    assert_eq!(compute_charge(&vip, &conference, at(2025, 3, 1)).amount, 1250.0);
    assert_eq!(compute_charge(&vip, &conference, at(2025, 6, 1)).amount, 1375.0);
}

#[test]
fn every_selector_kind_prices() {
    let conference = Conference::new(pricing(SUMMIT));
    let now = at(2025, 3, 1);
    let cases = [
        ("early_bird", 375.0),
        ("late", 687.5),
        ("student", 375.0),
        ("accompanying_person", 187.5),
        ("fee_type_workshop", 100.0),
        ("custom_dinner", 75.0),
        ("fee_type_unknown", 0.0),
        ("gold", 0.0),
    ];
    for (tag, expected) in cases {
        assert_eq!(
            compute_charge(&registration(tag), &conference, now).amount,
            expected,
            "selector {tag}"
        );
    }
}

#[test]
fn gross_prices_are_charged_verbatim() {
    let mut config = pricing(SUMMIT);
    config.prices_include_vat = true;
    let conference = Conference::new(config);

    let quote = ChargeAmountService::default().quote(&registration("regular"), &conference, at(2025, 3, 1));
    assert_eq!(quote.gross_amount, 400.0);
    assert_eq!(quote.net_amount, 320.0);
    assert_eq!(quote.vat_amount, 80.0);
}

#[test]
fn per_currency_prices() {
    let config = pricing(
        r#"{
            "currency": "USD",
            "regular": { "amount": { "EUR": 400, "USD": 440 } }
        }"#,
    );
    let charge = compute_charge(&registration("regular"), &Conference::new(config), at(2025, 3, 1));
    assert_eq!(charge.amount, 440.0);
    assert_eq!(charge.currency, "USD");
}

#[test]
fn missing_currency_uses_first_listed_entry() {
    let config = pricing(
        r#"{
            "currency": "EUR",
            "regular": { "amount": { "USD": 100, "GBP": 80 } }
        }"#,
    );
    let conference = Conference::new(config);
    let reg = registration("regular");

    assert_eq!(compute_charge(&reg, &conference, at(2025, 3, 1)).amount, 100.0);

    let strict = ChargeAmountService::new(EngineSettings {
        currency_fallback: CurrencyFallback::Reject,
        ..Default::default()
    });
    assert_eq!(strict.compute_charge(&reg, &conference, at(2025, 3, 1)).amount, 0.0);
}

#[test]
fn empty_config_charges_zero_in_default_currency() {
    let charge = compute_charge(&registration("regular"), &Conference::new(pricing("{}")), at(2025, 3, 1));
    assert_eq!(charge.amount, 0.0);
    assert_eq!(charge.currency, "EUR");
}

#[test]
fn half_authored_config_still_charges() {
    let config = pricing(
        r#"{
            "currency": "EUR",
            "regular": { "amount": { "EUR": null, "USD": 100 } },
            "accompanying_person_price": { "EUR": null },
            "custom_fee_types": [ { "amount": 80 } ],
            "custom_fields": [ { "value": 60 } ]
        }"#,
    );
    let conference = Conference::new(config);
    let now = at(2025, 3, 1);

    assert_eq!(compute_charge(&registration("regular"), &conference, now).amount, 100.0);
    assert_eq!(compute_charge(&registration("accompanying_person"), &conference, now).amount, 0.0);
    assert_eq!(compute_charge(&registration("fee_type_workshop"), &conference, now).amount, 0.0);
}

#[test]
fn half_cent_gross_rounds_up() {
    let config = pricing(
        r#"{ "regular": { "amount": 4.02 }, "vat_percentage": 25, "prices_include_vat": false }"#,
    );
    let quote = ChargeAmountService::default().quote(
        &registration("regular"),
        &Conference::new(config),
        at(2025, 3, 1),
    );
    assert_eq!(quote.net_amount, 4.02);
    assert_eq!(quote.gross_amount, 5.03);
    assert_eq!(quote.vat_amount, 1.01);
}

#[test]
fn last_minute_pricing_without_late_start() {
    let config = pricing(
        r#"{
            "early_bird": { "amount": 300, "deadline": "2025-01-01" },
            "regular": { "amount": 400 },
            "late": { "amount": 500 }
        }"#,
    );
    let conference = Conference::new(config).with_start_date(at(2025, 6, 15));
    let service = ChargeAmountService::default();

    let quote = service.quote(&registration("fee_type_none"), &conference, at(2025, 6, 10));
    assert_eq!(quote.tier, Tier::Late);
    assert_eq!(
        service.quote(&registration("regular"), &conference, at(2025, 5, 1)).tier,
        Tier::Regular
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Tamper check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn client_amount_within_a_cent_is_accepted() {
    let conference = Conference::new(pricing(SUMMIT));
    let service = ChargeAmountService::default();
    let charge = service
        .verify_client_amount(&registration("regular"), &conference, at(2025, 2, 1), 500.01)
        .unwrap();
    assert_eq!(charge.amount, 500.0);
}

#[test]
fn client_amount_from_a_closed_tier_is_rejected() {
    let conference = Conference::new(pricing(SUMMIT));
    let service = ChargeAmountService::default();
    let err = service
        .verify_client_amount(&registration("regular"), &conference, at(2025, 2, 1), 375.0)
        .unwrap_err();

    let ChargeError::TamperedAmount { expected, submitted, currency } = &err;
    assert_eq!(*expected, 500.0);
    assert_eq!(*submitted, 375.0);
    assert_eq!(currency, "EUR");
    assert!(err.to_string().starts_with("Pricing has changed, please retry"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Display
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn quote_formats_for_display() {
    let conference = Conference::new(pricing(SUMMIT));
    let quote = ChargeAmountService::default().quote(&registration("regular"), &conference, at(2025, 2, 1));
    assert_eq!(format_price(quote.gross_amount, &quote.currency), "500 €");
}

#[test]
fn resolved_price_serializes_camel_case() {
    let conference = Conference::new(pricing(SUMMIT));
    let quote = ChargeAmountService::default().quote(&registration("regular"), &conference, at(2025, 2, 1));
    let json = serde_json::to_value(&quote).unwrap();
    assert_eq!(json["tier"], "regular");
    assert_eq!(json["grossAmount"], 500.0);
    assert_eq!(json["currency"], "EUR");
}
