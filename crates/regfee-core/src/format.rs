//! # Price Formatting
//!
//! Display helpers shared by the registration form and invoices.
//!
//! ```text
//! 450.00, "EUR"  ──►  "450 €"
//! 450.50, "usd"  ──►  "450.5 $"
//! 12.00,  "SEK"  ──►  "12 SEK"   (unknown code: shown as-is)
//! ```

use crate::vat::round_money;

/// Code → symbol. Codes without an entry display as the code itself.
const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("EUR", "€"),
    ("USD", "$"),
    ("GBP", "£"),
    ("CHF", "CHF"),
    ("CAD", "C$"),
    ("AUD", "A$"),
    ("JPY", "¥"),
    ("CNY", "¥"),
    ("HRK", "kn"),
];

/// Display symbol for a currency code, case-insensitive.
pub fn currency_symbol(code: &str) -> &str {
    let code = code.trim();
    CURRENCY_SYMBOLS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map(|(_, symbol)| *symbol)
        .unwrap_or(code)
}

/// Rounds to cents and drops trailing zero decimals.
///
/// ## Example
/// ```rust
/// use regfee_core::format_price_without_zeros;
///
/// assert_eq!(format_price_without_zeros(450.0), "450");
/// assert_eq!(format_price_without_zeros(450.5), "450.5");
/// assert_eq!(format_price_without_zeros(450.567), "450.57");
/// ```
pub fn format_price_without_zeros(amount: f64) -> String {
    let fixed = format!("{:.2}", round_money(amount));
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `"<number> <symbol>"`, e.g. `"450 €"`.
pub fn format_price(amount: f64, currency: &str) -> String {
    format!(
        "{} {}",
        format_price_without_zeros(amount),
        currency_symbol(currency)
    )
}
