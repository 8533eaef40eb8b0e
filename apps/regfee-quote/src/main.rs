//! # regfee-quote
//!
//! Quotes a registration fee from a stored pricing config.
//!
//! ## Usage
//!
//! ```sh
//! # Regular fee right now
//! regfee-quote --pricing pricing.json
//!
//! # A fee type at a fixed instant, last-minute window from the start date
//! regfee-quote --pricing pricing.json --selector fee_type_vip \
//!     --now 2025-06-10 --conference-start 2025-06-15
//!
//! # Server-side check of the amount the client displayed
//! regfee-quote --pricing pricing.json --client-amount 450
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr, `RUST_LOG`)
//! 2. Load engine settings (defaults → file → `REGFEE_*` env)
//! 3. Read and validate the pricing config
//! 4. Quote, optionally verify the client amount
//! 5. Print JSON to stdout

mod config;
mod error;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::Parser;
use regfee_core::validation::validate_pricing_config;
use regfee_core::{
    format_price, parse_instant, ChargeAmountService, Conference, FeeSelector, PriceTable,
    PricingConfig, Registration, ResolvedPrice,
};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::load_settings;
use crate::error::{QuoteError, QuoteResult};

#[derive(Parser, Debug)]
#[command(
    name = "regfee-quote",
    version,
    about = "Quote a conference registration fee"
)]
struct Cli {
    /// Pricing config (JSON)
    #[arg(long)]
    pricing: PathBuf,

    /// Fee selector tag stored on the registration
    #[arg(long, default_value = "regular")]
    selector: String,

    /// Instant to price at, RFC 3339 or YYYY-MM-DD (default: now)
    #[arg(long)]
    now: Option<String>,

    /// Conference start, enables last-minute pricing
    #[arg(long)]
    conference_start: Option<String>,

    /// Amount shown to the client; fails when it no longer matches
    #[arg(long)]
    client_amount: Option<f64>,

    /// Engine settings file (TOML)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Fail instead of warning when the pricing config is invalid
    #[arg(long)]
    strict: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteOutput {
    fee_selector: FeeSelector,
    quote: ResolvedPrice,
    display: String,
    price_table: PriceTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_amount_accepted: Option<bool>,
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "Quote failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber on stderr so stdout stays pure JSON.
///
/// ## Log Levels
/// - `RUST_LOG=trace` - Show tier rule decisions
/// - Default: `info,regfee=debug`
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,regfee=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> QuoteResult<()> {
    let settings = load_settings(cli.settings)?;
    let service = ChargeAmountService::new(settings);

    let pricing = read_pricing(&cli.pricing)?;
    if let Err(err) = validate_pricing_config(&pricing) {
        if cli.strict {
            return Err(err.into());
        }
        warn!(%err, "Pricing config is invalid, quoting anyway");
    }

    let now = match cli.now.as_deref() {
        Some(raw) => parse_flag("--now", raw)?,
        None => Utc::now(),
    };

    let mut conference = Conference::new(pricing);
    if let Some(raw) = cli.conference_start.as_deref() {
        conference = conference.with_start_date(parse_flag("--conference-start", raw)?);
    }

    let registration = Registration::new(cli.selector.parse().unwrap_or_else(|e| match e {}));
    let quote = service.quote(&registration, &conference, now);
    info!(
        selector = %registration.fee_selector,
        tier = %quote.tier,
        gross = quote.gross_amount,
        currency = %quote.currency,
        "Quote ready"
    );

    let client_amount_accepted = match cli.client_amount {
        Some(submitted) => {
            service.verify_client_amount(&registration, &conference, now, submitted)?;
            Some(true)
        }
        None => None,
    };

    let output = QuoteOutput {
        display: format_price(quote.gross_amount, &quote.currency),
        price_table: service.price_table(&conference),
        fee_selector: registration.fee_selector,
        quote,
        client_amount_accepted,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn read_pricing(path: &Path) -> QuoteResult<PricingConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| QuoteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

fn parse_flag(flag: &'static str, raw: &str) -> QuoteResult<DateTime<Utc>> {
    parse_instant(raw).ok_or_else(|| QuoteError::InvalidDate {
        flag,
        value: raw.to_string(),
    })
}
