//! # Tier Resolution
//!
//! Decides which pricing tier applies at an instant.
//!
//! ## Rule Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  #  Rule                          Condition                     Tier   │
//! │  ─  ────────────────────────────  ────────────────────────────  ─────  │
//! │  1  early_bird_open               now ≤ early_bird.deadline     early  │
//! │  2  late_started                  now ≥ late.start_date         late   │
//! │  3  regular_window_open           regular.start ≤ now ≤ end     reg.   │
//! │  4  regular_ended_without_late    regular.end < now, no late    reg.   │
//! │  5  last_minute                   0 ≤ conf.start − now ≤ 14d,   late   │
//! │                                   no late.start_date                   │
//! │  6  default                       always                        reg.   │
//! │                                                                         │
//! │  First match wins. No dates configured → always regular.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rule 4 keeps a conference on regular pricing forever once the regular
//! window closes without a late tier configured. It is a rule of its own so
//! that decision can be changed in one place.
//!
//! There is no stored state: the tier is derived fresh from `now` on every
//! call.

use chrono::{DateTime, Duration, Utc};

use crate::types::{PricingConfig, Tier};
use crate::LAST_MINUTE_WINDOW_DAYS;

/// Everything a tier rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct TierInputs<'a> {
    pub config: &'a PricingConfig,
    pub now: DateTime<Utc>,
    pub conference_start: Option<DateTime<Utc>>,
    pub last_minute_window: Duration,
}

/// One `(predicate, result)` pair of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct TierRule {
    pub name: &'static str,
    pub tier: Tier,
    pub applies: fn(&TierInputs<'_>) -> bool,
}

/// The tier that applied and the rule that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierDecision {
    pub tier: Tier,
    pub rule: &'static str,
}

// =============================================================================
// Rules
// =============================================================================

fn early_bird_open(input: &TierInputs<'_>) -> bool {
    input
        .config
        .early_bird
        .deadline
        .is_some_and(|deadline| input.now <= deadline)
}

fn late_started(input: &TierInputs<'_>) -> bool {
    input
        .config
        .late
        .start_date
        .is_some_and(|start| input.now >= start)
}

fn regular_started(input: &TierInputs<'_>) -> bool {
    input
        .config
        .regular
        .start_date
        .is_some_and(|start| input.now >= start)
}

fn regular_window_open(input: &TierInputs<'_>) -> bool {
    regular_started(input)
        && input
            .config
            .regular
            .end_date
            .map_or(true, |end| input.now <= end)
}

fn regular_ended_without_late(input: &TierInputs<'_>) -> bool {
    regular_started(input)
        && input
            .config
            .regular
            .end_date
            .is_some_and(|end| input.now > end)
        && input.config.late.start_date.is_none()
}

fn last_minute(input: &TierInputs<'_>) -> bool {
    if input.config.late.start_date.is_some() {
        return false;
    }
    input.conference_start.is_some_and(|start| {
        let until_start = start - input.now;
        until_start >= Duration::zero() && until_start <= input.last_minute_window
    })
}

fn always(_: &TierInputs<'_>) -> bool {
    true
}

/// The ordered rule table. Evaluated top to bottom; first match wins.
pub static TIER_RULES: [TierRule; 6] = [
    TierRule {
        name: "early_bird_open",
        tier: Tier::EarlyBird,
        applies: early_bird_open,
    },
    TierRule {
        name: "late_started",
        tier: Tier::Late,
        applies: late_started,
    },
    TierRule {
        name: "regular_window_open",
        tier: Tier::Regular,
        applies: regular_window_open,
    },
    TierRule {
        name: "regular_ended_without_late",
        tier: Tier::Regular,
        applies: regular_ended_without_late,
    },
    TierRule {
        name: "last_minute",
        tier: Tier::Late,
        applies: last_minute,
    },
    TierRule {
        name: "default",
        tier: Tier::Regular,
        applies: always,
    },
];

// =============================================================================
// Resolution
// =============================================================================

/// Runs the rule table and reports which rule matched.
pub fn explain_tier_with_window(
    config: &PricingConfig,
    now: DateTime<Utc>,
    conference_start: Option<DateTime<Utc>>,
    last_minute_window: Duration,
) -> TierDecision {
    let input = TierInputs {
        config,
        now,
        conference_start,
        last_minute_window,
    };

    let rule = TIER_RULES
        .iter()
        .find(|rule| (rule.applies)(&input))
        .unwrap_or(&TIER_RULES[TIER_RULES.len() - 1]);

    tracing::trace!(rule = rule.name, tier = %rule.tier, %now, "Resolved pricing tier");

    TierDecision {
        tier: rule.tier,
        rule: rule.name,
    }
}

/// [`explain_tier_with_window`] with the standard 14-day last-minute window.
pub fn explain_tier(
    config: &PricingConfig,
    now: DateTime<Utc>,
    conference_start: Option<DateTime<Utc>>,
) -> TierDecision {
    explain_tier_with_window(config, now, conference_start, default_window())
}

/// The tier that applies at `now`.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use regfee_core::{resolve_tier, PricingConfig, Tier};
///
/// // No dates configured: always regular
/// let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
/// assert_eq!(resolve_tier(&PricingConfig::default(), now, None), Tier::Regular);
/// ```
pub fn resolve_tier(
    config: &PricingConfig,
    now: DateTime<Utc>,
    conference_start: Option<DateTime<Utc>>,
) -> Tier {
    explain_tier(config, now, conference_start).tier
}

/// [`resolve_tier`] with an explicit last-minute window.
pub fn resolve_tier_with_window(
    config: &PricingConfig,
    now: DateTime<Utc>,
    conference_start: Option<DateTime<Utc>>,
    last_minute_window: Duration,
) -> Tier {
    explain_tier_with_window(config, now, conference_start, last_minute_window).tier
}

fn default_window() -> Duration {
    Duration::days(LAST_MINUTE_WINDOW_DAYS)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    /// Early bird until D1, regular window D1..D2, late from D2.
    fn three_tier_config() -> PricingConfig {
        let mut config = PricingConfig::default();
        config.early_bird.deadline = Some(date(2025, 1, 1));
        config.regular.start_date = Some(date(2025, 1, 1));
        config.regular.end_date = Some(date(2025, 3, 1));
        config.late.start_date = Some(date(2025, 3, 1));
        config
    }

    fn rule(name: &str) -> &'static TierRule {
        TIER_RULES.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn test_no_dates_is_always_regular() {
        let config = PricingConfig::default();
        for now in [date(2000, 1, 1), date(2025, 6, 1), date(2100, 1, 1)] {
            assert_eq!(resolve_tier(&config, now, None), Tier::Regular);
        }
    }

    #[test]
    fn test_tier_ordering() {
        let config = three_tier_config();
        assert_eq!(resolve_tier(&config, date(2024, 12, 31), None), Tier::EarlyBird);
        assert_eq!(resolve_tier(&config, date(2025, 2, 1), None), Tier::Regular);
        assert_eq!(resolve_tier(&config, date(2025, 3, 2), None), Tier::Late);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let config = three_tier_config();
        // now == deadline is still early bird
        assert_eq!(resolve_tier(&config, date(2025, 1, 1), None), Tier::EarlyBird);
        // now == late start is late
        assert_eq!(resolve_tier(&config, date(2025, 3, 1), None), Tier::Late);
    }

    #[test]
    fn test_early_bird_wins_over_late() {
        let mut config = PricingConfig::default();
        config.early_bird.deadline = Some(date(2025, 5, 1));
        config.late.start_date = Some(date(2025, 4, 1));
        assert_eq!(resolve_tier(&config, date(2025, 4, 15), None), Tier::EarlyBird);
    }

    #[test]
    fn test_regular_ended_without_late_stays_regular() {
        let mut config = PricingConfig::default();
        config.regular.start_date = Some(date(2025, 1, 1));
        config.regular.end_date = Some(date(2025, 2, 1));

        let decision = explain_tier(&config, date(2025, 6, 1), None);
        assert_eq!(decision.tier, Tier::Regular);
        assert_eq!(decision.rule, "regular_ended_without_late");
    }

    #[test]
    fn test_last_minute_window() {
        let mut config = PricingConfig::default();
        config.early_bird.deadline = Some(date(2025, 1, 1));
        let start = date(2025, 6, 15);

        // 14 days out: late
        let decision = explain_tier(&config, date(2025, 6, 1), Some(start));
        assert_eq!(decision, TierDecision { tier: Tier::Late, rule: "last_minute" });

        // 15 days out: regular
        assert_eq!(resolve_tier(&config, date(2025, 5, 31), Some(start)), Tier::Regular);

        // conference already started: regular
        assert_eq!(resolve_tier(&config, date(2025, 6, 16), Some(start)), Tier::Regular);

        // on the start instant itself: late
        assert_eq!(resolve_tier(&config, start, Some(start)), Tier::Late);
    }

    #[test]
    fn test_last_minute_ignored_when_late_configured() {
        let mut config = PricingConfig::default();
        config.late.start_date = Some(date(2025, 6, 10));
        // 5 days before start, but the explicit late tier has not started yet
        assert_eq!(
            resolve_tier(&config, date(2025, 6, 5), Some(date(2025, 6, 10))),
            Tier::Regular
        );
    }

    #[test]
    fn test_custom_window() {
        let config = PricingConfig::default();
        let start = date(2025, 6, 30);
        let now = date(2025, 6, 1);
        assert_eq!(resolve_tier(&config, now, Some(start)), Tier::Regular);
        assert_eq!(
            resolve_tier_with_window(&config, now, Some(start), Duration::days(30)),
            Tier::Late
        );
    }

    #[test]
    fn test_rules_are_individually_testable() {
        let config = three_tier_config();
        let input = TierInputs {
            config: &config,
            now: date(2025, 2, 1),
            conference_start: None,
            last_minute_window: Duration::days(14),
        };
        assert!(!(rule("early_bird_open").applies)(&input));
        assert!(!(rule("late_started").applies)(&input));
        assert!((rule("regular_window_open").applies)(&input));
        assert!(!(rule("regular_ended_without_late").applies)(&input));
        assert!((rule("default").applies)(&input));
    }

    #[test]
    fn test_rule_table_ends_with_default() {
        let last = TIER_RULES.last().unwrap();
        assert_eq!(last.name, "default");
        assert_eq!(last.tier, Tier::Regular);
    }
}
