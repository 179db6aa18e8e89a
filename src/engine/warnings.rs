//! Advisory checks on plan terms.
//!
//! Nothing here rejects input. Each check returns at most one [`Warning`].

use serde::{Deserialize, Serialize};

use crate::domain::{Decimal, Founder, OptionPool, RoundType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    /// What the warning is about, e.g. `founders`, `optionPool`, `round-0`.
    #[serde(default)]
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_type: Option<RoundType>,
    #[serde(rename = "type")]
    pub level: WarningLevel,
    pub severity: Severity,
    pub message: String,
    pub suggestion: String,
}

impl Warning {
    fn new(level: WarningLevel, severity: Severity, message: String, suggestion: &str) -> Self {
        Warning {
            source: String::new(),
            round_type: None,
            level,
            severity,
            message,
            suggestion: suggestion.to_string(),
        }
    }

    /// Tag the warning with what it is about, e.g. `founders` or `round-0`.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

fn d(value: i64) -> Decimal {
    Decimal::from(value)
}

pub fn check_excessive_dilution(dilution_pct: Decimal) -> Option<Warning> {
    if dilution_pct > d(40) {
        Some(Warning::new(
            WarningLevel::Warning,
            Severity::High,
            format!(
                "This round dilutes existing shareholders by {:.1}%. Dilution over 40% in a single round is unusually high.",
                dilution_pct.inner()
            ),
            "Consider negotiating a higher valuation or a smaller investment.",
        ))
    } else if dilution_pct > d(30) {
        Some(Warning::new(
            WarningLevel::Warning,
            Severity::Medium,
            format!(
                "This round dilutes existing shareholders by {:.1}%, on the high end of typical dilution.",
                dilution_pct.inner()
            ),
            "Check that valuation and investment terms match the market.",
        ))
    } else {
        None
    }
}

/// Pool size and utilization. `pool_shares` is the absolute number of
/// options the pool reserves.
pub fn check_option_pool(pool: &OptionPool, pool_shares: i64) -> Option<Warning> {
    if pool.size_percent.is_positive() && pool.size_percent < d(10) {
        return Some(Warning::new(
            WarningLevel::Warning,
            Severity::Medium,
            format!(
                "An option pool of {:.1}% is small. Early-stage companies typically reserve 10-20% of fully diluted shares.",
                pool.size_percent.inner()
            ),
            "Consider increasing the option pool to attract hires.",
        ));
    }

    let utilization = Decimal::from(pool.allocated).safe_div(Decimal::from(pool_shares)) * d(100);
    if utilization > d(90) {
        Some(Warning::new(
            WarningLevel::Warning,
            Severity::High,
            format!(
                "The option pool is {:.0}% utilized. There may not be enough options for competitive offers.",
                utilization.inner()
            ),
            "Plan a pool refresh in the next funding round.",
        ))
    } else if utilization > d(75) {
        Some(Warning::new(
            WarningLevel::Info,
            Severity::Low,
            format!(
                "The option pool is {:.0}% utilized. Start planning a refresh.",
                utilization.inner()
            ),
            "Discuss pool expansion with the board and investors.",
        ))
    } else {
        None
    }
}

pub fn check_founder_split(founders: &[Founder]) -> Option<Warning> {
    let mut equities: Vec<Decimal> = founders.iter().map(|f| f.equity).collect();
    equities.sort_by(|a, b| b.cmp(a));

    match equities.as_slice() {
        [first, second] => {
            let gap = (*first - *second).abs();
            (gap > d(30)).then(|| {
                Warning::new(
                    WarningLevel::Info,
                    Severity::Medium,
                    format!(
                        "Co-founder equity differs by {:.0} points. Large gaps can cause tension.",
                        gap.inner()
                    ),
                    "Make sure the split reflects long-term contribution and commitment.",
                )
            })
        }
        [first, _, _, ..] if *first > d(60) => Some(Warning::new(
            WarningLevel::Info,
            Severity::Low,
            format!(
                "One founder holds {:.0}% equity. Fine if intentional, but check that every founder feels fairly treated.",
                first.inner()
            ),
            "Use the contribution-weighted split to compare.",
        )),
        _ => None,
    }
}

pub fn check_vesting_schedule(cliff_months: u32, vesting_months: u32) -> Option<Warning> {
    if vesting_months < 36 {
        Some(Warning::new(
            WarningLevel::Warning,
            Severity::Medium,
            format!("A vesting period of {vesting_months} months is shorter than the typical 48."),
            "Standard vesting is 4 years with a 1-year cliff.",
        ))
    } else if cliff_months == 0 {
        Some(Warning::new(
            WarningLevel::Info,
            Severity::Low,
            "No cliff. Equity starts vesting immediately.".to_string(),
            "A 12-month cliff is standard.",
        ))
    } else if cliff_months > 12 {
        Some(Warning::new(
            WarningLevel::Info,
            Severity::Low,
            format!("A cliff of {cliff_months} months is longer than the standard 12."),
            "Extended cliffs make offers less competitive.",
        ))
    } else {
        None
    }
}

pub fn check_liquidation_preference(multiple: Decimal, participating: bool) -> Option<Warning> {
    let shown = multiple.to_canonical_string();
    if multiple > d(1) && participating {
        Some(Warning::new(
            WarningLevel::Warning,
            Severity::High,
            format!("A {shown}x participating preference is very investor-favorable and rare."),
            "This sharply reduces founder returns at exit. Seek legal counsel.",
        ))
    } else if multiple > d(2) {
        Some(Warning::new(
            WarningLevel::Warning,
            Severity::High,
            format!("A {shown}x liquidation preference is extremely high."),
            "Negotiate better terms before accepting.",
        ))
    } else if multiple > d(1) {
        Some(Warning::new(
            WarningLevel::Info,
            Severity::Medium,
            format!(
                "A {shown}x preference returns {shown}x the investment before common holders see anything."
            ),
            "Standard terms are 1x non-participating.",
        ))
    } else if participating {
        Some(Warning::new(
            WarningLevel::Info,
            Severity::Low,
            "Participating preferred collects its preference and a pro-rata share of the rest."
                .to_string(),
            "Non-participating preferred is more founder-friendly.",
        ))
    } else {
        None
    }
}

/// Founder dilution from `initial_equity` to `current_equity`, both in percent.
pub fn check_cumulative_dilution(
    initial_equity: Decimal,
    current_equity: Decimal,
) -> Option<Warning> {
    if initial_equity.is_zero() {
        return None;
    }
    let dilution = (initial_equity - current_equity).safe_div(initial_equity) * d(100);
    if dilution > d(60) {
        Some(Warning::new(
            WarningLevel::Warning,
            Severity::High,
            format!(
                "Founders have been diluted by {:.0}%. Cumulative dilution over 60% is concerning.",
                dilution.inner()
            ),
            "Consider whether further rounds are necessary.",
        ))
    } else if dilution > d(40) {
        Some(Warning::new(
            WarningLevel::Info,
            Severity::Medium,
            format!(
                "Founders have been diluted by {:.0}%, typical after several rounds.",
                dilution.inner()
            ),
            "Check that remaining ownership still carries meaningful upside.",
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn founder(equity: i64) -> Founder {
        Founder::new(
            "F",
            Decimal::from(equity),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_dilution_thresholds() {
        assert_eq!(check_excessive_dilution(d(45)).unwrap().severity, Severity::High);
        assert_eq!(check_excessive_dilution(d(35)).unwrap().severity, Severity::Medium);
        assert!(check_excessive_dilution(d(30)).is_none());
    }

    #[test]
    fn test_option_pool_checks() {
        let small = OptionPool {
            size_percent: d(5),
            allocated: 0,
        };
        assert_eq!(check_option_pool(&small, 500_000).unwrap().severity, Severity::Medium);

        let full = OptionPool {
            size_percent: d(10),
            allocated: 950_000,
        };
        assert_eq!(check_option_pool(&full, 1_000_000).unwrap().severity, Severity::High);

        let busy = OptionPool {
            size_percent: d(10),
            allocated: 800_000,
        };
        let w = check_option_pool(&busy, 1_000_000).unwrap();
        assert_eq!(w.severity, Severity::Low);
        assert_eq!(w.level, WarningLevel::Info);

        assert!(check_option_pool(&OptionPool::default(), 0).is_none());
    }

    #[test]
    fn test_founder_split() {
        let uneven = check_founder_split(&[founder(70), founder(30)]).unwrap();
        assert_eq!(uneven.severity, Severity::Medium);
        assert!(check_founder_split(&[founder(60), founder(40)]).is_none());

        let dominant = check_founder_split(&[founder(70), founder(20), founder(10)]).unwrap();
        assert_eq!(dominant.severity, Severity::Low);
        assert!(check_founder_split(&[founder(100)]).is_none());
        assert!(check_founder_split(&[]).is_none());
    }

    #[test]
    fn test_vesting_schedule() {
        assert_eq!(check_vesting_schedule(12, 24).unwrap().severity, Severity::Medium);
        assert_eq!(check_vesting_schedule(0, 48).unwrap().severity, Severity::Low);
        assert_eq!(check_vesting_schedule(18, 48).unwrap().severity, Severity::Low);
        assert!(check_vesting_schedule(12, 48).is_none());
    }

    #[test]
    fn test_liquidation_preference_order() {
        let participating_2x = check_liquidation_preference(d(2), true).unwrap();
        assert_eq!(participating_2x.severity, Severity::High);
        assert!(participating_2x.message.contains("2x participating"));
        assert_eq!(check_liquidation_preference(d(3), false).unwrap().severity, Severity::High);
        assert_eq!(
            check_liquidation_preference(Decimal::new(dec!(1.5)), false).unwrap().severity,
            Severity::Medium
        );
        assert_eq!(check_liquidation_preference(d(1), true).unwrap().severity, Severity::Low);
        assert!(check_liquidation_preference(d(1), false).is_none());
    }

    #[test]
    fn test_cumulative_dilution() {
        assert!(check_cumulative_dilution(Decimal::zero(), d(10)).is_none());
        assert_eq!(check_cumulative_dilution(d(100), d(30)).unwrap().severity, Severity::High);
        assert_eq!(check_cumulative_dilution(d(100), d(50)).unwrap().severity, Severity::Medium);
        assert!(check_cumulative_dilution(d(100), d(70)).is_none());
    }
}
