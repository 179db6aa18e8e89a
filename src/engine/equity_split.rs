//! Contribution-weighted founder equity split.

use serde::{Deserialize, Serialize};

use crate::domain::{Decimal, EntityId, Founder};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitRecommendation {
    pub founder_id: EntityId,
    pub name: String,
    /// Monetary value of the founder's contribution.
    pub contribution_value: Decimal,
    /// Recommended equity in percent.
    pub equity: Decimal,
}

/// Recommend equity in proportion to each founder's contribution value.
///
/// Falls back to an equal split when no founder has a positive contribution.
pub fn recommend_split(founders: &[Founder]) -> Vec<SplitRecommendation> {
    if founders.is_empty() {
        return Vec::new();
    }

    let values: Vec<Decimal> = founders
        .iter()
        .map(|f| f.contribution.as_ref().map(|c| c.value()).unwrap_or_default())
        .collect();
    let total: Decimal = values.iter().sum();
    let equal = Decimal::hundred().safe_div(Decimal::from(founders.len() as i64));

    founders
        .iter()
        .zip(values)
        .map(|(founder, value)| SplitRecommendation {
            founder_id: founder.id.clone(),
            name: founder.name.clone(),
            contribution_value: value,
            equity: if total.is_zero() {
                equal
            } else {
                value.safe_div(total) * Decimal::hundred()
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitValidation {
    pub valid: bool,
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check that equity percentages add up to 100 within 0.01.
pub fn validate_equity_split(equities: &[Decimal]) -> SplitValidation {
    let total: Decimal = equities.iter().sum();
    let tolerance = Decimal::new(rust_decimal::Decimal::new(1, 2));
    let valid = (total - Decimal::hundred()).abs() < tolerance;
    SplitValidation {
        valid,
        total,
        error: (!valid).then(|| {
            format!(
                "Equity split must equal 100% (currently {:.2}%)",
                total.inner()
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Contribution;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn founder(name: &str, hours: rust_decimal::Decimal, cash: rust_decimal::Decimal) -> Founder {
        Founder::new(
            name,
            Decimal::zero(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .with_contribution(Contribution {
            work_hours: Decimal::new(hours),
            hourly_rate: Decimal::new(dec!(100)),
            cash_invested: Decimal::new(cash),
        })
    }

    #[test]
    fn test_split_follows_contribution_value() {
        let founders = vec![
            founder("Ada", dec!(1000), dec!(50000)),
            founder("Grace", dec!(500), dec!(0)),
        ];
        let split = recommend_split(&founders);
        assert_eq!(split[0].contribution_value, Decimal::new(dec!(150000)));
        assert_eq!(split[0].equity, Decimal::new(dec!(75)));
        assert_eq!(split[1].equity, Decimal::new(dec!(25)));
    }

    #[test]
    fn test_split_without_contributions_is_equal() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let founders = vec![
            Founder::new("Ada", Decimal::zero(), date),
            Founder::new("Grace", Decimal::zero(), date),
        ];
        let split = recommend_split(&founders);
        assert!(split.iter().all(|s| s.equity == Decimal::new(dec!(50))));
        assert!(recommend_split(&[]).is_empty());
    }

    #[test]
    fn test_validate_equity_split() {
        let ok = validate_equity_split(&[Decimal::new(dec!(60)), Decimal::new(dec!(40))]);
        assert!(ok.valid);
        assert!(ok.error.is_none());

        let near = validate_equity_split(&[Decimal::new(dec!(60)), Decimal::new(dec!(39.995))]);
        assert!(near.valid);

        let bad = validate_equity_split(&[Decimal::new(dec!(60)), Decimal::new(dec!(30))]);
        assert!(!bad.valid);
        assert_eq!(bad.total, Decimal::new(dec!(90)));
        assert_eq!(
            bad.error.as_deref(),
            Some("Equity split must equal 100% (currently 90.00%)")
        );
    }
}
