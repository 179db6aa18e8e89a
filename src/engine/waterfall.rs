//! Liquidation waterfall.
//!
//! Three phases:
//! 1. Preferences, most senior first. Seniority is reverse date order: a later
//!    round is paid ahead of an earlier one. Every round gets exactly one
//!    preference record, zero once proceeds run out.
//! 2. If anything is left, each non-participating round converts to common when
//!    its ownership share of the whole exit beats the preference it was paid.
//!    The remainder is split among common holders plus participating and
//!    converted investors, pro rata to ownership renormalized within that pool.
//! 3. Records are grouped by stakeholder display name.
//!
//! Date-ordered seniority is a modeling simplification; real terms can
//! negotiate seniority independently of round date.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Decimal, EntityId, FundingRound, RoundType, Stakeholder, StakeholderType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistributionStage {
    LiquidationPreference,
    ProRata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionRecord {
    /// Display name the record is grouped under.
    pub stakeholder: String,
    #[serde(rename = "type")]
    pub kind: StakeholderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_type: Option<RoundType>,
    pub stage: DistributionStage,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership: Option<Decimal>,
    #[serde(default)]
    pub converted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeholderTotal {
    pub stakeholder: String,
    #[serde(rename = "type")]
    pub kind: StakeholderType,
    pub total: Decimal,
    pub breakdown: Vec<DistributionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallResult {
    pub distribution: Vec<DistributionRecord>,
    pub stakeholder_totals: Vec<StakeholderTotal>,
    pub total_distributed: Decimal,
    pub exit_valuation: Decimal,
}

impl WaterfallResult {
    /// Payout for a display name; zero when the name received no record.
    pub fn total_for(&self, stakeholder: &str) -> Decimal {
        self.stakeholder_totals
            .iter()
            .find(|t| t.stakeholder == stakeholder)
            .map(|t| t.total)
            .unwrap_or_default()
    }
}

/// Distribute `exit_valuation` across `stakeholders` under the preference
/// terms of `rounds`.
///
/// Investor stakeholders are linked to rounds by round id. A round without a
/// linked investor is never converted; its preference still pays out.
pub fn waterfall(
    exit_valuation: Decimal,
    stakeholders: &[Stakeholder],
    rounds: &[FundingRound],
) -> WaterfallResult {
    let mut remaining = exit_valuation;
    let mut distribution: Vec<DistributionRecord> = Vec::new();

    let mut by_seniority = rounds.to_vec();
    by_seniority.sort_by(|a, b| b.date.cmp(&a.date));

    for round in &by_seniority {
        let amount = if remaining.is_positive() {
            round.preference_owed().min(remaining)
        } else {
            Decimal::zero()
        };
        debug!(round_id = %round.id, amount = %amount, "Paid liquidation preference");
        distribution.push(DistributionRecord {
            stakeholder: round.investor_label(),
            kind: StakeholderType::Investor,
            round_id: Some(round.id.clone()),
            round_type: Some(round.round_type),
            stage: DistributionStage::LiquidationPreference,
            amount,
            ownership: None,
            converted: false,
        });
        remaining -= amount;
    }

    if remaining.is_positive() {
        let mut sharing_rounds: HashSet<&EntityId> = by_seniority
            .iter()
            .filter(|r| r.participating)
            .map(|r| &r.id)
            .collect();

        for round in by_seniority.iter().filter(|r| !r.participating) {
            let Some(investor) = stakeholders.iter().find(|s| s.round_id() == Some(&round.id))
            else {
                continue;
            };
            let as_common = investor.ownership.safe_div(Decimal::hundred()) * exit_valuation;
            let Some(record) = distribution.iter_mut().find(|d| {
                d.stage == DistributionStage::LiquidationPreference
                    && d.round_id.as_ref() == Some(&round.id)
            }) else {
                continue;
            };
            if as_common > record.amount {
                remaining += record.amount;
                record.amount = Decimal::zero();
                record.converted = true;
                sharing_rounds.insert(&round.id);
            }
        }

        let pool: Vec<&Stakeholder> = stakeholders
            .iter()
            .filter(|s| s.is_common())
            .chain(stakeholders.iter().filter(|s| {
                s.round_id()
                    .map(|id| sharing_rounds.contains(id))
                    .unwrap_or(false)
            }))
            .collect();
        let pool_ownership: Decimal = pool.iter().map(|s| s.ownership).sum();
        let last = pool.len().saturating_sub(1);

        // The last holder takes whatever rounding left over so the split sums
        // to exactly `remaining`.
        let mut left = remaining;
        for (index, holder) in pool.into_iter().enumerate() {
            let amount = if pool_ownership.is_zero() {
                Decimal::zero()
            } else if index == last {
                left
            } else {
                (holder.ownership.safe_div(pool_ownership) * remaining).min(left)
            };
            left -= amount;
            distribution.push(DistributionRecord {
                stakeholder: holder.name.clone(),
                kind: holder.stakeholder_type(),
                round_id: holder.round_id().cloned(),
                round_type: None,
                stage: DistributionStage::ProRata,
                amount,
                ownership: Some(holder.ownership),
                converted: false,
            });
        }
    }

    let stakeholder_totals = aggregate(&distribution);
    let total_distributed = stakeholder_totals.iter().map(|t| t.total).sum();

    WaterfallResult {
        distribution,
        stakeholder_totals,
        total_distributed,
        exit_valuation,
    }
}

/// Group records by display name, keeping first-appearance order.
fn aggregate(distribution: &[DistributionRecord]) -> Vec<StakeholderTotal> {
    let mut totals: Vec<StakeholderTotal> = Vec::new();
    for record in distribution {
        match totals.iter_mut().find(|t| t.stakeholder == record.stakeholder) {
            Some(total) => {
                total.total += record.amount;
                total.breakdown.push(record.clone());
            }
            None => totals.push(StakeholderTotal {
                stakeholder: record.stakeholder.clone(),
                kind: record.kind,
                total: record.amount,
                breakdown: vec![record.clone()],
            }),
        }
    }
    totals
}

/// Exit value at which every preference is exactly covered.
pub fn breakeven_valuation(rounds: &[FundingRound]) -> Decimal {
    rounds.iter().map(|r| r.preference_owed()).sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutPoint {
    pub exit_valuation: Decimal,
    pub payout: Decimal,
    /// Payout as a percent of the exit.
    pub percentage: Decimal,
}

/// One stakeholder's payout across a range of exit values.
pub fn payout_scenarios(
    stakeholder: &str,
    exit_valuations: &[Decimal],
    stakeholders: &[Stakeholder],
    rounds: &[FundingRound],
) -> Vec<PayoutPoint> {
    exit_valuations
        .iter()
        .map(|&exit| {
            let payout = waterfall(exit, stakeholders, rounds).total_for(stakeholder);
            PayoutPoint {
                exit_valuation: exit,
                payout,
                percentage: payout.safe_div(exit) * Decimal::hundred(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceImpact {
    pub stakeholder: String,
    #[serde(rename = "type")]
    pub kind: StakeholderType,
    pub with_preferences: Decimal,
    pub pro_rata: Decimal,
    /// `with_preferences - pro_rata`.
    pub difference: Decimal,
}

/// Each stakeholder's waterfall payout against a plain ownership split.
pub fn compare_with_pro_rata(
    exit_valuation: Decimal,
    stakeholders: &[Stakeholder],
    rounds: &[FundingRound],
) -> Vec<PreferenceImpact> {
    let result = waterfall(exit_valuation, stakeholders, rounds);
    stakeholders
        .iter()
        .map(|s| {
            let with_preferences = result.total_for(&s.name);
            let pro_rata = s.ownership.safe_div(Decimal::hundred()) * exit_valuation;
            PreferenceImpact {
                stakeholder: s.name.clone(),
                kind: s.stakeholder_type(),
                with_preferences,
                pro_rata,
                difference: with_preferences - pro_rata,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StakeholderKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn founder(name: &str, ownership: rust_decimal::Decimal) -> Stakeholder {
        Stakeholder {
            id: EntityId::new(name),
            name: name.to_string(),
            shares: 0,
            ownership: Decimal::new(ownership),
            kind: StakeholderKind::Founder,
        }
    }

    fn investor(round: &FundingRound, ownership: rust_decimal::Decimal) -> Stakeholder {
        Stakeholder {
            id: round.id.clone(),
            name: round.investor_label(),
            shares: 0,
            ownership: Decimal::new(ownership),
            kind: StakeholderKind::Investor {
                round_id: round.id.clone(),
                round_type: round.round_type,
            },
        }
    }

    fn round(id: &str, y: i32, investment: rust_decimal::Decimal, lead: &str) -> FundingRound {
        FundingRound::new(
            NaiveDate::from_ymd_opt(y, 1, 1).unwrap(),
            RoundType::SeriesA,
            Decimal::zero(),
            Decimal::new(investment),
        )
        .with_id(EntityId::new(id))
        .with_lead_investors(&[lead])
    }

    #[test]
    fn test_every_round_gets_one_preference_record() {
        let a = round("a", 2021, dec!(10000000), "Early");
        let b = round("b", 2023, dec!(10000000), "Late");
        let holders = vec![
            founder("Ada", dec!(60)),
            investor(&a, dec!(20)),
            investor(&b, dec!(20)),
        ];
        let result = waterfall(Decimal::new(dec!(5000000)), &holders, &[a, b]);

        let prefs: Vec<_> = result
            .distribution
            .iter()
            .filter(|d| d.stage == DistributionStage::LiquidationPreference)
            .collect();
        assert_eq!(prefs.len(), 2);
        // Later round is senior.
        assert_eq!(prefs[0].stakeholder, "Late");
        assert_eq!(prefs[0].amount, Decimal::new(dec!(5000000)));
        assert_eq!(prefs[1].stakeholder, "Early");
        assert_eq!(prefs[1].amount, Decimal::zero());
        assert_eq!(result.total_for("Ada"), Decimal::zero());
    }

    #[test]
    fn test_round_without_investor_is_not_converted() {
        let a = round("a", 2022, dec!(1000000), "Orphan");
        let holders = vec![founder("Ada", dec!(100))];
        let result = waterfall(Decimal::new(dec!(100000000)), &holders, &[a]);
        assert_eq!(result.total_for("Orphan"), Decimal::new(dec!(1000000)));
        assert_eq!(result.total_for("Ada"), Decimal::new(dec!(99000000)));
        assert!(result.distribution.iter().all(|d| !d.converted));
    }

    #[test]
    fn test_zero_pool_ownership_pays_nothing_pro_rata() {
        let a = round("a", 2022, dec!(1000000), "Fund");
        let holders = vec![founder("Ada", dec!(0))];
        let result = waterfall(Decimal::new(dec!(5000000)), &holders, &[a]);
        assert_eq!(result.total_for("Ada"), Decimal::zero());
        assert_eq!(result.total_distributed, Decimal::new(dec!(1000000)));
    }

    #[test]
    fn test_breakeven_valuation() {
        let a = round("a", 2022, dec!(1000000), "A").with_preference(Decimal::new(dec!(2)), false);
        let b = round("b", 2023, dec!(3000000), "B");
        assert_eq!(breakeven_valuation(&[a, b]), Decimal::new(dec!(5000000)));
    }
}
