//! Cap-table replay.
//!
//! Founders are seeded from a fixed share baseline, then each round (in date
//! order) prices new shares off the running total, scales every existing
//! holder down, and appends the round's investor. Vested employee options are
//! added last. Only ratios are meaningful outside this module; the baseline is
//! a normalization unit.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    sort_rounds_by_date, Decimal, Founder, FundingRound, Stakeholder, StakeholderKind,
    StakeholderType,
};
use crate::engine::vesting::VestedGrant;

/// Share count that founder equity percentages are scaled against.
pub const BASELINE_SHARES: i64 = 10_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DilutionResult {
    pub post_money_valuation: Decimal,
    pub price_per_share: Decimal,
    pub new_shares: i64,
    pub total_shares_after: i64,
    pub dilution_percentage: Decimal,
    pub investor_ownership: Decimal,
}

/// Effect of one priced round on a company with `shares_before` outstanding.
///
/// Price is `pre_money / shares_before` (zero when there are no shares); new
/// shares are `investment / price` rounded half-up (zero when price is zero).
/// Share counts saturate at the i64 bounds.
pub fn round_dilution(
    pre_money: Decimal,
    investment: Decimal,
    shares_before: i64,
) -> DilutionResult {
    let post_money_valuation = pre_money + investment;
    let price_per_share = pre_money.safe_div(Decimal::from(shares_before));
    let new_shares = investment.safe_div(price_per_share).round_half_up().to_i64();
    let total_shares_after = shares_before.saturating_add(new_shares);
    let dilution_percentage =
        Decimal::from(new_shares).safe_div(Decimal::from(total_shares_after)) * Decimal::hundred();

    DilutionResult {
        post_money_valuation,
        price_per_share,
        new_shares,
        total_shares_after,
        dilution_percentage,
        investor_ownership: dilution_percentage,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapTable {
    pub stakeholders: Vec<Stakeholder>,
    pub total_shares: i64,
}

impl CapTable {
    /// Summed ownership of one stakeholder class, in percent.
    pub fn ownership_of(&self, kind: StakeholderType) -> Decimal {
        self.stakeholders
            .iter()
            .filter(|s| s.stakeholder_type() == kind)
            .map(|s| s.ownership)
            .sum()
    }

    /// Summed ownership across every stakeholder, in percent.
    pub fn total_ownership(&self) -> Decimal {
        self.stakeholders.iter().map(|s| s.ownership).sum()
    }
}

/// Running share ledger while rounds are applied in date order.
struct Replay {
    stakeholders: Vec<Stakeholder>,
    total_shares: i64,
}

impl Replay {
    fn seed(founders: &[Founder]) -> Self {
        let baseline = Decimal::from(BASELINE_SHARES);
        let stakeholders = founders
            .iter()
            .map(|f| Stakeholder {
                id: f.id.clone(),
                name: f.name.clone(),
                shares: (f.equity.safe_div(Decimal::hundred()) * baseline)
                    .round_half_up()
                    .to_i64(),
                ownership: Decimal::zero(),
                kind: StakeholderKind::Founder,
            })
            .collect();
        Replay {
            stakeholders,
            total_shares: BASELINE_SHARES,
        }
    }

    fn apply(&mut self, round: &FundingRound) {
        let dilution =
            round_dilution(round.pre_money_valuation, round.investment, self.total_shares);
        let keep = Decimal::one() - dilution.dilution_percentage.safe_div(Decimal::hundred());

        for holder in self.stakeholders.iter_mut() {
            holder.shares = (Decimal::from(holder.shares) * keep).round_half_up().to_i64();
        }

        debug!(
            round_id = %round.id,
            new_shares = dilution.new_shares,
            dilution_pct = %dilution.dilution_percentage,
            "Applied round dilution"
        );

        self.stakeholders.push(Stakeholder {
            id: round.id.clone(),
            name: round.investor_label(),
            shares: dilution.new_shares,
            ownership: Decimal::zero(),
            kind: StakeholderKind::Investor {
                round_id: round.id.clone(),
                round_type: round.round_type,
            },
        });

        self.total_shares = dilution.total_shares_after;
    }

    /// Cap table at the current point, with vested options appended.
    fn snapshot(&self, vested_grants: &[VestedGrant]) -> CapTable {
        let mut stakeholders = self.stakeholders.clone();
        let mut total_shares = self.total_shares;

        for vested in vested_grants.iter().filter(|v| v.vested_shares > 0) {
            stakeholders.push(Stakeholder {
                id: vested.grant.id.clone(),
                name: vested.grant.name.clone(),
                shares: vested.vested_shares,
                ownership: Decimal::zero(),
                kind: StakeholderKind::Employee {
                    role: vested.grant.role.clone(),
                },
            });
            total_shares = total_shares.saturating_add(vested.vested_shares);
        }

        let total = Decimal::from(total_shares);
        for holder in stakeholders.iter_mut() {
            holder.ownership = Decimal::from(holder.shares).safe_div(total) * Decimal::hundred();
        }

        CapTable {
            stakeholders,
            total_shares,
        }
    }
}

/// Current fully-diluted cap table.
///
/// Rounds are replayed in ascending date order regardless of input order.
/// Inputs are never mutated. Employees with no vested options are omitted.
pub fn current_ownership(
    founders: &[Founder],
    rounds: &[FundingRound],
    vested_grants: &[VestedGrant],
) -> CapTable {
    let mut ordered = rounds.to_vec();
    sort_rounds_by_date(&mut ordered);

    let mut replay = Replay::seed(founders);
    for round in &ordered {
        replay.apply(round);
    }
    replay.snapshot(vested_grants)
}

/// Cumulative dilution in percent after a sequence of per-round dilutions.
pub fn total_dilution(dilution_percentages: &[Decimal]) -> Decimal {
    Decimal::hundred() - ownership_after_rounds(Decimal::hundred(), dilution_percentages)
}

pub fn ownership_after_rounds(
    initial_ownership: Decimal,
    dilution_percentages: &[Decimal],
) -> Decimal {
    dilution_percentages.iter().fold(initial_ownership, |ownership, pct| {
        ownership * (Decimal::one() - pct.safe_div(Decimal::hundred()))
    })
}

/// Per-round dilution percentages produced while replaying `rounds` in date order.
pub fn round_dilutions(rounds: &[FundingRound]) -> Vec<Decimal> {
    let mut ordered = rounds.to_vec();
    sort_rounds_by_date(&mut ordered);
    let mut total_shares = BASELINE_SHARES;
    ordered
        .iter()
        .map(|round| {
            let dilution =
                round_dilution(round.pre_money_valuation, round.investment, total_shares);
            total_shares = dilution.total_shares_after;
            dilution.dilution_percentage
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipSnapshot {
    pub after_round: crate::domain::EntityId,
    pub date: chrono::NaiveDate,
    pub cap_table: CapTable,
}

/// Cap table after each round, in date order, built in one replay pass.
/// Vested options are included in every snapshot.
pub fn ownership_timeline(
    founders: &[Founder],
    rounds: &[FundingRound],
    vested_grants: &[VestedGrant],
) -> Vec<OwnershipSnapshot> {
    let mut ordered = rounds.to_vec();
    sort_rounds_by_date(&mut ordered);

    let mut replay = Replay::seed(founders);
    ordered
        .iter()
        .map(|round| {
            replay.apply(round);
            OwnershipSnapshot {
                after_round: round.id.clone(),
                date: round.date,
                cap_table: replay.snapshot(vested_grants),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapTableSummary {
    pub total_rounds: usize,
    pub total_raised: Decimal,
    pub latest_valuation: Decimal,
    pub founder_ownership: Decimal,
    pub investor_ownership: Decimal,
    pub employee_ownership: Decimal,
    pub total_dilution: Decimal,
}

pub fn summary(cap_table: &CapTable, rounds: &[FundingRound]) -> CapTableSummary {
    let mut ordered = rounds.to_vec();
    sort_rounds_by_date(&mut ordered);
    CapTableSummary {
        total_rounds: ordered.len(),
        total_raised: ordered.iter().map(|r| r.investment).sum(),
        latest_valuation: ordered
            .last()
            .map(|r| r.post_money_valuation())
            .unwrap_or_default(),
        founder_ownership: cap_table.ownership_of(StakeholderType::Founder),
        investor_ownership: cap_table.ownership_of(StakeholderType::Investor),
        employee_ownership: cap_table.ownership_of(StakeholderType::Employee),
        total_dilution: total_dilution(&round_dilutions(&ordered)),
    }
}
