//! Investor return metrics over waterfall payouts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{days_between, Decimal, FundingRound, StakeholderType};
use crate::engine::waterfall::WaterfallResult;

const DAYS_PER_YEAR: f64 = 365.25;

/// Multiple on invested capital. Zero when nothing was invested.
pub fn moic(proceeds: Decimal, invested: Decimal) -> Decimal {
    proceeds.safe_div(invested)
}

/// Annualized internal rate of return, in percent.
///
/// Returns zero when `t1` is not after `t0`, when nothing was invested, or when
/// the rate is not a finite number.
pub fn irr(invested: Decimal, proceeds: Decimal, t0: NaiveDate, t1: NaiveDate) -> Decimal {
    let years = days_between(t1, t0) as f64 / DAYS_PER_YEAR;
    if years <= 0.0 || !invested.is_positive() {
        return Decimal::zero();
    }
    let multiple = proceeds.safe_div(invested).to_f64();
    let rate = (multiple.powf(1.0 / years) - 1.0) * 100.0;
    Decimal::from_f64(rate)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeholderReturn {
    pub stakeholder: String,
    #[serde(rename = "type")]
    pub kind: StakeholderType,
    pub proceeds: Decimal,
    pub invested: Decimal,
    pub moic: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irr: Option<Decimal>,
}

/// Returns for every stakeholder whose payout references funding rounds.
///
/// Invested capital is the sum of the referenced rounds' investments, each
/// counted once. IRR runs from the earliest referenced round to `exit_date`
/// and is omitted without one.
pub fn annotate_returns(
    result: &WaterfallResult,
    rounds: &[FundingRound],
    exit_date: Option<NaiveDate>,
) -> Vec<StakeholderReturn> {
    result
        .stakeholder_totals
        .iter()
        .filter_map(|total| {
            let mut referenced: Vec<&FundingRound> = Vec::new();
            for record in &total.breakdown {
                let Some(round_id) = record.round_id.as_ref() else {
                    continue;
                };
                if referenced.iter().any(|r| &r.id == round_id) {
                    continue;
                }
                if let Some(round) = rounds.iter().find(|r| &r.id == round_id) {
                    referenced.push(round);
                }
            }
            if referenced.is_empty() {
                return None;
            }

            let invested: Decimal = referenced.iter().map(|r| r.investment).sum();
            let entry = referenced.iter().map(|r| r.date).min();
            let irr = match (entry, exit_date) {
                (Some(t0), Some(t1)) => Some(irr(invested, total.total, t0, t1)),
                _ => None,
            };

            Some(StakeholderReturn {
                stakeholder: total.stakeholder.clone(),
                kind: total.kind,
                proceeds: total.total,
                invested,
                moic: moic(total.total, invested),
                irr,
            })
        })
        .collect()
}
