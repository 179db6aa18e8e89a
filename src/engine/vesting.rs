//! Cliff-plus-linear vesting.
//!
//! Whole calendar months decide the cliff and the fully-vested cutoff. Between
//! the two, vesting accrues by elapsed days over `vesting_months * 30.44`, which
//! gives a smooth curve rather than monthly steps.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::{
    add_months, days_between, months_between, Decimal, EmployeeGrant, EntityId, Founder,
};

/// Average days per month used for linear accrual.
pub const AVG_DAYS_PER_MONTH: Decimal = Decimal::new(dec!(30.44));

/// Quarterly cadence for milestone schedules.
const MILESTONE_INTERVAL_MONTHS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingResult {
    pub vested_shares: i64,
    pub unvested_shares: i64,
    pub percent_vested: Decimal,
    pub months_remaining: i64,
    pub cliff_remaining: i64,
}

/// Vested amount of `total_granted` as of `as_of`.
///
/// Before the cliff nothing is vested, including when `as_of` precedes the
/// grant. At or beyond `vesting_months` everything is vested.
pub fn vested_amount(
    grant_date: NaiveDate,
    as_of: NaiveDate,
    total_granted: i64,
    cliff_months: u32,
    vesting_months: u32,
) -> VestingResult {
    let months_elapsed = months_between(as_of, grant_date);
    let cliff = i64::from(cliff_months);
    let vesting = i64::from(vesting_months);

    if months_elapsed < cliff {
        return VestingResult {
            vested_shares: 0,
            unvested_shares: total_granted,
            percent_vested: Decimal::zero(),
            months_remaining: vesting.saturating_sub(months_elapsed),
            cliff_remaining: cliff.saturating_sub(months_elapsed),
        };
    }

    if months_elapsed >= vesting {
        return VestingResult {
            vested_shares: total_granted,
            unvested_shares: 0,
            percent_vested: Decimal::hundred(),
            months_remaining: 0,
            cliff_remaining: 0,
        };
    }

    let days_elapsed = Decimal::from(days_between(as_of, grant_date));
    let total_days = Decimal::from(vesting_months) * AVG_DAYS_PER_MONTH;
    let percent_vested = days_elapsed.safe_div(total_days) * Decimal::hundred();
    let vested_shares = (percent_vested.safe_div(Decimal::hundred()) * Decimal::from(total_granted))
        .floor()
        .to_i64();

    VestingResult {
        vested_shares,
        unvested_shares: total_granted.saturating_sub(vested_shares),
        percent_vested,
        months_remaining: vesting.saturating_sub(months_elapsed),
        cliff_remaining: 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneKind {
    Cliff,
    Quarterly,
    Final,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingMilestone {
    pub date: Option<NaiveDate>,
    pub month: u32,
    pub shares: i64,
    pub cumulative_shares: i64,
    pub kind: MilestoneKind,
    pub percent_vested: Decimal,
}

/// Cliff milestone, then one every quarter up to `vesting_months`, then a final
/// milestone when the vesting length is not a multiple of three.
pub fn vesting_schedule(
    grant_date: NaiveDate,
    total_shares: i64,
    cliff_months: u32,
    vesting_months: u32,
) -> Vec<VestingMilestone> {
    if vesting_months == 0 {
        return Vec::new();
    }

    let total = Decimal::from(total_shares);
    let vesting = Decimal::from(vesting_months);
    let fraction = |month: u32| Decimal::from(month).safe_div(vesting);

    let cliff_shares = (fraction(cliff_months) * total).floor().to_i64();
    let mut milestones = vec![VestingMilestone {
        date: add_months(grant_date, i64::from(cliff_months)),
        month: cliff_months,
        shares: cliff_shares,
        cumulative_shares: cliff_shares,
        kind: MilestoneKind::Cliff,
        percent_vested: fraction(cliff_months) * Decimal::hundred(),
    }];

    let mut next = cliff_months.checked_add(MILESTONE_INTERVAL_MONTHS);
    while let Some(month) = next.filter(|m| *m <= vesting_months) {
        let cumulative = (fraction(month) * total).floor().to_i64();
        let previous = milestones.last().map_or(0, |m| m.cumulative_shares);
        milestones.push(VestingMilestone {
            date: add_months(grant_date, i64::from(month)),
            month,
            shares: cumulative.saturating_sub(previous),
            cumulative_shares: cumulative,
            kind: MilestoneKind::Quarterly,
            percent_vested: fraction(month) * Decimal::hundred(),
        });
        next = month.checked_add(MILESTONE_INTERVAL_MONTHS);
    }

    if vesting_months % MILESTONE_INTERVAL_MONTHS != 0 {
        let previous = milestones.last().map_or(0, |m| m.cumulative_shares);
        milestones.push(VestingMilestone {
            date: add_months(grant_date, i64::from(vesting_months)),
            month: vesting_months,
            shares: total_shares.saturating_sub(previous),
            cumulative_shares: total_shares,
            kind: MilestoneKind::Final,
            percent_vested: Decimal::hundred(),
        });
    }

    milestones
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureResult {
    pub founder_id: EntityId,
    pub departure_date: NaiveDate,
    pub vested_shares: i64,
    pub unvested_shares: i64,
    /// Unvested shares returned to the company.
    pub forfeited_shares: i64,
}

/// Reverse-vesting outcome for a founder leaving on `departure_date`.
pub fn founder_departure(
    founder: &Founder,
    departure_date: NaiveDate,
    total_shares: i64,
) -> DepartureResult {
    let vesting = vested_amount(
        founder.vesting_start,
        departure_date,
        total_shares,
        founder.cliff_months,
        founder.vesting_months,
    );
    DepartureResult {
        founder_id: founder.id.clone(),
        departure_date,
        vested_shares: vesting.vested_shares,
        unvested_shares: vesting.unvested_shares,
        forfeited_shares: vesting.unvested_shares,
    }
}

/// A grant paired with its vested option count as of some date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VestedGrant {
    pub grant: EmployeeGrant,
    pub vested_shares: i64,
}

/// Vest every grant as of `as_of`, preserving input order.
pub fn vest_grants(grants: &[EmployeeGrant], as_of: NaiveDate) -> Vec<VestedGrant> {
    grants
        .iter()
        .map(|grant| VestedGrant {
            grant: grant.clone(),
            vested_shares: vested_amount(
                grant.grant_date,
                as_of,
                grant.options_granted,
                grant.cliff_months,
                grant.vesting_months,
            )
            .vested_shares,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingTotals {
    pub total_granted: i64,
    pub total_vested: i64,
    pub total_unvested: i64,
    pub percent_vested: Decimal,
}

pub fn total_vested_options(grants: &[EmployeeGrant], as_of: NaiveDate) -> VestingTotals {
    let mut totals = VestingTotals {
        total_granted: 0,
        total_vested: 0,
        total_unvested: 0,
        percent_vested: Decimal::zero(),
    };
    for grant in grants {
        let vesting = vested_amount(
            grant.grant_date,
            as_of,
            grant.options_granted,
            grant.cliff_months,
            grant.vesting_months,
        );
        totals.total_granted = totals.total_granted.saturating_add(grant.options_granted);
        totals.total_vested = totals.total_vested.saturating_add(vesting.vested_shares);
        totals.total_unvested = totals.total_unvested.saturating_add(vesting.unvested_shares);
    }
    totals.percent_vested = Decimal::from(totals.total_vested)
        .safe_div(Decimal::from(totals.total_granted))
        * Decimal::hundred();
    totals
}

pub fn monthly_vesting_rate(total_shares: i64, vesting_months: u32) -> Decimal {
    Decimal::from(total_shares).safe_div(Decimal::from(vesting_months))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccelerationResult {
    #[serde(flatten)]
    pub vesting: VestingResult,
    pub accelerated_shares: i64,
    pub total_vested_with_acceleration: i64,
    pub remaining_unvested: i64,
}

/// Accelerate `acceleration_pct` percent of the unvested remainder at exit.
pub fn acceleration(
    grant_date: NaiveDate,
    exit_date: NaiveDate,
    total_shares: i64,
    cliff_months: u32,
    vesting_months: u32,
    acceleration_pct: Decimal,
) -> AccelerationResult {
    let vesting = vested_amount(grant_date, exit_date, total_shares, cliff_months, vesting_months);
    let accelerated_shares = (Decimal::from(vesting.unvested_shares)
        * acceleration_pct.safe_div(Decimal::hundred()))
    .floor()
    .to_i64();
    AccelerationResult {
        accelerated_shares,
        total_vested_with_acceleration: vesting.vested_shares.saturating_add(accelerated_shares),
        remaining_unvested: vesting.unvested_shares.saturating_sub(accelerated_shares),
        vesting,
    }
}
