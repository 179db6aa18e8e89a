//! Valuation arithmetic.
//!
//! Every ratio returns zero on a zero denominator. Callers must read zero as
//! "not computable" where the business context demands it.

use serde::{Deserialize, Serialize};

use crate::domain::{Decimal, FundingRound, RoundType};

pub fn post_money(pre_money: Decimal, investment: Decimal) -> Decimal {
    pre_money + investment
}

pub fn pre_money(post_money: Decimal, investment: Decimal) -> Decimal {
    post_money - investment
}

pub fn price_per_share(post_money: Decimal, fully_diluted_shares: i64) -> Decimal {
    post_money.safe_div(Decimal::from(fully_diluted_shares))
}

/// Investor ownership in percent: `investment / post_money * 100`.
pub fn investor_ownership_pct(investment: Decimal, post_money: Decimal) -> Decimal {
    investment.safe_div(post_money) * Decimal::hundred()
}

pub fn valuation_from_price(price_per_share: Decimal, fully_diluted_shares: i64) -> Decimal {
    price_per_share * Decimal::from(fully_diluted_shares)
}

/// Shares outstanding once a pool of `pool_pct` percent of the fully-diluted
/// total is reserved on top of `common_shares`.
///
/// A pool of 100% or more returns `common_shares` unchanged.
pub fn fully_diluted_shares(common_shares: i64, pool_pct: Decimal) -> i64 {
    let pool_fraction = pool_pct.safe_div(Decimal::hundred());
    if pool_fraction >= Decimal::one() {
        return common_shares;
    }
    Decimal::from(common_shares)
        .safe_div(Decimal::one() - pool_fraction)
        .round_half_up()
        .to_i64()
}

/// Fair-market strike price as a discount off the latest preferred price.
pub fn strike_price_409a(preferred_price: Decimal, discount_pct: Decimal) -> Decimal {
    preferred_price * (Decimal::one() - discount_pct.safe_div(Decimal::hundred()))
}

/// Customary 409A discount, in percent.
pub fn default_409a_discount() -> Decimal {
    Decimal::from(40i64)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationPoint {
    pub date: chrono::NaiveDate,
    pub round_type: RoundType,
    pub pre_money_valuation: Decimal,
    pub investment: Decimal,
    pub post_money_valuation: Decimal,
    pub previous_valuation: Decimal,
    /// Percent change from the previous post-money.
    pub growth: Decimal,
}

/// Post-money step-up across rounds, in the order given.
pub fn valuation_history(rounds: &[FundingRound]) -> Vec<ValuationPoint> {
    let mut previous: Option<Decimal> = None;
    rounds
        .iter()
        .map(|round| {
            let post = round.post_money_valuation();
            let (previous_valuation, growth) = match previous {
                Some(prev) => (prev, (post - prev).safe_div(prev) * Decimal::hundred()),
                None => (Decimal::zero(), Decimal::zero()),
            };
            previous = Some(post);
            ValuationPoint {
                date: round.date,
                round_type: round.round_type,
                pre_money_valuation: round.pre_money_valuation,
                investment: round.investment,
                post_money_valuation: post,
                previous_valuation,
                growth,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DilutedValue {
    pub initial_ownership: Decimal,
    pub final_ownership: Decimal,
    pub dilution: Decimal,
    pub value: Decimal,
}

/// Ownership after compounding each round's `investment / post_money` dilution,
/// and what that stake is worth at `exit_valuation`.
pub fn diluted_value(
    initial_ownership: Decimal,
    rounds: &[FundingRound],
    exit_valuation: Decimal,
) -> DilutedValue {
    let final_ownership = rounds.iter().fold(initial_ownership, |ownership, round| {
        let dilution = round.investment.safe_div(round.post_money_valuation());
        ownership * (Decimal::one() - dilution)
    });
    DilutedValue {
        initial_ownership,
        final_ownership,
        dilution: initial_ownership - final_ownership,
        value: final_ownership.safe_div(Decimal::hundred()) * exit_valuation,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMetrics {
    pub revenue: Option<Decimal>,
    pub users: Option<Decimal>,
    pub mrr: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationMultiples {
    pub revenue_multiple: Option<Decimal>,
    pub user_multiple: Option<Decimal>,
    pub arr_multiple: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodValuation {
    pub method: String,
    pub valuation: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpliedValuation {
    pub valuations: Vec<MethodValuation>,
    pub average: Decimal,
    pub low: Decimal,
    pub high: Decimal,
}

/// Comparable-multiple valuation. A method applies only when both its metric
/// and its multiple are present and non-zero.
pub fn implied_valuation(
    metrics: &CompanyMetrics,
    multiples: &ValuationMultiples,
) -> ImpliedValuation {
    let twelve = Decimal::from(12i64);
    let candidates = [
        ("Revenue Multiple", metrics.revenue, multiples.revenue_multiple, Decimal::one()),
        ("User Multiple", metrics.users, multiples.user_multiple, Decimal::one()),
        ("ARR Multiple", metrics.mrr, multiples.arr_multiple, twelve),
    ];

    let valuations: Vec<MethodValuation> = candidates
        .into_iter()
        .filter_map(|(method, metric, multiple, annualize)| match (metric, multiple) {
            (Some(m), Some(x)) if !m.is_zero() && !x.is_zero() => Some(MethodValuation {
                method: method.to_string(),
                valuation: m * annualize * x,
            }),
            _ => None,
        })
        .collect();

    let sum: Decimal = valuations.iter().map(|v| v.valuation).sum();
    let average = sum.safe_div(Decimal::from(valuations.len() as i64));
    let low = valuations.iter().map(|v| v.valuation).min().unwrap_or_default();
    let high = valuations.iter().map(|v| v.valuation).max().unwrap_or_default();

    ImpliedValuation {
        valuations,
        average,
        low,
        high,
    }
}
