//! Funding rounds.

use crate::domain::{Decimal, EntityId, RoundType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A priced equity round.
///
/// Post-money is derived from pre-money and investment on every read, so it
/// cannot go stale after a partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRound {
    pub id: EntityId,
    pub date: NaiveDate,
    pub round_type: RoundType,
    pub pre_money_valuation: Decimal,
    pub investment: Decimal,
    #[serde(default)]
    pub lead_investors: Vec<String>,
    /// Preference multiple (typically 1-3). Absent means 1x.
    #[serde(default = "Decimal::one")]
    pub liquidation_preference: Decimal,
    #[serde(default)]
    pub participating: bool,
    #[serde(default)]
    pub pro_rata_rights: bool,
}

impl FundingRound {
    /// Create a 1x non-participating round.
    pub fn new(
        date: NaiveDate,
        round_type: RoundType,
        pre_money_valuation: Decimal,
        investment: Decimal,
    ) -> Self {
        FundingRound {
            id: EntityId::generate(),
            date,
            round_type,
            pre_money_valuation,
            investment,
            lead_investors: Vec::new(),
            liquidation_preference: Decimal::one(),
            participating: false,
            pro_rata_rights: false,
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }

    pub fn with_lead_investors(mut self, investors: &[&str]) -> Self {
        self.lead_investors = investors.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_preference(mut self, multiple: Decimal, participating: bool) -> Self {
        self.liquidation_preference = multiple;
        self.participating = participating;
        self
    }

    pub fn post_money_valuation(&self) -> Decimal {
        self.pre_money_valuation + self.investment
    }

    /// Display name of the round's investor: joined lead investors or "Investor".
    pub fn investor_label(&self) -> String {
        if self.lead_investors.is_empty() {
            "Investor".to_string()
        } else {
            self.lead_investors.join(", ")
        }
    }

    /// Amount owed ahead of common: investment times the preference multiple.
    pub fn preference_owed(&self) -> Decimal {
        self.investment * self.liquidation_preference
    }
}

/// Partial update applied by the plan store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundUpdate {
    pub date: Option<NaiveDate>,
    pub round_type: Option<RoundType>,
    pub pre_money_valuation: Option<Decimal>,
    pub investment: Option<Decimal>,
    pub lead_investors: Option<Vec<String>>,
    pub liquidation_preference: Option<Decimal>,
    pub participating: Option<bool>,
    pub pro_rata_rights: Option<bool>,
}

impl RoundUpdate {
    pub fn apply(&self, round: &mut FundingRound) {
        if let Some(date) = self.date {
            round.date = date;
        }
        if let Some(round_type) = self.round_type {
            round.round_type = round_type;
        }
        if let Some(pre) = self.pre_money_valuation {
            round.pre_money_valuation = pre;
        }
        if let Some(investment) = self.investment {
            round.investment = investment;
        }
        if let Some(investors) = &self.lead_investors {
            round.lead_investors = investors.clone();
        }
        if let Some(multiple) = self.liquidation_preference {
            round.liquidation_preference = multiple;
        }
        if let Some(participating) = self.participating {
            round.participating = participating;
        }
        if let Some(pro_rata) = self.pro_rata_rights {
            round.pro_rata_rights = pro_rata;
        }
    }
}

/// Sort rounds ascending by date; ties keep their input order.
pub fn sort_rounds_by_date(rounds: &mut [FundingRound]) {
    rounds.sort_by_key(|r| r.date);
}
