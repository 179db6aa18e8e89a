//! Founder records and optional contribution inputs.

use crate::domain::{Decimal, EntityId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inputs used only for equity-split recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub work_hours: Decimal,
    pub hourly_rate: Decimal,
    pub cash_invested: Decimal,
}

impl Contribution {
    /// Monetary value of the contribution: hours at rate plus cash.
    pub fn value(&self) -> Decimal {
        self.work_hours * self.hourly_rate + self.cash_invested
    }
}

/// A company founder.
///
/// `equity` is a user-supplied percentage (0-100). Founder equities are not
/// normalized to sum to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Founder {
    pub id: EntityId,
    pub name: String,
    pub equity: Decimal,
    pub vesting_start: NaiveDate,
    pub cliff_months: u32,
    pub vesting_months: u32,
    #[serde(default)]
    pub departed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution: Option<Contribution>,
}

impl Founder {
    /// Create a founder with the standard 12-month cliff and 48-month vesting.
    pub fn new(name: impl Into<String>, equity: Decimal, vesting_start: NaiveDate) -> Self {
        Founder {
            id: EntityId::generate(),
            name: name.into(),
            equity,
            vesting_start,
            cliff_months: 12,
            vesting_months: 48,
            departed: false,
            departure_date: None,
            contribution: None,
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }

    pub fn with_contribution(mut self, contribution: Contribution) -> Self {
        self.contribution = Some(contribution);
        self
    }
}

/// Partial update applied by the plan store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FounderUpdate {
    pub name: Option<String>,
    pub equity: Option<Decimal>,
    pub vesting_start: Option<NaiveDate>,
    pub cliff_months: Option<u32>,
    pub vesting_months: Option<u32>,
    pub contribution: Option<Contribution>,
}

impl FounderUpdate {
    pub fn apply(&self, founder: &mut Founder) {
        if let Some(name) = &self.name {
            founder.name = name.clone();
        }
        if let Some(equity) = self.equity {
            founder.equity = equity;
        }
        if let Some(start) = self.vesting_start {
            founder.vesting_start = start;
        }
        if let Some(cliff) = self.cliff_months {
            founder.cliff_months = cliff;
        }
        if let Some(vesting) = self.vesting_months {
            founder.vesting_months = vesting;
        }
        if let Some(contribution) = &self.contribution {
            founder.contribution = Some(contribution.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_contribution_value() {
        let c = Contribution {
            work_hours: Decimal::new(dec!(1000)),
            hourly_rate: Decimal::new(dec!(50)),
            cash_invested: Decimal::new(dec!(25000)),
        };
        assert_eq!(c.value(), Decimal::new(dec!(75000)));
    }

    #[test]
    fn test_founder_update_is_partial() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut founder = Founder::new("Ada", Decimal::new(dec!(50)), start);
        let update = FounderUpdate {
            equity: Some(Decimal::new(dec!(60))),
            ..Default::default()
        };
        update.apply(&mut founder);
        assert_eq!(founder.equity, Decimal::new(dec!(60)));
        assert_eq!(founder.name, "Ada");
        assert_eq!(founder.cliff_months, 12);
    }

    #[test]
    fn test_founder_json_is_camel_case() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let founder =
            Founder::new("Ada", Decimal::new(dec!(50)), start).with_id(EntityId::new("f1"));
        let json = serde_json::to_value(&founder).unwrap();
        assert_eq!(json["vestingStart"], "2024-01-01");
        assert_eq!(json["cliffMonths"], 12);
        assert!(json.get("departureDate").is_none());
    }
}
