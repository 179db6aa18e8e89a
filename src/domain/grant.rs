//! Employee option grants and the option pool.

use crate::domain::{Decimal, EntityId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An option grant to an employee. Vesting is computed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeGrant {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub options_granted: i64,
    pub grant_date: NaiveDate,
    #[serde(default)]
    pub strike_price: Decimal,
    pub cliff_months: u32,
    pub vesting_months: u32,
}

impl EmployeeGrant {
    /// Create a grant with the standard 12-month cliff and 48-month vesting.
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        options_granted: i64,
        grant_date: NaiveDate,
    ) -> Self {
        EmployeeGrant {
            id: EntityId::generate(),
            name: name.into(),
            role: role.into(),
            options_granted,
            grant_date,
            strike_price: Decimal::zero(),
            cliff_months: 12,
            vesting_months: 48,
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }

    pub fn with_schedule(mut self, cliff_months: u32, vesting_months: u32) -> Self {
        self.cliff_months = cliff_months;
        self.vesting_months = vesting_months;
        self
    }
}

/// Partial update applied by the plan store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
    pub options_granted: Option<i64>,
    pub grant_date: Option<NaiveDate>,
    pub strike_price: Option<Decimal>,
    pub cliff_months: Option<u32>,
    pub vesting_months: Option<u32>,
}

impl EmployeeUpdate {
    pub fn apply(&self, grant: &mut EmployeeGrant) {
        if let Some(name) = &self.name {
            grant.name = name.clone();
        }
        if let Some(role) = &self.role {
            grant.role = role.clone();
        }
        if let Some(options) = self.options_granted {
            grant.options_granted = options;
        }
        if let Some(date) = self.grant_date {
            grant.grant_date = date;
        }
        if let Some(strike) = self.strike_price {
            grant.strike_price = strike;
        }
        if let Some(cliff) = self.cliff_months {
            grant.cliff_months = cliff;
        }
        if let Some(vesting) = self.vesting_months {
            grant.vesting_months = vesting;
        }
    }
}

/// Option pool reserved for employees.
///
/// `size_percent` is always a percentage of fully-diluted shares;
/// `allocated` is always an absolute option count (the sum of grant sizes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionPool {
    pub size_percent: Decimal,
    pub allocated: i64,
}

impl Default for OptionPool {
    fn default() -> Self {
        OptionPool {
            size_percent: Decimal::from(10i64),
            allocated: 0,
        }
    }
}

impl OptionPool {
    /// Sum of all grant sizes, saturating at the i64 bounds.
    pub fn allocated_from(grants: &[EmployeeGrant]) -> i64 {
        grants
            .iter()
            .fold(0i64, |acc, g| acc.saturating_add(g.options_granted))
    }
}
