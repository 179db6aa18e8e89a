//! Company metadata and exit scenarios.

use crate::domain::{Decimal, EntityId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub founded_date: NaiveDate,
    /// Reference date for vesting and cap-table snapshots.
    pub current_date: NaiveDate,
}

/// A hypothetical exit. Pure input to the waterfall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitScenario {
    pub id: EntityId,
    pub name: String,
    pub exit_valuation: Decimal,
}

impl ExitScenario {
    pub fn new(name: impl Into<String>, exit_valuation: Decimal) -> Self {
        ExitScenario {
            id: EntityId::generate(),
            name: name.into(),
            exit_valuation,
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioUpdate {
    pub name: Option<String>,
    pub exit_valuation: Option<Decimal>,
}

impl ScenarioUpdate {
    pub fn apply(&self, scenario: &mut ExitScenario) {
        if let Some(name) = &self.name {
            scenario.name = name.clone();
        }
        if let Some(exit) = self.exit_valuation {
            scenario.exit_valuation = exit;
        }
    }
}
