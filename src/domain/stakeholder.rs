//! Derived cap-table entries.

use crate::domain::{Decimal, EntityId, RoundType};
use serde::{Deserialize, Serialize};

/// Variant-specific data for a stakeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StakeholderKind {
    Founder,
    #[serde(rename_all = "camelCase")]
    Investor {
        round_id: EntityId,
        round_type: RoundType,
    },
    Employee {
        #[serde(default)]
        role: String,
    },
}

/// Coarse stakeholder class, used where only the class matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakeholderType {
    Founder,
    Investor,
    Employee,
}

impl StakeholderKind {
    pub fn stakeholder_type(&self) -> StakeholderType {
        match self {
            StakeholderKind::Founder => StakeholderType::Founder,
            StakeholderKind::Investor { .. } => StakeholderType::Investor,
            StakeholderKind::Employee { .. } => StakeholderType::Employee,
        }
    }
}

impl std::fmt::Display for StakeholderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StakeholderType::Founder => write!(f, "founder"),
            StakeholderType::Investor => write!(f, "investor"),
            StakeholderType::Employee => write!(f, "employee"),
        }
    }
}

/// One row of a computed cap table. Recomputed on every call, never mutated
/// in place by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stakeholder {
    pub id: EntityId,
    pub name: String,
    pub shares: i64,
    /// Percent of total shares (0-100).
    pub ownership: Decimal,
    #[serde(flatten)]
    pub kind: StakeholderKind,
}

impl Stakeholder {
    pub fn stakeholder_type(&self) -> StakeholderType {
        self.kind.stakeholder_type()
    }

    /// Round this stakeholder invested in, if it is an investor.
    pub fn round_id(&self) -> Option<&EntityId> {
        match &self.kind {
            StakeholderKind::Investor { round_id, .. } => Some(round_id),
            _ => None,
        }
    }

    pub fn is_common(&self) -> bool {
        matches!(
            self.kind,
            StakeholderKind::Founder | StakeholderKind::Employee { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_investor_serializes_with_type_tag() {
        let s = Stakeholder {
            id: EntityId::new("r1"),
            name: "Acme".to_string(),
            shares: 2_500_000,
            ownership: Decimal::new(dec!(20)),
            kind: StakeholderKind::Investor {
                round_id: EntityId::new("r1"),
                round_type: RoundType::Seed,
            },
        };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["type"], "investor");
        assert_eq!(json["roundId"], "r1");
        assert_eq!(json["roundType"], "seed");
        assert_eq!(json["ownership"], 20.0);

        let back: Stakeholder = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_common_classification() {
        let founder = Stakeholder {
            id: EntityId::new("f1"),
            name: "Ada".to_string(),
            shares: 1,
            ownership: Decimal::zero(),
            kind: StakeholderKind::Founder,
        };
        assert!(founder.is_common());
        assert_eq!(founder.round_id(), None);
        assert_eq!(founder.stakeholder_type(), StakeholderType::Founder);
    }
}
