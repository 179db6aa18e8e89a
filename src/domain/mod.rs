//! Domain types for the equity model.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Primitives: EntityId, RoundType, calendar-month helpers
//! - Input records: Founder, FundingRound, EmployeeGrant, OptionPool, ExitScenario
//! - The derived Stakeholder projection produced by the dilution engine

pub mod decimal;
pub mod founder;
pub mod grant;
pub mod primitives;
pub mod round;
pub mod scenario;
pub mod stakeholder;

pub use decimal::Decimal;
pub use founder::{Contribution, Founder, FounderUpdate};
pub use grant::{EmployeeGrant, EmployeeUpdate, OptionPool};
pub use primitives::{add_months, days_between, months_between, EntityId, RoundType};
pub use round::{sort_rounds_by_date, FundingRound, RoundUpdate};
pub use scenario::{Company, ExitScenario, ScenarioUpdate};
pub use stakeholder::{Stakeholder, StakeholderKind, StakeholderType};
