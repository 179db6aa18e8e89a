pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod store;

pub use config::Config;
pub use domain::{
    Company, Decimal, EmployeeGrant, EntityId, ExitScenario, Founder, FundingRound, OptionPool,
    RoundType, Stakeholder, StakeholderType,
};
pub use error::AppError;
pub use store::{Plan, PlanStore};
