//! Pure computation engine for vesting, dilution and exit payouts.
//!
//! Every function here is deterministic and total: degenerate input (zero
//! shares, zero valuations, empty lists) produces zero values, never an error.

pub mod dilution;
pub mod equity_split;
pub mod returns;
pub mod valuation;
pub mod vesting;
pub mod warnings;
pub mod waterfall;

pub use dilution::{
    current_ownership, ownership_after_rounds, ownership_timeline, round_dilution, summary,
    total_dilution, CapTable, CapTableSummary, DilutionResult, OwnershipSnapshot,
};
pub use equity_split::{
    recommend_split, validate_equity_split, SplitRecommendation, SplitValidation,
};
pub use returns::{annotate_returns, irr, moic, StakeholderReturn};
pub use vesting::{
    acceleration, founder_departure, total_vested_options, vest_grants, vested_amount,
    vesting_schedule, VestedGrant, VestingResult,
};
pub use warnings::{Severity, Warning, WarningLevel};
pub use waterfall::{
    breakeven_valuation, compare_with_pro_rata, payout_scenarios, waterfall, DistributionRecord,
    DistributionStage, StakeholderTotal, WaterfallResult,
};
