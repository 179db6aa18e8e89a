//! Vesting endpoint.

use crate::engine::vesting::{vested_amount, vesting_schedule, VestingMilestone};
use crate::engine::VestingResult;
use crate::error::AppError;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Longest schedule the endpoint expands into milestones (100 years).
const MAX_VESTING_MONTHS: u32 = 1200;

fn default_cliff() -> u32 {
    12
}

fn default_vesting() -> u32 {
    48
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingRequest {
    pub grant_date: NaiveDate,
    pub as_of: NaiveDate,
    pub total_shares: i64,
    #[serde(default = "default_cliff")]
    pub cliff_months: u32,
    #[serde(default = "default_vesting")]
    pub vesting_months: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingResponse {
    #[serde(flatten)]
    pub result: VestingResult,
    pub schedule: Vec<VestingMilestone>,
}

pub async fn post_vesting(
    Json(req): Json<VestingRequest>,
) -> Result<Json<VestingResponse>, AppError> {
    if req.vesting_months > MAX_VESTING_MONTHS {
        return Err(AppError::BadRequest(format!(
            "vestingMonths must be at most {}",
            MAX_VESTING_MONTHS
        )));
    }

    let result = vested_amount(
        req.grant_date,
        req.as_of,
        req.total_shares,
        req.cliff_months,
        req.vesting_months,
    );
    let schedule = vesting_schedule(
        req.grant_date,
        req.total_shares,
        req.cliff_months,
        req.vesting_months,
    );
    Ok(Json(VestingResponse { result, schedule }))
}
