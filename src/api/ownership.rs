//! Dilution and cap-table endpoints.

use crate::api::{ensure_round_limit, AppState};
use crate::domain::{Decimal, EmployeeGrant, Founder, FundingRound};
use crate::engine::dilution::{
    current_ownership, ownership_timeline, round_dilution, summary, CapTable, CapTableSummary,
    DilutionResult, OwnershipSnapshot,
};
use crate::engine::vesting::vest_grants;
use crate::error::AppError;
use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DilutionRequest {
    pub pre_money: Decimal,
    pub investment: Decimal,
    pub shares_before: i64,
}

pub async fn post_dilution(Json(req): Json<DilutionRequest>) -> Json<DilutionResult> {
    Json(round_dilution(req.pre_money, req.investment, req.shares_before))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipRequest {
    #[serde(default)]
    pub founders: Vec<Founder>,
    #[serde(default)]
    pub rounds: Vec<FundingRound>,
    #[serde(default)]
    pub employees: Vec<EmployeeGrant>,
    /// Date employee vesting is measured at.
    pub as_of: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipResponse {
    pub cap_table: CapTable,
    pub summary: CapTableSummary,
    pub timeline: Vec<OwnershipSnapshot>,
}

pub async fn post_ownership(
    State(state): State<AppState>,
    Json(req): Json<OwnershipRequest>,
) -> Result<Json<OwnershipResponse>, AppError> {
    ensure_round_limit(&state.config, req.rounds.len())?;

    let vested = vest_grants(&req.employees, req.as_of);
    let cap_table = current_ownership(&req.founders, &req.rounds, &vested);
    let summary = summary(&cap_table, &req.rounds);
    let timeline = ownership_timeline(&req.founders, &req.rounds, &vested);
    Ok(Json(OwnershipResponse {
        cap_table,
        summary,
        timeline,
    }))
}
