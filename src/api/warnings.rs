use crate::api::{ensure_round_limit, AppState};
use crate::engine::warnings::Warning;
use crate::error::AppError;
use crate::store::{plan_warnings, Plan};
use axum::extract::State;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct WarningsResponse {
    pub warnings: Vec<Warning>,
}

pub async fn post_warnings(
    State(state): State<AppState>,
    Json(plan): Json<Plan>,
) -> Result<Json<WarningsResponse>, AppError> {
    ensure_round_limit(&state.config, plan.rounds.len())?;
    Ok(Json(WarningsResponse {
        warnings: plan_warnings(&plan),
    }))
}
