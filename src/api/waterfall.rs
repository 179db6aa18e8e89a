//! Exit waterfall endpoint.

use crate::api::{ensure_round_limit, AppState};
use crate::domain::{Decimal, EntityId};
use crate::engine::returns::{annotate_returns, StakeholderReturn};
use crate::engine::waterfall::{breakeven_valuation, waterfall, WaterfallResult};
use crate::error::AppError;
use crate::store::Plan;
use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallRequest {
    pub plan: Plan,
    /// Explicit exit value. Takes precedence over `scenario_id`.
    pub exit_valuation: Option<Decimal>,
    /// A saved scenario in `plan` to read the exit value from.
    pub scenario_id: Option<EntityId>,
    pub exit_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallResponse {
    #[serde(flatten)]
    pub result: WaterfallResult,
    pub breakeven_valuation: Decimal,
    pub returns: Vec<StakeholderReturn>,
}

pub async fn post_waterfall(
    State(state): State<AppState>,
    Json(req): Json<WaterfallRequest>,
) -> Result<Json<WaterfallResponse>, AppError> {
    ensure_round_limit(&state.config, req.plan.rounds.len())?;

    let exit_valuation = match (req.exit_valuation, &req.scenario_id) {
        (Some(exit), _) => exit,
        (None, Some(id)) => req
            .plan
            .scenarios
            .iter()
            .find(|s| &s.id == id)
            .map(|s| s.exit_valuation)
            .ok_or_else(|| AppError::NotFound(format!("scenario {}", id)))?,
        (None, None) => {
            return Err(AppError::BadRequest(
                "exitValuation or scenarioId is required".into(),
            ))
        }
    };

    let cap_table = req.plan.cap_table();
    let result = waterfall(exit_valuation, &cap_table.stakeholders, &req.plan.rounds);
    let returns = annotate_returns(&result, &req.plan.rounds, req.exit_date);

    Ok(Json(WaterfallResponse {
        result,
        breakeven_valuation: breakeven_valuation(&req.plan.rounds),
        returns,
    }))
}
