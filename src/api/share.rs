//! Share-code endpoints.

use crate::api::AppState;
use crate::error::AppError;
use crate::store::{share, Plan};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ShareCode {
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedPlan {
    pub plan: Plan,
    pub fingerprint: String,
}

pub async fn post_encode(Json(plan): Json<Plan>) -> Result<Json<ShareCode>, AppError> {
    let code = share::encode(&plan)?;
    Ok(Json(ShareCode { code }))
}

pub async fn post_decode(
    State(state): State<AppState>,
    Json(req): Json<ShareCode>,
) -> Result<Json<DecodedPlan>, AppError> {
    if req.code.len() > state.config.max_share_code_len {
        return Err(AppError::BadRequest(format!(
            "share code exceeds {} characters",
            state.config.max_share_code_len
        )));
    }

    let plan = share::decode(&req.code)?;
    let fingerprint = plan
        .fingerprint()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(DecodedPlan { plan, fingerprint }))
}
