pub mod health;
pub mod ownership;
pub mod share;
pub mod vesting;
pub mod warnings;
pub mod waterfall;

use crate::config::Config;
use crate::error::AppError;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

/// Reject requests carrying more funding rounds than the service replays.
pub(crate) fn ensure_round_limit(config: &Config, rounds: usize) -> Result<(), AppError> {
    if rounds > config.max_rounds {
        return Err(AppError::BadRequest(format!(
            "{} funding rounds exceeds the limit of {}",
            rounds, config.max_rounds
        )));
    }
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/vesting", post(vesting::post_vesting))
        .route("/v1/dilution", post(ownership::post_dilution))
        .route("/v1/ownership", post(ownership::post_ownership))
        .route("/v1/waterfall", post(waterfall::post_waterfall))
        .route("/v1/warnings", post(warnings::post_warnings))
        .route("/v1/share/encode", post(share::post_encode))
        .route("/v1/share/decode", post(share::post_decode));

    let router = if state.config.cors_allow_any {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    };

    router.with_state(state)
}
