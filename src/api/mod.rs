pub mod balances;
pub mod bonds;
pub mod health;
pub mod positions;

use crate::db::Repository;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/balances/:address", get(balances::get_balances))
        .route("/v1/bonds/:address", get(bonds::get_bond))
        .route("/v1/referrals/:address", get(bonds::get_referrals))
        .route("/v1/positions/:id", get(positions::get_position))
        .route(
            "/v1/pools/:pool_id/positions",
            get(positions::get_pool_positions),
        )
        .layer(cors)
        .with_state(state)
}
