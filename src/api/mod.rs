pub mod audit;
pub mod availability;
pub mod health;
pub mod settlement;
pub mod time;

use crate::audit::AuditStore;
use crate::clock::ServerClock;
use crate::config::Config;
use crate::engine::SettlementEngine;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub clock: Arc<ServerClock>,
    pub audit: Arc<dyn AuditStore>,
    pub settlement: SettlementEngine,
}

impl AppState {
    pub fn new(config: Config, clock: Arc<ServerClock>, audit: Arc<dyn AuditStore>) -> Self {
        let settlement = config.settlement_engine();
        Self {
            config,
            clock,
            audit,
            settlement,
        }
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
        .route("/v1/time", get(time::get_time))
        .route("/v1/availability", post(availability::compute_availability))
        .route("/v1/settlement/verify", post(settlement::verify_settlement))
        .route("/v1/settlement/audit", get(audit::get_audit))
        .layer(cors)
        .with_state(state)
}
