//! Liveness and readiness checks

use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, warn};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(health_check))
            .route("/ready", web::get().to(readiness)),
    );
}

#[derive(Debug, Serialize)]
pub struct LivenessStatus {
    pub status: Cow<'static, str>,
    pub version: Cow<'static, str>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// The process is up and serving
pub async fn health_check() -> HttpResponse {
    debug!("Health check requested");
    HttpResponse::Ok().json(LivenessStatus {
        status: Cow::Borrowed("healthy"),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        timestamp: chrono::Utc::now(),
    })
}

/// Database reachable and every worker running
async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    let status = state.health.check_all().await;
    if status.ready {
        HttpResponse::Ok().json(status)
    } else {
        warn!(
            database = status.database.healthy,
            failed_workers = ?status.failed_workers,
            "Readiness check failed"
        );
        HttpResponse::ServiceUnavailable().json(status)
    }
}
