//! HTTP route modules

pub mod alerts;
pub mod events;
pub mod health;
pub mod maintenance;
pub mod reports;

use crate::core::lifecycle::MAX_LIST_LIMIT;
use crate::utils::error::EngineError;
use actix_web::{HttpResponse, web};

/// API prefix for everything except health checks
pub const API_PREFIX: &str = "/api/v1";

/// Standard API response structure
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: None,
        }
    }

    pub fn success_with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            success: true,
            data,
            meta: Some(meta),
        }
    }

    pub fn ok(self) -> HttpResponse {
        HttpResponse::Ok().json(self)
    }
}

/// Register every route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes).service(
        web::scope(API_PREFIX)
            .configure(alerts::configure_routes)
            .configure(maintenance::configure_routes)
            .configure(events::configure_routes)
            .configure(reports::configure_routes),
    );
}

/// Malformed JSON bodies answer with the engine's 400 envelope
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req| EngineError::validation(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| EngineError::validation(err.to_string()).into())
}

/// Clamp a requested page size
pub(crate) fn list_limit(requested: Option<u64>, default: u64) -> u64 {
    match requested {
        None | Some(0) => default,
        Some(n) => n.min(MAX_LIST_LIMIT),
    }
}
