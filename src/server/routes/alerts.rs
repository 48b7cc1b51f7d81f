//! Alert lifecycle endpoints

use crate::core::inference::Readings;
use crate::core::lifecycle::{DEFAULT_LIST_LIMIT, TransitionRequest};
use crate::core::models::{AlertFilter, AlertStatus, Severity};
use crate::server::routes::{ApiResponse, list_limit};
use crate::server::state::AppState;
use crate::utils::error::EngineError;
use actix_web::{HttpResponse, Result as ActixResult, web};
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/alerts")
            .route("", web::get().to(list_alerts))
            .route("/generate", web::post().to(generate_alert))
            .route("/{alert_id}", web::get().to(get_alert))
            .route("/{alert_id}/acknowledge", web::post().to(acknowledge_alert))
            .route("/{alert_id}/resolve", web::post().to(resolve_alert))
            .route("/{alert_id}/notifications", web::get().to(list_notifications)),
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertQuery {
    pub equipment_id: Option<String>,
    pub status: Option<String>,
    pub severity: Option<String>,
    pub limit: Option<u64>,
}

impl AlertQuery {
    fn into_filter(self) -> Result<AlertFilter, EngineError> {
        Ok(AlertFilter {
            equipment_id: self.equipment_id.filter(|e| !e.trim().is_empty()),
            status: self
                .status
                .as_deref()
                .map(str::parse::<AlertStatus>)
                .transpose()?,
            severity: self
                .severity
                .as_deref()
                .map(str::parse::<Severity>)
                .transpose()?,
            limit: list_limit(self.limit, DEFAULT_LIST_LIMIT),
        })
    }
}

/// `alerts/generate` body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub equipment_id: String,
    pub readings: Readings,
}

async fn list_alerts(
    state: web::Data<AppState>,
    query: web::Query<AlertQuery>,
) -> ActixResult<HttpResponse> {
    let filter = query.into_inner().into_filter()?;
    debug!(?filter, "Listing alerts");

    let alerts = state.lifecycle.list(filter).await?;
    let count = alerts.len();
    Ok(ApiResponse::success_with_meta(alerts, serde_json::json!({ "count": count })).ok())
}

async fn get_alert(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let alert = state.lifecycle.get(&path).await?;
    Ok(ApiResponse::success(alert).ok())
}

async fn acknowledge_alert(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<TransitionRequest>,
) -> ActixResult<HttpResponse> {
    let alert = state
        .lifecycle
        .acknowledge(&path, &body, Utc::now())
        .await?;
    Ok(ApiResponse::success(alert).ok())
}

async fn resolve_alert(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<TransitionRequest>,
) -> ActixResult<HttpResponse> {
    let alert = state.lifecycle.resolve(&path, &body, Utc::now()).await?;
    Ok(ApiResponse::success(alert).ok())
}

async fn list_notifications(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let alert = state.lifecycle.get(&path).await?;
    let jobs = state.store.list_notification_jobs(&alert.id).await?;
    Ok(ApiResponse::success(jobs).ok())
}

/// Run inference on raw readings, then admit the prediction like any
/// bus event
async fn generate_alert(
    state: web::Data<AppState>,
    body: web::Json<GenerateRequest>,
) -> ActixResult<HttpResponse> {
    let request = body.into_inner();
    let equipment_id = request.equipment_id.trim();
    if equipment_id.is_empty() {
        return Err(EngineError::validation("equipmentId cannot be empty").into());
    }
    if request.readings.is_empty() {
        return Err(EngineError::validation("readings cannot be empty").into());
    }

    let client = state
        .inference
        .as_ref()
        .ok_or_else(|| EngineError::inference("No inference service configured"))?;

    let event = client.predict(equipment_id, &request.readings).await?;
    let outcome = state.consumer.process_event(&event, Utc::now()).await?;
    info!(
        equipment_id = %equipment_id,
        prediction_id = %event.prediction_id,
        ?outcome,
        "Generated prediction processed"
    );

    Ok(ApiResponse::success(serde_json::json!({
        "prediction": event,
        "result": outcome,
    }))
    .ok())
}
