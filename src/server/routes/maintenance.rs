//! Maintenance scheduling endpoints

use crate::core::models::ScheduleTaskRequest;
use crate::server::routes::{ApiResponse, list_limit};
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use chrono::Utc;
use serde::Deserialize;

const DEFAULT_TASK_LIMIT: u64 = 100;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/maintenance")
            .route("", web::get().to(list_tasks))
            .route("/schedule", web::post().to(schedule_task))
            .route("/{task_id}", web::get().to(get_task)),
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    pub equipment_id: Option<String>,
    pub limit: Option<u64>,
}

async fn schedule_task(
    state: web::Data<AppState>,
    body: web::Json<ScheduleTaskRequest>,
) -> ActixResult<HttpResponse> {
    let task = state
        .maintenance
        .schedule(body.into_inner(), Utc::now())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(task)))
}

async fn list_tasks(
    state: web::Data<AppState>,
    query: web::Query<TaskQuery>,
) -> ActixResult<HttpResponse> {
    let equipment_id = query
        .equipment_id
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());
    let tasks = state
        .maintenance
        .list(equipment_id, list_limit(query.limit, DEFAULT_TASK_LIMIT))
        .await?;
    Ok(ApiResponse::success(tasks).ok())
}

async fn get_task(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let task = state.maintenance.get(&path).await?;
    Ok(ApiResponse::success(task).ok())
}
