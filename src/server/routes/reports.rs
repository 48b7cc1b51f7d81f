//! Report preview

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use chrono::Utc;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reports/daily", web::get().to(daily_report));
}

/// The summary the daily job would publish for the 24h ending now
async fn daily_report(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let report = state.reports.build(Utc::now()).await?;
    Ok(ApiResponse::success(report).ok())
}
