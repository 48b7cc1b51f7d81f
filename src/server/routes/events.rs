//! Event ingress

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::debug;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/events/predictions", web::post().to(publish_prediction));
}

/// Enqueue a prediction event. Validation happens in the consumer, so a
/// well-formed JSON body is always accepted.
async fn publish_prediction(
    state: web::Data<AppState>,
    body: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    let delivery_id = state.publisher.publish(body.into_inner()).await?;
    debug!(delivery_id, "Prediction event enqueued");
    Ok(HttpResponse::Accepted().json(ApiResponse::success(serde_json::json!({
        "deliveryId": delivery_id,
    }))))
}
