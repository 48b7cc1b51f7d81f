//! HTTP response handling for errors

use super::types::EngineError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = self.parts();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
                request_id: None,
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

impl EngineError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            EngineError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.to_string())
            }
            EngineError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            EngineError::InvalidState { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATE", self.to_string())
            }
            EngineError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT", self.to_string()),
            EngineError::Database(_) | EngineError::StoreUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "Alert store is unavailable".to_string(),
            ),
            EngineError::Timeout(_) => {
                (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", self.to_string())
            }
            EngineError::Inference(_) | EngineError::HttpClient(_) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", self.to_string())
            }
            EngineError::Serialization(_) => {
                (StatusCode::BAD_REQUEST, "PARSING_ERROR", self.to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        }
    }
}

/// Standard error response format
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    pub request_id: Option<String>,
}
