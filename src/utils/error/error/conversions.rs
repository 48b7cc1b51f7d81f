//! Type conversions for EngineError

use super::types::EngineError;

impl From<tokio::time::error::Elapsed> for EngineError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        EngineError::Timeout(err.to_string())
    }
}

impl From<chrono::ParseError> for EngineError {
    fn from(err: chrono::ParseError) -> Self {
        EngineError::Validation(format!("Invalid timestamp: {}", err))
    }
}

impl From<url::ParseError> for EngineError {
    fn from(err: url::ParseError) -> Self {
        EngineError::Config(format!("Invalid URL: {}", err))
    }
}
