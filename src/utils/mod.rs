//! Utility modules for the alert engine
//!
//! - **error**: error type, HTTP mapping, retry/backoff
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

use uuid::Uuid;

/// Generate a new record identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Truncate string to at most `max_len` bytes, respecting char boundaries
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3);
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
