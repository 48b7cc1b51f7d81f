//! Configuration validation
//!
//! - `trait_def`: the `Validate` trait
//! - `config_validators`: engine, server, storage, logging
//! - `alerting_validators`: admission policy and notification dispatch
//! - `scheduler_validators`: periodic jobs, maintenance, inference

mod alerting_validators;
mod config_validators;
mod scheduler_validators;
mod trait_def;

pub use trait_def::Validate;

/// Check that `value` parses as an absolute http(s) URL
pub(crate) fn validate_http_url(field: &str, value: &str) -> Result<(), String> {
    let parsed = url::Url::parse(value).map_err(|e| format!("{} is not a valid URL: {}", field, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("{} must use http or https, got {}", field, other)),
    }
}
