//! Core data models for the alert engine

pub mod alert;
pub mod event;
pub mod maintenance;
pub mod notification;
pub mod report;

pub use alert::*;
pub use event::*;
pub use maintenance::*;
pub use notification::*;
pub use report::*;

use crate::utils::error::{EngineError, Result};
use std::str::FromStr;

/// Decode a stored enum column. Unknown values mean the row cannot be trusted.
pub(crate) fn decode_column<T>(column: &str, value: &str) -> Result<T>
where
    T: FromStr<Err = EngineError>,
{
    value.parse::<T>().map_err(|_| {
        EngineError::corruption(format!("Unrecognised value '{}' in column {}", value, column))
    })
}
