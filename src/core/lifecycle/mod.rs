//! Alert lifecycle transitions
//!
//! ACTIVE -> ACKNOWLEDGED -> RESOLVED, with ACTIVE -> RESOLVED allowed as an
//! implicit acknowledgement. Every write is version-checked.

mod service;

pub use service::{AlertLifecycle, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, TransitionRequest};
