//! Asynchronous notification delivery
//!
//! Jobs are rows in the store; the dispatcher claims due jobs, calls the
//! channel for each with a timeout and records the outcome with backoff.

mod channels;
mod dispatcher;

pub use channels::{
    ChannelSet, HttpRelayChannel, LogChannel, NotificationChannel, NotificationMessage,
};
pub use dispatcher::{DispatchResult, DispatchSummary, NotificationDispatcher};
