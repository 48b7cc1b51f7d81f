//! Prediction event ingestion
//!
//! Events arrive through an [`EventSource`], are filtered by the
//! [`EventConsumer`] and admitted or suppressed by the [`Deduplicator`].

mod consumer;
mod dedup;
mod source;

pub use consumer::{DropReason, EventConsumer, IngestOutcome};
pub use dedup::Deduplicator;
pub use source::{ChannelEventSource, Delivery, EventPublisher, EventSource};

#[cfg(test)]
mod tests;
