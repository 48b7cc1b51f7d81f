//! Event bus abstraction

use crate::utils::error::{EngineError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

/// One message taken from the bus
#[derive(Debug, Clone)]
pub struct Delivery {
    pub id: u64,
    pub payload: serde_json::Value,
    /// How many times this message was handed back with `nack`
    pub redeliveries: u32,
}

/// Source of prediction events with at-least-once delivery
#[async_trait::async_trait]
pub trait EventSource: Send + Sync {
    /// Next message, or None once the bus is closed
    async fn receive(&self) -> Option<Delivery>;

    /// Processing finished; the message will not be seen again
    async fn ack(&self, delivery: &Delivery) -> Result<()>;

    /// Processing failed transiently; the message must come back later
    async fn nack(&self, delivery: Delivery) -> Result<()>;
}

/// In-process bus backed by a tokio mpsc channel
#[derive(Debug)]
pub struct ChannelEventSource {
    rx: Mutex<mpsc::Receiver<Delivery>>,
    tx: mpsc::Sender<Delivery>,
    redelivery_delay: Duration,
}

/// Producer side of a [`ChannelEventSource`]
#[derive(Debug, Clone)]
pub struct EventPublisher {
    tx: mpsc::Sender<Delivery>,
    next_id: Arc<AtomicU64>,
}

impl ChannelEventSource {
    pub fn new(buffer: usize) -> (Self, EventPublisher) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let next_id = Arc::new(AtomicU64::new(1));
        let publisher = EventPublisher {
            tx: tx.clone(),
            next_id,
        };
        let source = Self {
            rx: Mutex::new(rx),
            tx,
            redelivery_delay: Duration::from_secs(1),
        };
        (source, publisher)
    }

    pub fn with_redelivery_delay(mut self, delay: Duration) -> Self {
        self.redelivery_delay = delay;
        self
    }
}

#[async_trait::async_trait]
impl EventSource for ChannelEventSource {
    async fn receive(&self) -> Option<Delivery> {
        self.rx.lock().await.recv().await
    }

    async fn ack(&self, delivery: &Delivery) -> Result<()> {
        debug!(delivery_id = delivery.id, "Event acknowledged");
        Ok(())
    }

    async fn nack(&self, mut delivery: Delivery) -> Result<()> {
        delivery.redeliveries += 1;
        let tx = self.tx.clone();
        let delay = self.redelivery_delay;
        warn!(
            delivery_id = delivery.id,
            redeliveries = delivery.redeliveries,
            "Event returned to the bus"
        );
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(delivery).await.is_err() {
                warn!("Event bus closed before redelivery");
            }
        });
        Ok(())
    }
}

impl EventPublisher {
    /// Enqueue a raw event, waiting for buffer space
    pub async fn publish(&self, payload: serde_json::Value) -> Result<u64> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.tx
            .send(Delivery {
                id,
                payload,
                redeliveries: 0,
            })
            .await
            .map_err(|_| EngineError::internal("Event bus is closed"))?;
        Ok(id)
    }
}
