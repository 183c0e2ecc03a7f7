//! Event dispatcher - fans change events out to every push connection.

pub mod envelope;

pub use envelope::{ClientMessage, Command, Envelope, TelemetryPayload};

use crate::connections::{ConnectionRegistry, DeliveryError};
use crate::poller::ChangeEvent;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Outcome of broadcasting one message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Connections the message was queued for
    pub delivered: usize,
    /// Connections removed because queueing failed
    pub pruned: usize,
}

/// Serializes change events and broadcasts them to the registry.
pub struct Dispatcher {
    connections: Arc<ConnectionRegistry>,
    event_type: String,
}

impl Dispatcher {
    pub fn new(connections: Arc<ConnectionRegistry>, event_type: impl Into<String>) -> Self {
        Self {
            connections,
            event_type: event_type.into(),
        }
    }

    /// Build the wire envelope for a change event.
    pub fn envelope(&self, event: &ChangeEvent) -> Result<Envelope, serde_json::Error> {
        let payload = TelemetryPayload::from(event);
        let data = serde_json::to_string(&payload)?;
        Ok(Envelope::new(self.event_type.clone(), data))
    }

    /// Serialize a change event and broadcast it.
    pub fn dispatch(&self, event: &ChangeEvent) -> DispatchReport {
        let message = match self.envelope(event).and_then(|e| serde_json::to_string(&e)) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(signal = %event.signal, error = %e, "Failed to serialize change event");
                return DispatchReport::default();
            }
        };
        self.broadcast(Arc::from(message))
    }

    /// Queue a message for every connection in a snapshot of the registry.
    ///
    /// A connection whose queue is full or closed is removed; the remaining
    /// connections still receive the message.
    pub fn broadcast(&self, message: Arc<str>) -> DispatchReport {
        let mut report = DispatchReport::default();

        for connection in self.connections.snapshot() {
            match connection.try_send(Arc::clone(&message)) {
                Ok(()) => report.delivered += 1,
                Err(error) => {
                    if self.connections.remove(connection.id()).is_some() {
                        report.pruned += 1;
                        match error {
                            DeliveryError::QueueFull { .. } => tracing::info!(
                                connection_id = connection.id(),
                                error = %error,
                                "Pruning slow push connection"
                            ),
                            DeliveryError::Closed => tracing::debug!(
                                connection_id = connection.id(),
                                "Pruning closed push connection"
                            ),
                        }
                    }
                }
            }
        }

        metrics::counter!("bridge_messages_delivered_total").increment(report.delivered as u64);
        metrics::counter!("bridge_connections_pruned_total").increment(report.pruned as u64);
        report
    }

    /// Start the dispatcher background task.
    /// Returns a JoinHandle that resolves when the dispatcher stops.
    pub fn start(
        self,
        mut events: mpsc::Receiver<ChangeEvent>,
        cancel_token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(event_type = %self.event_type, "Event dispatcher started");

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    event = events.recv() => match event {
                        Some(event) => {
                            let report = self.dispatch(&event);
                            tracing::trace!(
                                signal = %event.signal,
                                delivered = report.delivered,
                                pruned = report.pruned,
                                "Change event dispatched"
                            );
                        }
                        None => break,
                    }
                }
            }

            tracing::info!("Event dispatcher shutting down");
        })
    }
}
