//! A single live push connection.

use super::error::DeliveryError;
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Identifier assigned in connect order.
pub type ConnectionId = u64;

/// Server-side handle of a push connection.
///
/// The handle owns the sending half of a bounded outbound queue. The socket
/// task owns the receiving half and writes whatever arrives to the client.
/// Enqueueing never waits: when the queue is full the message is refused
/// and the caller prunes the connection.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    created_at: DateTime<Utc>,
    last_send: RwLock<Option<DateTime<Utc>>>,
    capacity: usize,
    outbound: mpsc::Sender<Arc<str>>,
    closed: CancellationToken,
}

impl Connection {
    /// Create a connection with an outbound queue of `capacity` messages.
    ///
    /// Returns the handle and the receiving half of its queue.
    pub fn new(id: ConnectionId, capacity: usize) -> (Arc<Self>, mpsc::Receiver<Arc<str>>) {
        let capacity = capacity.max(1);
        let (outbound, rx) = mpsc::channel(capacity);
        let connection = Arc::new(Self {
            id,
            created_at: Utc::now(),
            last_send: RwLock::new(None),
            capacity,
            outbound,
            closed: CancellationToken::new(),
        });
        (connection, rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When a message was last queued successfully.
    pub fn last_send(&self) -> Option<DateTime<Utc>> {
        *self.last_send.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a message without waiting.
    pub fn try_send(&self, message: Arc<str>) -> Result<(), DeliveryError> {
        if self.closed.is_cancelled() {
            return Err(DeliveryError::Closed);
        }
        self.outbound.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::QueueFull {
                capacity: self.capacity,
            },
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })?;
        *self.last_send.write().unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
        Ok(())
    }

    /// Signal the socket task to close the connection.
    pub fn close(&self) {
        self.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled() || self.outbound.is_closed()
    }

    /// Resolves once [`close`](Self::close) has been called.
    pub fn closed(&self) -> WaitForCancellationFuture<'_> {
        self.closed.cancelled()
    }
}
