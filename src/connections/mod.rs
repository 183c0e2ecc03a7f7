//! Connection Registry module.
//!
//! Thread-safe membership of the live push connections. The accept path adds
//! connections, the dispatch path prunes them, and broadcasts iterate a
//! point-in-time [`snapshot`](ConnectionRegistry::snapshot) so no lock is
//! held while messages are queued.

mod connection;
mod error;

pub use connection::*;
pub use error::*;

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// The Connection Registry stores all live push connections.
///
/// # Examples
///
/// ```
/// use telemetry_bridge::connections::ConnectionRegistry;
///
/// let registry = ConnectionRegistry::new();
/// let (conn, _rx) = registry.open(16);
/// assert_eq!(registry.len(), 1);
///
/// assert!(registry.remove(conn.id()).is_some());
/// assert!(registry.remove(conn.id()).is_none());
/// assert!(conn.is_closed());
/// ```
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, Arc<Connection>>,
    next_id: AtomicU64,
}

impl ConnectionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create and register a connection with a fresh id.
    ///
    /// Returns the handle and the receiving half of its outbound queue.
    pub fn open(&self, capacity: usize) -> (Arc<Connection>, mpsc::Receiver<Arc<str>>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (connection, rx) = Connection::new(id, capacity);
        self.connections.insert(id, Arc::clone(&connection));
        (connection, rx)
    }

    /// Register an existing connection.
    ///
    /// Returns `false` if a connection with the same id is already present.
    pub fn add(&self, connection: Arc<Connection>) -> bool {
        let id = connection.id();
        // keep generated ids ahead of externally created ones
        self.next_id.fetch_max(id + 1, Ordering::Relaxed);
        match self.connections.entry(id) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(connection);
                true
            }
        }
    }

    /// Remove a connection and close it.
    ///
    /// Only the first removal of an id returns the connection; later calls
    /// return `None`.
    pub fn remove(&self, id: ConnectionId) -> Option<Arc<Connection>> {
        let (_, connection) = self.connections.remove(&id)?;
        connection.close();
        Some(connection)
    }

    /// Point-in-time copy of the registered connections, ordered by id.
    pub fn snapshot(&self) -> Vec<Arc<Connection>> {
        let mut connections: Vec<_> = self
            .connections
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        connections.sort_by_key(|c| c.id());
        connections
    }

    /// Remove and close every connection. Returns how many were closed.
    pub fn close_all(&self) -> usize {
        let ids: Vec<_> = self.connections.iter().map(|entry| *entry.key()).collect();
        ids.into_iter().filter(|&id| self.remove(id).is_some()).count()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_assigns_increasing_ids() {
        let registry = ConnectionRegistry::new();
        let (a, _ra) = registry.open(4);
        let (b, _rb) = registry.open(4);
        assert!(b.id() > a.id());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_snapshot_is_ordered_by_id() {
        let registry = ConnectionRegistry::new();
        let mut receivers = Vec::new();
        for _ in 0..10 {
            receivers.push(registry.open(4).1);
        }
        let ids: Vec<_> = registry.snapshot().iter().map(|c| c.id()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_snapshot_is_not_affected_by_later_removal() {
        let registry = ConnectionRegistry::new();
        let (a, _ra) = registry.open(4);
        let (_b, _rb) = registry.open(4);

        let snapshot = registry.snapshot();
        registry.remove(a.id());

        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_is_exactly_once() {
        let registry = ConnectionRegistry::new();
        let (conn, _rx) = registry.open(4);
        assert!(registry.remove(conn.id()).is_some());
        assert!(registry.remove(conn.id()).is_none());
        assert!(!registry.contains(conn.id()));
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let registry = ConnectionRegistry::new();
        let (conn, _rx) = Connection::new(7, 4);
        assert!(registry.add(Arc::clone(&conn)));
        assert!(!registry.add(conn));

        // generated ids do not collide with the added one
        let (next, _rx2) = registry.open(4);
        assert!(next.id() > 7);
    }

    #[test]
    fn test_close_all_closes_every_connection() {
        let registry = ConnectionRegistry::new();
        let (a, _ra) = registry.open(4);
        let (b, _rb) = registry.open(4);

        assert_eq!(registry.close_all(), 2);
        assert!(registry.is_empty());
        assert!(a.is_closed());
        assert!(b.is_closed());
        assert_eq!(registry.close_all(), 0);
    }

    #[test]
    fn test_concurrent_open_and_remove() {
        let registry = Arc::new(ConnectionRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let (conn, _rx) = registry.open(1);
                        let _ = registry.snapshot();
                        assert!(registry.remove(conn.id()).is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(registry.is_empty());
    }
}
