/// Reasons a message could not be queued for a push connection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("outbound queue full ({capacity} messages)")]
    QueueFull { capacity: usize },

    #[error("connection closed")]
    Closed,
}
