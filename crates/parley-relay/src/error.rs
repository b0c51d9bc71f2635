//! Error types for the relay layer.

/// Errors that can occur when talking to the relay hub.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The hub's command channel is closed — the hub task is gone.
    /// Connection handlers treat this as fatal for their connection;
    /// per-user failures (name taken, unknown recipient) never surface
    /// here, they go back over the wire as login/chat errors.
    #[error("relay hub is unavailable")]
    Unavailable,
}
