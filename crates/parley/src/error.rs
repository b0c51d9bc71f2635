//! Unified error type for the Parley server.

use parley_protocol::ProtocolError;
use parley_relay::RelayError;
use parley_transport::TransportError;
use parley_verify::VerifyError;

/// Top-level error that wraps all crate-specific errors.
///
/// Only process-level failures travel through this type — binding the
/// listener, a dead hub, a broken socket. Per-user failures (name taken,
/// failed verification, unknown recipient) go back over the wire as
/// `login-error` / `chat-error` events and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum ParleyError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The relay hub is gone.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// The verification client could not be constructed.
    #[error(transparent)]
    Verify(#[from] VerifyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let parley_err: ParleyError = err.into();
        assert!(matches!(parley_err, ParleyError::Transport(_)));
        assert!(parley_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_relay_error() {
        let err = RelayError::Unavailable;
        let parley_err: ParleyError = err.into();
        assert!(matches!(parley_err, ParleyError::Relay(_)));
    }

    #[test]
    fn test_from_verify_error() {
        let err = VerifyError::BadStatus(503);
        let parley_err: ParleyError = err.into();
        assert!(matches!(parley_err, ParleyError::Verify(_)));
        assert!(parley_err.to_string().contains("503"));
    }
}
