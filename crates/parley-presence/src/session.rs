//! Session records: where each connection is in its lifecycle.
//!
//! A session is the relay's record of one connection. It tracks the
//! connection's phase, the display name it registered (if any), and
//! whether it passed verification.

use parley_transport::ConnectionId;

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a session.
///
/// ```text
///   Connected ──(register accepted)──→ Registered
///       │                                  │
///       └───────────(disconnect)───────────┴──→ Disconnected
/// ```
///
/// - **Connected**: attached, no name yet. Registration attempts (and the
///   verification call they may trigger) happen from here; a failed
///   attempt stays here so the client can retry.
/// - **Registered**: holds a display name. The only phase from which chat
///   is accepted.
/// - **Disconnected**: terminal. The record only exists in this phase
///   transiently, while disconnect cleanup runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Connected,
    Registered,
    Disconnected,
}

impl SessionPhase {
    /// Returns `true` if this session holds a registered name.
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered)
    }

    /// Returns `true` if registration attempts are still accepted.
    pub fn can_register(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected => write!(f, "Connected"),
            Self::Registered => write!(f, "Registered"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One connection's session on the relay.
///
/// Created when the connection attaches, destroyed when it detaches.
/// Invariant: `display_name` is `Some` iff `phase` is `Registered` (the
/// name lingers only during disconnect cleanup, which consumes the record).
#[derive(Debug, Clone)]
pub struct Session {
    /// The connection this session belongs to.
    pub conn: ConnectionId,

    /// Current lifecycle phase.
    pub phase: SessionPhase,

    /// The registered display name, once registration completes.
    pub display_name: Option<String>,

    /// Whether this connection passed verification. Mirrors the gate,
    /// kept on the record for logging and introspection.
    pub verified: bool,
}

impl Session {
    /// Creates a fresh session for a newly attached connection.
    pub fn new(conn: ConnectionId) -> Self {
        Self {
            conn,
            phase: SessionPhase::Connected,
            display_name: None,
            verified: false,
        }
    }
}
