//! The verification gate: which connections may emit chat traffic.
//!
//! A plain set of connection identities plus one flag saying whether
//! verification is required at all. Membership is the record of a
//! completed, successful verification call — the gate never talks to the
//! provider itself.

use std::collections::HashSet;

use parley_transport::ConnectionId;

/// Tracks which connections have passed verification in the current
/// process lifetime.
///
/// Invariant: a connection is in the set iff a successful verification
/// completed for it. When verification is not required, the set stays
/// empty and [`permits`](Self::permits) admits everyone.
#[derive(Debug)]
pub struct VerificationGate {
    verified: HashSet<ConnectionId>,
    required: bool,
}

impl VerificationGate {
    /// Creates a gate. `required` is true when a verification provider is
    /// configured for this process.
    pub fn new(required: bool) -> Self {
        Self {
            verified: HashSet::new(),
            required,
        }
    }

    /// Whether a verification provider is configured.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Records a completed, successful verification for `conn`.
    pub fn mark_verified(&mut self, conn: ConnectionId) {
        if self.verified.insert(conn) {
            tracing::debug!(%conn, "connection verified");
        }
    }

    /// Whether `conn` has completed a successful verification.
    pub fn is_verified(&self, conn: ConnectionId) -> bool {
        self.verified.contains(&conn)
    }

    /// Whether `conn` may emit chat traffic: verified, or verification is
    /// not required under the active policy.
    pub fn permits(&self, conn: ConnectionId) -> bool {
        !self.required || self.is_verified(conn)
    }

    /// Forgets `conn`. Called on disconnect; a no-op for connections that
    /// never verified.
    pub fn clear(&mut self, conn: ConnectionId) {
        self.verified.remove(&conn);
    }
}

// =========================================================================
// Tests
// =========================================================================
