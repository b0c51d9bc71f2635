//! The presence registry: display names and who holds them.
//!
//! This is the relay's single source of truth for membership. It enforces:
//! - name uniqueness (concurrent claims resolve to exactly one winner,
//!   because the owning hub task serializes calls)
//! - name → connection resolution for direct messages
//! - membership snapshots for join/leave/login notifications
//!
//! The registered-session count is the size of the name map; the two can
//! never diverge because there is no separate counter to forget to update.

use std::collections::HashMap;

use parley_transport::ConnectionId;

use crate::PresenceError;

/// A point-in-time view of the membership: how many users are registered
/// and under which names.
///
/// Names are sorted so listings are deterministic for clients and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    /// Number of registered sessions.
    pub count: usize,
    /// Every registered display name, sorted.
    pub names: Vec<String>,
}

/// Maps registered display names to the connections that hold them.
///
/// Owned by the relay hub task; see the crate-level concurrency note.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    /// name → connection. A name belongs to at most one connection and a
    /// connection registers at most one name.
    names: HashMap<String, ConnectionId>,
}

impl PresenceRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `name` for `conn` and returns the membership after the join.
    ///
    /// The name is stored trimmed of surrounding whitespace.
    ///
    /// # Errors
    /// - [`PresenceError::InvalidName`] if the trimmed name is empty
    /// - [`PresenceError::NameTaken`] if another connection holds it
    pub fn register(
        &mut self,
        name: &str,
        conn: ConnectionId,
    ) -> Result<Roster, PresenceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresenceError::InvalidName);
        }
        if self.names.contains_key(name) {
            return Err(PresenceError::NameTaken(name.to_string()));
        }

        self.names.insert(name.to_string(), conn);
        tracing::info!(%conn, name, online = self.names.len(), "user registered");
        Ok(self.snapshot())
    }

    /// Releases `name` and returns the membership after the leave.
    ///
    /// Safe to call with a name that was never registered — disconnect
    /// cleanup doesn't need to know whether registration ever completed.
    pub fn unregister(&mut self, name: &str) -> Roster {
        if self.names.remove(name.trim()).is_some() {
            tracing::info!(name, online = self.names.len(), "user unregistered");
        }
        self.snapshot()
    }

    /// Resolves a display name to its connection, for direct messages.
    pub fn lookup(&self, name: &str) -> Option<ConnectionId> {
        self.names.get(name.trim()).copied()
    }

    /// Returns the current membership.
    pub fn snapshot(&self) -> Roster {
        let mut names: Vec<String> =
            self.names.keys().cloned().collect();
        names.sort();
        Roster {
            count: names.len(),
            names,
        }
    }

    /// Returns the number of registered names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no names are registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `PresenceRegistry`, covering the uniqueness
    //! invariant, snapshot consistency, and disconnect cleanup.
    //! Naming convention: `test_{function}_{scenario}_{expected}`.

    use super::*;

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    // =====================================================================
    // register()
    // =====================================================================

    #[test]
    fn test_register_new_name_returns_updated_roster() {
        let mut registry = PresenceRegistry::new();

        let roster = registry.register("alice", conn(1)).expect("should succeed");

        assert_eq!(roster.count, 1);
        assert_eq!(roster.names, vec!["alice".to_string()]);
    }

    #[test]
    fn test_register_duplicate_name_returns_name_taken() {
        let mut registry = PresenceRegistry::new();
        registry.register("alice", conn(1)).expect("first should succeed");

        let result = registry.register("alice", conn(2));

        assert!(
            matches!(result, Err(PresenceError::NameTaken(ref n)) if n == "alice"),
            "second claim of the same name must lose"
        );
        // The original owner is untouched.
        assert_eq!(registry.lookup("alice"), Some(conn(1)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_trims_whitespace() {
        let mut registry = PresenceRegistry::new();

        registry.register("  alice  ", conn(1)).expect("should succeed");

        assert_eq!(registry.lookup("alice"), Some(conn(1)));
        // The trimmed and untrimmed spellings are the same name.
        assert!(matches!(
            registry.register("alice", conn(2)),
            Err(PresenceError::NameTaken(_))
        ));
    }

    #[test]
    fn test_register_empty_name_returns_invalid() {
        let mut registry = PresenceRegistry::new();

        assert!(matches!(
            registry.register("", conn(1)),
            Err(PresenceError::InvalidName)
        ));
        assert!(matches!(
            registry.register("   ", conn(1)),
            Err(PresenceError::InvalidName)
        ));
        assert!(registry.is_empty(), "no name may be reserved on failure");
    }

    #[test]
    fn test_register_roster_names_are_sorted() {
        let mut registry = PresenceRegistry::new();
        registry.register("carol", conn(1)).unwrap();
        registry.register("alice", conn(2)).unwrap();

        let roster = registry.register("bob", conn(3)).unwrap();

        assert_eq!(
            roster.names,
            vec!["alice".to_string(), "bob".into(), "carol".into()]
        );
    }

    // =====================================================================
    // unregister()
    // =====================================================================

    #[test]
    fn test_unregister_removes_name_and_decrements_count() {
        let mut registry = PresenceRegistry::new();
        registry.register("alice", conn(1)).unwrap();
        registry.register("bob", conn(2)).unwrap();

        let roster = registry.unregister("alice");

        assert_eq!(roster.count, 1);
        assert_eq!(roster.names, vec!["bob".to_string()]);
        assert_eq!(registry.lookup("alice"), None);
    }

    #[test]
    fn test_unregister_unknown_name_is_noop() {
        let mut registry = PresenceRegistry::new();
        registry.register("alice", conn(1)).unwrap();

        let roster = registry.unregister("nobody");

        assert_eq!(roster.count, 1);
        assert_eq!(roster.names, vec!["alice".to_string()]);
    }

    #[test]
    fn test_unregister_frees_name_for_reuse() {
        let mut registry = PresenceRegistry::new();
        registry.register("alice", conn(1)).unwrap();
        registry.unregister("alice");

        let roster = registry
            .register("alice", conn(2))
            .expect("released name should be claimable again");

        assert_eq!(roster.count, 1);
        assert_eq!(registry.lookup("alice"), Some(conn(2)));
    }

    // =====================================================================
    // lookup() / snapshot()
    // =====================================================================

    #[test]
    fn test_lookup_unknown_name_returns_none() {
        let registry = PresenceRegistry::new();
        assert_eq!(registry.lookup("ghost"), None);
    }

    #[test]
    fn test_snapshot_reflects_current_membership() {
        let mut registry = PresenceRegistry::new();
        assert_eq!(registry.snapshot().count, 0);

        registry.register("alice", conn(1)).unwrap();
        registry.register("bob", conn(2)).unwrap();
        registry.unregister("alice");

        let roster = registry.snapshot();
        assert_eq!(roster.count, 1);
        assert_eq!(roster.names, vec!["bob".to_string()]);
    }

    #[test]
    fn test_snapshot_count_always_matches_names_len() {
        let mut registry = PresenceRegistry::new();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            let roster = registry.register(name, conn(i as u64 + 1)).unwrap();
            assert_eq!(roster.count, roster.names.len());
        }
        let roster = registry.unregister("b");
        assert_eq!(roster.count, roster.names.len());
    }
}
