//! Presence and gating state for the Parley chat relay.
//!
//! This crate owns the two pieces of shared mutable state the relay is
//! built around, plus the per-connection session record:
//!
//! 1. **Presence** — which display names are registered and by which
//!    connection ([`PresenceRegistry`])
//! 2. **Gating** — which connections have passed verification
//!    ([`VerificationGate`])
//! 3. **Sessions** — where each connection is in its lifecycle
//!    ([`Session`], [`SessionPhase`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Relay hub (above)  ← consults presence + gate before admitting traffic
//!     ↕
//! Presence layer (this crate)  ← name uniqueness, membership, gating
//!     ↕
//! Transport layer (below)  ← provides ConnectionId
//! ```
//!
//! # Concurrency note
//!
//! Nothing here is internally synchronized — registry and gate are plain
//! maps by design. They are owned by the single relay-hub task, whose
//! command channel serializes every mutation. Keeping them simple avoids
//! hidden locking underneath the hub's own ordering guarantees.

mod error;
mod gate;
mod registry;
mod session;

pub use error::PresenceError;
pub use gate::VerificationGate;
pub use registry::{PresenceRegistry, Roster};
pub use session::{Session, SessionPhase};
