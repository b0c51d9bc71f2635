//! The Parley session controller: one actor task that owns all shared
//! chat state.
//!
//! The hub runs as an isolated tokio task communicating with the outside
//! world through an mpsc command channel — no shared mutable state, just
//! message passing. Connection handlers translate transport events into
//! [`RelayCommand`]s; the hub consults the presence registry and
//! verification gate, routes chat through the [`router`], and fans
//! outbound [`ServerEvent`]s to per-connection senders.
//!
//! # Key types
//!
//! - [`RelayHandle`] — send commands to the running hub
//! - [`router`] — pure broadcast-vs-direct delivery decisions
//! - [`RelayError`] — what can go wrong talking to the hub
//!
//! # Ordering guarantees
//!
//! The command channel gives the hub a single serialized view of the
//! world: two connections racing to register the same name arrive as two
//! ordered commands, and exactly one wins. Per-connection order holds
//! because each handler awaits its own sends.

mod error;
mod hub;
pub mod router;

pub use error::RelayError;
pub use hub::{spawn_hub, EventSender, RelayCommand, RelayHandle};
