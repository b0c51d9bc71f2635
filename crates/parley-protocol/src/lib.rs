//! Wire protocol for the Parley chat relay.
//!
//! This crate defines the "language" that clients and the relay speak:
//!
//! - **Events** ([`ClientEvent`], [`ServerEvent`], [`ChatPayload`]) — the
//!   tagged payloads that travel on the wire.
//! - **Delivery** ([`Recipient`]) — who an outbound event is addressed to.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events are converted
//!   to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and the relay
//! hub (presence and routing). It doesn't know about connections, names,
//! or verification — it only knows how to serialize and deserialize
//! events.
//!
//! ```text
//! Transport (bytes) → Protocol (events) → Relay (presence + routing)
//! ```

mod codec;
mod error;
mod events;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{ChatPayload, ClientEvent, PublicPayload, Recipient, ServerEvent};
