//! # Parley
//!
//! A real-time group-chat relay. Clients connect over WebSocket, register
//! a display name, and exchange public broadcasts or private messages —
//! gated by an anti-automation verification step.
//!
//! The framework layers, bottom up:
//!
//! - `parley-transport` — the bidirectional channel (WebSocket)
//! - `parley-protocol` — wire events and codecs
//! - `parley-presence` — name registry, verification gate, sessions
//! - `parley-verify` — the external verification provider client
//! - `parley-relay` — the session controller (hub actor + router)
//! - `parley` (this crate) — server wiring: accept loop, per-connection
//!   handler, configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parley::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ParleyError> {
//!     let server = ChatServerBuilder::new()
//!         .bind("0.0.0.0:3000")
//!         .unverified_policy(UnverifiedPolicy::Open)
//!         .build()
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod handler;
mod server;

pub use error::ParleyError;
pub use server::{ChatServer, ChatServerBuilder};

/// The commonly used surface in one import.
pub mod prelude {
    pub use crate::{ChatServer, ChatServerBuilder, ParleyError};
    pub use parley_protocol::{
        ChatPayload, ClientEvent, PublicPayload, ServerEvent,
    };
    pub use parley_verify::{
        ScreenOutcome, Screening, UnverifiedPolicy, VerificationClient,
        Verifier, VerifyConfig, VerifyError, VerifyResult,
    };
}
