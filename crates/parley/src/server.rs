//! `ChatServer` builder and accept loop.
//!
//! This is the entry point for running a Parley relay. It ties the layers
//! together: transport → protocol → verification → relay hub.

use std::sync::Arc;

use parley_protocol::JsonCodec;
use parley_relay::{spawn_hub, RelayHandle};
use parley_transport::{Transport, WebSocketTransport};
use parley_verify::{
    Screening, UnverifiedPolicy, VerificationClient, Verifier, VerifyConfig,
};

use crate::handler::handle_connection;
use crate::ParleyError;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<V> {
    pub(crate) relay: RelayHandle,
    pub(crate) screening: Screening<V>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Parley server.
///
/// # Example
///
/// ```rust,no_run
/// use parley::prelude::*;
///
/// # async fn run() -> Result<(), ParleyError> {
/// let server = ChatServerBuilder::new()
///     .bind("0.0.0.0:3000")
///     .verification(VerifyConfig {
///         secret: std::env::var("VERIFY_SECRET").ok(),
///         ..VerifyConfig::default()
///     })
///     .unverified_policy(UnverifiedPolicy::Strict)
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ChatServerBuilder {
    bind_addr: String,
    verify: VerifyConfig,
    policy: UnverifiedPolicy,
}

impl ChatServerBuilder {
    /// Creates a new builder with default settings: local bind, no
    /// verification provider, open policy.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            verify: VerifyConfig::default(),
            policy: UnverifiedPolicy::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the verification provider configuration. A config without a
    /// secret leaves verification off and defers to the policy.
    pub fn verification(mut self, config: VerifyConfig) -> Self {
        self.verify = config;
        self
    }

    /// Chooses what happens to registrations when no provider is
    /// configured. This is deliberately explicit — see
    /// [`UnverifiedPolicy`].
    pub fn unverified_policy(mut self, policy: UnverifiedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds and starts the server against the real verification
    /// provider (when a secret is configured).
    pub async fn build(
        self,
    ) -> Result<ChatServer<VerificationClient>, ParleyError> {
        let screening = Screening::from_config(
            &self.verify,
            self.policy,
            VerificationClient::new,
        )?;
        self.build_with(screening).await
    }

    /// Builds and starts the server with a caller-supplied screening
    /// posture. Tests use this to plug in canned verifiers.
    pub async fn build_with<V: Verifier>(
        self,
        screening: Screening<V>,
    ) -> Result<ChatServer<V>, ParleyError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let relay = spawn_hub(screening.required());

        let state = Arc::new(ServerState {
            relay,
            screening,
            codec: JsonCodec,
        });

        Ok(ChatServer { transport, state })
    }
}

impl Default for ChatServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Parley relay server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ChatServer<V> {
    transport: WebSocketTransport,
    state: Arc<ServerState<V>>,
}

impl<V: Verifier> ChatServer<V> {
    /// Creates a new builder.
    pub fn builder() -> ChatServerBuilder {
        ChatServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// A failed accept is logged and the loop continues; it never takes
    /// existing sessions down with it.
    pub async fn run(mut self) -> Result<(), ParleyError> {
        tracing::info!("Parley relay running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
