//! Relay hub actor: the isolated tokio task that owns presence state.
//!
//! All registration, chat, and disconnect processing funnels through one
//! command channel into this actor, which is what makes the name
//! uniqueness invariant hold under concurrent registrations: the hub sees
//! commands one at a time.
//!
//! The hub never awaits anything but its own channel. In particular the
//! verification round-trip happens in the connection handler before the
//! `Register` command is sent; the hub receives the finished
//! [`ScreenOutcome`], so a slow provider can't stall anyone else's
//! commands.

use std::collections::HashMap;

use parley_presence::{
    PresenceRegistry, Roster, Session, SessionPhase, VerificationGate,
};
use parley_protocol::{ChatPayload, Recipient, ServerEvent};
use parley_transport::ConnectionId;
use parley_verify::ScreenOutcome;
use tokio::sync::{mpsc, oneshot};

use crate::{router, RelayError};

/// Default command channel size (backpressure bound).
const COMMAND_CHANNEL_SIZE: usize = 64;

/// Channel sender for delivering outbound events to a connection's writer.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to the relay hub through its channel.
pub enum RelayCommand {
    /// A connection attached; start a session for it.
    Attach {
        conn: ConnectionId,
        sender: EventSender,
    },

    /// A connection asked to register a name. `outcome` is the already
    /// finished verification decision — the hub never awaits a provider.
    Register {
        conn: ConnectionId,
        name: String,
        outcome: ScreenOutcome,
    },

    /// A registered (or not — the hub decides) connection sent chat.
    Chat {
        conn: ConnectionId,
        payload: ChatPayload,
    },

    /// A connection went away. Idempotent.
    Detach { conn: ConnectionId },

    /// Request the current membership snapshot.
    Roster { reply: oneshot::Sender<Roster> },
}

/// Handle to the running relay hub. Cheap to clone — it's an
/// `mpsc::Sender` wrapper.
#[derive(Clone)]
pub struct RelayHandle {
    sender: mpsc::Sender<RelayCommand>,
}

impl RelayHandle {
    /// Attaches a connection: the hub creates its session and will push
    /// outbound events through `sender`.
    pub async fn attach(
        &self,
        conn: ConnectionId,
        sender: EventSender,
    ) -> Result<(), RelayError> {
        self.send(RelayCommand::Attach { conn, sender }).await
    }

    /// Submits a registration attempt with its verification outcome.
    pub async fn register(
        &self,
        conn: ConnectionId,
        name: String,
        outcome: ScreenOutcome,
    ) -> Result<(), RelayError> {
        self.send(RelayCommand::Register {
            conn,
            name,
            outcome,
        })
        .await
    }

    /// Submits a chat payload.
    pub async fn chat(
        &self,
        conn: ConnectionId,
        payload: ChatPayload,
    ) -> Result<(), RelayError> {
        self.send(RelayCommand::Chat { conn, payload }).await
    }

    /// Tears down a connection's session. Safe to call more than once.
    pub async fn detach(
        &self,
        conn: ConnectionId,
    ) -> Result<(), RelayError> {
        self.send(RelayCommand::Detach { conn }).await
    }

    /// Returns the current membership snapshot.
    pub async fn roster(&self) -> Result<Roster, RelayError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RelayCommand::Roster { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| RelayError::Unavailable)
    }

    async fn send(&self, cmd: RelayCommand) -> Result<(), RelayError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RelayError::Unavailable)
    }
}

/// The internal hub state. Runs inside a tokio task.
struct RelayHub {
    registry: PresenceRegistry,
    gate: VerificationGate,
    /// Per-connection session records.
    sessions: HashMap<ConnectionId, Session>,
    /// Per-connection outbound channels.
    links: HashMap<ConnectionId, EventSender>,
    receiver: mpsc::Receiver<RelayCommand>,
}

impl RelayHub {
    /// Runs the actor loop, processing commands until every handle drops.
    async fn run(mut self) {
        tracing::info!("relay hub started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RelayCommand::Attach { conn, sender } => {
                    self.handle_attach(conn, sender);
                }
                RelayCommand::Register {
                    conn,
                    name,
                    outcome,
                } => {
                    self.handle_register(conn, name, outcome);
                }
                RelayCommand::Chat { conn, payload } => {
                    self.handle_chat(conn, payload);
                }
                RelayCommand::Detach { conn } => {
                    self.handle_detach(conn);
                }
                RelayCommand::Roster { reply } => {
                    let _ = reply.send(self.registry.snapshot());
                }
            }
        }

        tracing::info!("relay hub stopped");
    }

    fn handle_attach(&mut self, conn: ConnectionId, sender: EventSender) {
        self.sessions.insert(conn, Session::new(conn));
        self.links.insert(conn, sender);
        tracing::debug!(%conn, connections = self.links.len(), "connection attached");
    }

    fn handle_register(
        &mut self,
        conn: ConnectionId,
        name: String,
        outcome: ScreenOutcome,
    ) {
        // The socket may have died while the verification call was in
        // flight; a session that's already gone gets no side effects.
        let Some(phase) = self.sessions.get(&conn).map(|s| s.phase) else {
            tracing::debug!(%conn, "register from detached connection, dropped");
            return;
        };

        // At most one registration per connection; repeats are a silent
        // no-op, not an error.
        if !phase.can_register() {
            tracing::debug!(%conn, %phase, "duplicate registration ignored");
            return;
        }

        match outcome {
            ScreenOutcome::Passed => {
                self.gate.mark_verified(conn);
                if let Some(session) = self.sessions.get_mut(&conn) {
                    session.verified = true;
                }
            }
            ScreenOutcome::Skipped => {}
            ScreenOutcome::Rejected { score } => {
                self.send_to(
                    conn,
                    ServerEvent::LoginError {
                        message: format!(
                            "verification failed (score {score:.2})"
                        ),
                    },
                );
                return;
            }
            ScreenOutcome::Unavailable(reason) => {
                tracing::warn!(%conn, %reason, "verification provider unavailable");
                self.send_to(
                    conn,
                    ServerEvent::LoginError {
                        message:
                            "verification is temporarily unavailable, please retry"
                                .into(),
                    },
                );
                return;
            }
            ScreenOutcome::PolicyRejected => {
                self.send_to(
                    conn,
                    ServerEvent::LoginError {
                        message: "verification is required to join".into(),
                    },
                );
                return;
            }
        }

        match self.registry.register(&name, conn) {
            Err(e) => {
                // Name collision or invalid name. The verification mark
                // survives — the client retries with a different name only.
                self.send_to(
                    conn,
                    ServerEvent::LoginError {
                        message: e.to_string(),
                    },
                );
            }
            Ok(roster) => {
                let name = name.trim().to_string();
                if let Some(session) = self.sessions.get_mut(&conn) {
                    session.display_name = Some(name.clone());
                    session.phase = SessionPhase::Registered;
                }
                self.dispatch(vec![
                    (
                        Recipient::Conn(conn),
                        ServerEvent::LoginAck {
                            count: roster.count,
                            names: roster.names.clone(),
                        },
                    ),
                    (
                        Recipient::AllExcept(conn),
                        ServerEvent::UserJoined {
                            name,
                            count: roster.count,
                            names: roster.names,
                        },
                    ),
                ]);
            }
        }
    }

    fn handle_chat(&mut self, conn: ConnectionId, payload: ChatPayload) {
        let Some(session) = self.sessions.get(&conn) else {
            return; // detached while the command was queued
        };

        // Chat requires a registered name AND clearance from the gate.
        let sender_name = session
            .phase
            .is_registered()
            .then(|| session.display_name.clone())
            .flatten();
        let Some(sender_name) = sender_name else {
            self.send_to(
                conn,
                ServerEvent::ChatError {
                    message: "register a name before chatting".into(),
                },
            );
            return;
        };
        if !self.gate.permits(conn) {
            self.send_to(
                conn,
                ServerEvent::ChatError {
                    message: "verification is required before chatting"
                        .into(),
                },
            );
            return;
        }

        let deliveries =
            router::route_chat(&self.registry, conn, &sender_name, payload);
        self.dispatch(deliveries);
    }

    fn handle_detach(&mut self, conn: ConnectionId) {
        // Idempotent: cleanup runs exactly once even if a drop guard and
        // an explicit detach both fire.
        let Some(mut session) = self.sessions.remove(&conn) else {
            return;
        };
        session.phase = SessionPhase::Disconnected;
        self.links.remove(&conn);
        self.gate.clear(conn);

        if let Some(name) = session.display_name {
            let roster = self.registry.unregister(&name);
            tracing::info!(%conn, %name, online = roster.count, "registered user left");
            // The departing link is already gone, so All here means
            // "every other connection".
            self.dispatch(vec![(
                Recipient::All,
                ServerEvent::UserLeft {
                    name,
                    count: roster.count,
                    names: roster.names,
                },
            )]);
        } else {
            tracing::debug!(%conn, "unregistered connection detached");
        }
    }

    /// Fans deliveries out to the correct connections.
    fn dispatch(&self, deliveries: Vec<(Recipient, ServerEvent)>) {
        for (recipient, event) in deliveries {
            match recipient {
                Recipient::All => {
                    for conn in self.links.keys() {
                        self.send_to(*conn, event.clone());
                    }
                }
                Recipient::Conn(conn) => {
                    self.send_to(conn, event);
                }
                Recipient::AllExcept(excluded) => {
                    for conn in self.links.keys() {
                        if *conn != excluded {
                            self.send_to(*conn, event.clone());
                        }
                    }
                }
            }
        }
    }

    /// Sends an event to a single connection. Silently drops if the
    /// writer is gone (connection mid-teardown).
    fn send_to(&self, conn: ConnectionId, event: ServerEvent) {
        if let Some(sender) = self.links.get(&conn) {
            let _ = sender.send(event);
        }
    }
}

/// Spawns the relay hub task and returns a handle to communicate with it.
///
/// `verification_required` seeds the gate: true when a provider is
/// configured for this process.
pub fn spawn_hub(verification_required: bool) -> RelayHandle {
    let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

    let hub = RelayHub {
        registry: PresenceRegistry::new(),
        gate: VerificationGate::new(verification_required),
        sessions: HashMap::new(),
        links: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(hub.run());

    RelayHandle { sender: tx }
}
