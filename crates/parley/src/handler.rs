//! Per-connection handler: the bridge between one socket and the hub.
//!
//! Each accepted connection gets its own tokio task running this handler.
//! The flow is:
//!   1. Attach to the relay hub (creates the session)
//!   2. Spawn a writer task pumping hub events to the socket
//!   3. Loop: receive frames → decode → forward commands to the hub
//!   4. On any exit path, the drop guard detaches the session
//!
//! The verification round-trip happens here, inside step 3, in this
//! connection's own task — the hub never waits on a provider, so one slow
//! verification can't stall anyone else's registration or chat.

use std::sync::Arc;

use parley_protocol::{ClientEvent, Codec};
use parley_relay::RelayHandle;
use parley_transport::{Connection, ConnectionId, WebSocketConnection};
use parley_verify::Verifier;
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::ParleyError;

/// Drop guard that detaches a connection's session when the handler
/// exits, however it exits.
///
/// `Drop` is synchronous, so the detach command is sent from a
/// fire-and-forget task. The hub's detach is idempotent, which makes the
/// guard safe alongside any explicit cleanup.
struct DetachGuard {
    conn_id: ConnectionId,
    relay: RelayHandle,
}

impl Drop for DetachGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let relay = self.relay.clone();
        tokio::spawn(async move {
            let _ = relay.detach(conn_id).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<V: Verifier>(
    conn: WebSocketConnection,
    state: Arc<ServerState<V>>,
) -> Result<(), ParleyError> {
    let conn_id = conn.id();
    let conn = Arc::new(conn);
    tracing::debug!(%conn_id, "handling new connection");

    // --- Step 1: attach ---
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    state.relay.attach(conn_id, event_tx).await?;
    let _guard = DetachGuard {
        conn_id,
        relay: state.relay.clone(),
    };

    // --- Step 2: writer task ---
    // Pumps hub events out to the socket. Ends on its own when the hub
    // drops our sender during detach, or when the socket dies.
    {
        let conn = Arc::clone(&conn);
        let codec = state.codec;
        tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                let bytes = match codec.encode(&event) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::error!(%conn_id, error = %e, "failed to encode event");
                        continue;
                    }
                };
                if conn.send(&bytes).await.is_err() {
                    break;
                }
            }
        });
    }

    // --- Step 3: read loop ---
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "ignoring undecodable frame");
                continue;
            }
        };

        match event {
            ClientEvent::Register { name, token } => {
                let outcome =
                    state.screening.screen(token.as_deref()).await;
                state.relay.register(conn_id, name, outcome).await?;
            }
            ClientEvent::Chat(payload) => {
                state.relay.chat(conn_id, payload).await?;
            }
        }
    }

    // _guard drops here → session detach fires.
    Ok(())
}
