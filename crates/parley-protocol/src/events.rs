//! Core event types for Parley's wire format.
//!
//! Every value that crosses the boundary between a chat client and the
//! relay is one of these types, serialized as an internally tagged JSON
//! object: `{"type": "login-ack", ...}`. The kebab-case tags are the wire
//! contract the browser client matches on.

use parley_transport::ConnectionId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Recipient — who should receive an outbound event?
// ---------------------------------------------------------------------------

/// Specifies which connections an outbound [`ServerEvent`] is delivered to.
///
/// The router returns a list of `(Recipient, ServerEvent)` pairs; the relay
/// hub fans each one out over its live connections. `Recipient` never
/// crosses the wire — it is a delivery instruction, not a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every live connection, the sender included.
    All,

    /// One specific connection.
    Conn(ConnectionId),

    /// Everyone except the given connection. Used for join/leave
    /// notifications, which the affected connection hears about through
    /// its own ack instead.
    AllExcept(ConnectionId),
}

// ---------------------------------------------------------------------------
// Inbound events
// ---------------------------------------------------------------------------

/// The free-text or media body of a `chat` event.
///
/// The `chat` wire event comes in two shapes distinguished only by their
/// fields: a text message (`{"body": ..., "recipient": ...}`) and an
/// embedded media share (`{"videoId": ...}`). The media shape is matched
/// first; anything carrying a `videoId` is a share regardless of what else
/// rides along.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatPayload {
    /// An embedded media share. Always broadcast, never private.
    Media {
        #[serde(rename = "videoId")]
        video_id: String,
    },

    /// A plain chat line. `recipient` is absent (or the sentinel
    /// `"general"`) for a public broadcast, or another user's display
    /// name for a direct message.
    Text {
        body: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        recipient: Option<String>,
    },
}

/// Events a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Claim a display name, optionally presenting a verification token.
    Register {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },

    /// Send a chat line or media share.
    Chat(ChatPayload),
}

// ---------------------------------------------------------------------------
// Outbound events
// ---------------------------------------------------------------------------

/// The body of a `public-message` event.
///
/// Mirrors [`ChatPayload`]: a formatted text line for ordinary chat, or a
/// structured media share tagged with the sharer's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublicPayload {
    /// A shared media reference and who shared it.
    Media {
        #[serde(rename = "videoId")]
        video_id: String,
        sender: String,
    },

    /// A rendered chat line, `"{name}: {body}"`.
    Text { text: String },
}

/// Events the relay sends to clients.
///
/// These are the only values that cross the boundary to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Registration succeeded; carries the membership after the join.
    LoginAck { count: usize, names: Vec<String> },

    /// Registration failed (name taken, verification rejected, provider
    /// unreachable, strict policy). The session may try again.
    LoginError { message: String },

    /// Another user registered. Sent to everyone except the registrant.
    UserJoined {
        name: String,
        count: usize,
        names: Vec<String>,
    },

    /// A registered user disconnected. Sent to every remaining connection.
    UserLeft {
        name: String,
        count: usize,
        names: Vec<String>,
    },

    /// A broadcast chat line or media share, delivered to everyone
    /// including the sender.
    PublicMessage(PublicPayload),

    /// A direct message. Delivered to the recipient, with a mirrored copy
    /// to the sender so delivery is visible on both ends.
    PrivateMessage { text: String, sender: String },

    /// A chat-time failure (not registered, not verified, unknown
    /// recipient). Delivered to the offending connection only.
    ChatError { message: String },
}

// =========================================================================
// Tests
// =========================================================================
