//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire events.
///
/// The inner `serde_json::Error` is wrapped so callers deal with
/// `ProtocolError` uniformly regardless of which codec produced it.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning an event into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed. Common causes: malformed JSON, an unknown
    /// `type` tag, or a `chat` payload matching neither shape.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
