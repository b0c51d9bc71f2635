//! Error types for the presence layer.

/// Errors that can occur while mutating the presence registry.
///
/// Both are reported back to the registering connection as a
/// `login-error`; neither affects any other session.
#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    /// The display name is already registered by another connection.
    #[error("name \"{0}\" is already taken")]
    NameTaken(String),

    /// The display name is empty or whitespace-only.
    #[error("display name cannot be empty")]
    InvalidName,
}
