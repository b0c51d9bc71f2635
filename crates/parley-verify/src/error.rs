//! Error types for the verification layer.

/// Errors that make a verification attempt unusable.
///
/// These all mean "the provider gave no verdict" — they surface to the
/// registering connection as a `login-error` and never affect any other
/// session. A score below threshold is NOT an error; that's a verdict,
/// carried in [`VerifyResult`](crate::VerifyResult).
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The provider was unreachable, timed out, or returned garbage.
    #[error("verification provider unavailable: {0}")]
    Provider(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("verification provider returned status {0}")]
    BadStatus(u16),
}
