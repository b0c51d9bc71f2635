//! Anti-automation verification for the Parley chat relay.
//!
//! Before a connection may register a name, it can be made to prove it's
//! not a bot: the client solves a challenge in the browser and sends the
//! resulting token with its registration; this crate checks the token
//! against the provider and turns the answer into an admission decision.
//!
//! Three pieces:
//!
//! 1. **[`Verifier`]** — the trait seam: one async call from token to
//!    success/score. Production uses [`VerificationClient`]; tests plug in
//!    canned verdicts.
//! 2. **[`VerificationClient`]** — the HTTP client for the real provider
//!    (`POST {secret, response}` → `{success, score}`).
//! 3. **[`Screening`]** — the admission policy: provider + threshold when
//!    configured, an explicit open-or-strict choice when not. Produces a
//!    [`ScreenOutcome`] the relay hub applies without ever awaiting.

#![allow(async_fn_in_trait)]

mod client;
mod error;
mod screening;

pub use client::{VerificationClient, VerifyConfig, VerifyResult};
pub use error::VerifyError;
pub use screening::{ScreenOutcome, Screening, UnverifiedPolicy};

/// Checks a client-supplied verification token and returns the provider's
/// verdict.
///
/// # Trait bounds
///
/// `Send + Sync + 'static` — the verifier is shared across connection
/// tasks for the lifetime of the server.
///
/// # Example
///
/// ```rust
/// use parley_verify::{Verifier, VerifyError, VerifyResult};
///
/// /// Accepts every token. Only for development.
/// struct AcceptAll;
///
/// impl Verifier for AcceptAll {
///     async fn verify(
///         &self,
///         _token: &str,
///     ) -> Result<VerifyResult, VerifyError> {
///         Ok(VerifyResult { success: true, score: 1.0 })
///     }
/// }
/// ```
pub trait Verifier: Send + Sync + 'static {
    /// Submits `token` to the provider.
    ///
    /// One call per registration attempt; the caller never retries. A
    /// transport failure (including timeout) is a terminal failure for
    /// that attempt — the client must resubmit.
    ///
    /// # Returns
    /// - `Ok(VerifyResult)` — the provider answered; the caller applies
    ///   its score threshold
    /// - `Err(VerifyError)` — the provider was unreachable or unusable
    fn verify(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<VerifyResult, VerifyError>> + Send;
}
