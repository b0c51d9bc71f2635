//! The admission policy: from "maybe a token" to a decision.
//!
//! `Screening` is what the server actually holds. It folds together the
//! three deployment shapes — provider configured, open mode, strict mode —
//! so the per-connection handler asks one question and the relay hub
//! applies one answer. The await (the provider round-trip) happens inside
//! [`Screening::screen`], in the connection's own task; the hub only ever
//! sees the finished [`ScreenOutcome`].

use crate::{Verifier, VerifyConfig};

/// What to do with registrations when no verification provider is
/// configured.
///
/// This is an explicit deployment choice, never a silent default: the
/// builder requires one, and the two modes behave as documented below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnverifiedPolicy {
    /// Skip verification and admit registrations. For development and
    /// deployments that accept the bot risk.
    #[default]
    Open,

    /// Reject every registration with a `login-error`. No name is ever
    /// reserved. For deployments that would rather be down than unguarded.
    Strict,
}

/// The decision on one registration attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenOutcome {
    /// The provider vouched for the token at or above threshold.
    Passed,

    /// No provider configured, open policy: admitted without a check.
    Skipped,

    /// The provider answered, but the verdict fails the attempt —
    /// `success: false`, or a score below threshold.
    Rejected {
        /// The provider's confidence score, for the error message.
        score: f64,
    },

    /// The provider gave no verdict (unreachable, timeout, bad response).
    /// The attempt fails but the client may resubmit.
    Unavailable(String),

    /// No provider configured, strict policy: rejected outright.
    PolicyRejected,
}

/// The process-wide verification posture.
pub enum Screening<V> {
    /// No provider configured; the policy decides every attempt.
    Off(UnverifiedPolicy),

    /// A provider is configured; every attempt costs one provider call.
    On {
        verifier: V,
        /// Scores below this fail even when `success` is true.
        threshold: f64,
    },
}

impl<V: Verifier> Screening<V> {
    /// Builds the posture from config: `On` when a secret is present
    /// (using `make_verifier` to construct the client), `Off` with the
    /// given policy when not.
    pub fn from_config<E>(
        config: &VerifyConfig,
        policy: UnverifiedPolicy,
        make_verifier: impl FnOnce(&VerifyConfig) -> Result<V, E>,
    ) -> Result<Self, E> {
        if config.secret.is_some() {
            Ok(Self::On {
                verifier: make_verifier(config)?,
                threshold: config.threshold,
            })
        } else {
            Ok(Self::Off(policy))
        }
    }

    /// Whether a provider is configured (the gate's `required` flag).
    pub fn required(&self) -> bool {
        matches!(self, Self::On { .. })
    }

    /// Screens one registration attempt.
    ///
    /// A missing token is submitted as the empty string — the provider
    /// rejects it, which is the verdict we want, without a separate
    /// client-side code path.
    pub async fn screen(&self, token: Option<&str>) -> ScreenOutcome {
        match self {
            Self::Off(UnverifiedPolicy::Open) => ScreenOutcome::Skipped,
            Self::Off(UnverifiedPolicy::Strict) => {
                ScreenOutcome::PolicyRejected
            }
            Self::On {
                verifier,
                threshold,
            } => match verifier.verify(token.unwrap_or("")).await {
                Ok(result) if result.success && result.score >= *threshold => {
                    ScreenOutcome::Passed
                }
                Ok(result) => ScreenOutcome::Rejected {
                    score: result.score,
                },
                Err(e) => {
                    tracing::warn!(error = %e, "verification attempt failed");
                    ScreenOutcome::Unavailable(e.to_string())
                }
            },
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
