//! HTTP client for the external verification provider.
//!
//! The provider contract: `POST` with form fields `secret` (deployment
//! config, never client-supplied) and `response` (the client's token),
//! answering `{"success": bool, "score": number}` with the score in
//! [0, 1]. One request per registration attempt, no retries, bounded
//! timeout so a slow provider can only stall the one login that's waiting
//! on it.

use std::time::Duration;

use serde::Deserialize;

use crate::{Verifier, VerifyError};

/// Default bound on the provider round-trip.
const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Deployment configuration for the verification step.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// The provider's verification endpoint.
    pub provider_url: String,

    /// The shared secret identifying this deployment to the provider.
    /// `None` means verification is not configured; the relay's
    /// open/strict policy decides what happens instead.
    pub secret: Option<String>,

    /// Confidence threshold in [0, 1]. Scores below it fail the attempt
    /// even when the provider reports `success: true`.
    pub threshold: f64,

    /// Bound on the provider round-trip.
    pub timeout: Duration,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            provider_url:
                "https://www.google.com/recaptcha/api/siteverify".into(),
            secret: None,
            threshold: 0.5,
            timeout: VERIFY_TIMEOUT,
        }
    }
}

/// The provider's verdict on one token.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct VerifyResult {
    /// Whether the token checked out at all.
    pub success: bool,

    /// Confidence in [0, 1]. Providers without scoring omit the field;
    /// `success` alone decides then, so the default is a full score.
    #[serde(default = "full_score")]
    pub score: f64,
}

fn full_score() -> f64 {
    1.0
}

/// A [`Verifier`] backed by the real provider over HTTPS.
pub struct VerificationClient {
    http: reqwest::Client,
    url: String,
    secret: String,
}

impl VerificationClient {
    /// Builds a client from config. The config must carry a secret.
    ///
    /// # Errors
    /// Returns [`VerifyError::Provider`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: &VerifyConfig) -> Result<Self, VerifyError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent("parley/0.1")
            .build()?;

        Ok(Self {
            http,
            url: config.provider_url.clone(),
            secret: config.secret.clone().unwrap_or_default(),
        })
    }
}

impl Verifier for VerificationClient {
    async fn verify(
        &self,
        token: &str,
    ) -> Result<VerifyResult, VerifyError> {
        let response = self
            .http
            .post(&self.url)
            .form(&[
                ("secret", self.secret.as_str()),
                ("response", token),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "verification provider rejected request");
            return Err(VerifyError::BadStatus(status.as_u16()));
        }

        let result: VerifyResult = response.json().await?;
        tracing::debug!(
            success = result.success,
            score = result.score,
            "verification provider answered"
        );
        Ok(result)
    }
}

// =========================================================================
// Tests
// =========================================================================
