//! Standalone Parley relay server.
//!
//! Configuration is taken from the environment:
//!
//! - `PORT` — listen port (default 3000)
//! - `PARLEY_VERIFY_SECRET` — verification provider secret; unset means
//!   no verification, governed by the policy below
//! - `PARLEY_VERIFY_URL` — provider endpoint override
//! - `PARLEY_SCORE_THRESHOLD` — minimum confidence score (default 0.5)
//! - `PARLEY_STRICT` — set to `1` to reject registrations when no secret
//!   is configured, instead of running open
//! - `RUST_LOG` — tracing filter (default `info`)

use parley::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = format!("0.0.0.0:{port}");

    let mut verify = VerifyConfig::default();
    verify.secret = std::env::var("PARLEY_VERIFY_SECRET")
        .ok()
        .filter(|s| !s.is_empty());
    if let Ok(url) = std::env::var("PARLEY_VERIFY_URL") {
        verify.provider_url = url;
    }
    if let Some(threshold) = std::env::var("PARLEY_SCORE_THRESHOLD")
        .ok()
        .and_then(|t| t.parse().ok())
    {
        verify.threshold = threshold;
    }

    let policy = if std::env::var("PARLEY_STRICT").is_ok_and(|v| v == "1")
    {
        UnverifiedPolicy::Strict
    } else {
        UnverifiedPolicy::Open
    };

    if verify.secret.is_none() {
        tracing::warn!(
            ?policy,
            "no verification secret configured; applying unverified policy"
        );
    }

    let server = ChatServerBuilder::new()
        .bind(&addr)
        .verification(verify)
        .unverified_policy(policy)
        .build()
        .await?;

    tracing::info!(%addr, "parley relay listening");
    server.run().await?;
    Ok(())
}
