//! Standalone mock adapter, for driving console-client by hand.
//!
//! Configuration via environment:
//! - `MOCK_PORT`  listen port (default: 3000)
//! - `MOCK_TOKEN` accepted bearer token (default: test-token)
//! - `MOCK_SEED`  number of seeded members (default: 25)

use adapter_mock::MockAdapter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adapter_mock=info,tower_http=info".into()),
        )
        .init();

    let port = std::env::var("MOCK_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let token =
        std::env::var("MOCK_TOKEN").unwrap_or_else(|_| adapter_mock::DEFAULT_TOKEN.to_string());
    let seed = std::env::var("MOCK_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(25);

    let handle = MockAdapter::new()
        .port(port)
        .token(token)
        .seed(seed)
        .spawn()
        .await?;

    tracing::info!(
        "mock adapter ready at {} (accepting token {:?})",
        handle.base_url(),
        handle.valid_token()
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    handle.shutdown();

    Ok(())
}
