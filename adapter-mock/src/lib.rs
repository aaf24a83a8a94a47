//! In-process stand-in for the bank adapter API
//!
//! Serves the adapter's member endpoints on a local port so console-client
//! tests exercise a real HTTP surface. Request accounting and the
//! delay/failure knobs live on [`AppState`], reachable through the
//! [`MockHandle`] that [`MockAdapter::spawn`] returns.

pub mod api;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use shared::{Member, PageQuery};

pub use state::{AppState, seed_members};

/// Token accepted when the builder is not told otherwise
pub const DEFAULT_TOKEN: &str = "test-token";

/// Builder for a mock adapter instance
pub struct MockAdapter {
    token: String,
    members: Vec<Member>,
    port: u16,
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAdapter {
    pub fn new() -> Self {
        Self {
            token: DEFAULT_TOKEN.to_string(),
            members: seed_members(25),
            port: 0,
        }
    }

    /// Override the bearer token the mock accepts
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Replace the seeded members wholesale
    pub fn members(mut self, members: Vec<Member>) -> Self {
        self.members = members;
        self
    }

    /// Seed a fresh fixture pool of the given size
    pub fn seed(mut self, count: usize) -> Self {
        self.members = seed_members(count);
        self
    }

    /// Bind a specific port; 0 (the default) picks a free one
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Bind and serve in the background
    pub async fn spawn(self) -> std::io::Result<MockHandle> {
        let state = Arc::new(AppState::new(self.token, self.members));
        let app = api::router(state.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", self.port)).await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();

        let signal = shutdown.clone().cancelled_owned();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(signal)
                .await
            {
                tracing::error!("mock adapter server error: {e}");
            }
        });
        tracing::info!(%addr, "mock adapter listening");

        Ok(MockHandle {
            addr,
            state,
            shutdown,
        })
    }
}

/// Running mock instance; stops serving when dropped
pub struct MockHandle {
    addr: SocketAddr,
    state: Arc<AppState>,
    shutdown: CancellationToken,
}

impl MockHandle {
    /// Base URL for a client pointed at this instance, `/api` prefix included
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn valid_token(&self) -> &str {
        &self.state.valid_token
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Requests that reached the router, including rejected ones
    pub fn hits(&self) -> u64 {
        self.state.hits()
    }

    pub fn list_calls(&self) -> u64 {
        self.state.list_calls()
    }

    pub fn balance_calls(&self) -> u64 {
        self.state.balance_calls()
    }

    /// Every list query the mock has served, oldest first
    pub async fn list_queries(&self) -> Vec<PageQuery> {
        self.state.list_queries().await
    }

    /// Stall the next `count` responses by `delay` each
    pub async fn delay_next(&self, count: u32, delay: Duration) {
        self.state.delay_next(count, delay).await;
    }

    /// Answer the next `count` requests with HTTP 500
    pub async fn fail_next(&self, count: u32) {
        self.state.fail_next(count).await;
    }

    pub async fn member_id_by_username(&self, username: &str) -> Option<String> {
        self.state.member_id_by_username(username).await
    }

    pub async fn member_balance(&self, id: &str) -> Option<Decimal> {
        self.state.member_balance(id).await
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
