//! Browse the member list from a terminal.
//!
//! Run the bundled mock first, then point the browser at it:
//!
//! ```text
//! cargo run -p adapter-mock
//! ADAPTER_TOKEN=test-token cargo run -p console-client --example member_browser
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use tokio::sync::watch;

use console_client::format::{format_currency, format_date};
use console_client::{
    AdapterClient, ClientConfig, ListState, MemberApi, MemberListController, TokenProbe,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "console_client=info".into()),
        )
        .init();

    let config = ClientConfig::from_env();
    let client = AdapterClient::new(&config);
    let store = client.token_store();

    // Prefer a token from the environment, else reuse the stored one
    if let Ok(candidate) = std::env::var("ADAPTER_TOKEN") {
        match client.test_token(&candidate).await {
            TokenProbe::Valid => store.set(&candidate)?,
            TokenProbe::Invalid { status } => {
                bail!("adapter rejected the token (HTTP {status})")
            }
            TokenProbe::Unreachable { reason } => {
                bail!("adapter unreachable at {}: {reason}", config.base_url)
            }
        }
    } else if !store.is_set() {
        bail!("no token: set ADAPTER_TOKEN or save one under {:?}", store.path());
    }

    let api: Arc<dyn MemberApi> = Arc::new(client.clone());
    let controller = MemberListController::spawn(api);
    let mut rx = controller.subscribe();

    let state = next_settled(&mut rx).await.context("initial page")?;
    print_page("All members", &state);

    controller.search("somchai");
    let state = next_settled(&mut rx).await.context("search results")?;
    print_page("Search: somchai", &state);

    controller.search("");
    let state = next_settled(&mut rx).await.context("cleared search")?;
    controller.next_page();
    let state = if state.pagination.has_next_page {
        next_settled(&mut rx).await.context("second page")?
    } else {
        state
    };
    print_page("After next_page", &state);

    controller.shutdown();
    Ok(())
}

/// Wait for the next snapshot that is neither loading nor mid-debounce
async fn next_settled(rx: &mut watch::Receiver<ListState>) -> anyhow::Result<ListState> {
    let settled = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            rx.changed().await.ok()?;
            let state = rx.borrow().clone();
            if !state.loading && state.search_input == state.query.search {
                return Some(state);
            }
        }
    })
    .await
    .context("timed out waiting for the member list")?;
    settled.context("controller stopped")
}

fn print_page(heading: &str, state: &ListState) {
    println!("\n== {heading} ==");
    if let Some(error) = &state.error {
        println!("error: {error}");
        return;
    }
    println!(
        "page {}/{} | {} members total | registered today: {}",
        state.query.page,
        state.pagination.total_pages,
        state.pagination.total_items,
        state.summary.today,
    );
    for member in &state.members {
        let balance = member
            .credit_balance
            .map(|amount| format_currency(amount, member.currency.as_deref().unwrap_or("LAK")))
            .unwrap_or_else(|| "-".to_string());
        let registered = member
            .created_at
            .as_ref()
            .map(format_date)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<22} {:<14} {:>20}   joined {}",
            member.name,
            member.phone.as_deref().unwrap_or("-"),
            balance,
            registered,
        );
    }
    println!("pages: {:?}", state.page_window());
}
