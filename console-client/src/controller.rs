//! Owned async worker behind the member table
//!
//! Tracks the `(page, limit, search)` query tuple, debounces search input,
//! clamps page navigation, and reloads after successful mutations. The
//! server owns filtering and slicing; the controller never re-slices rows.
//! Consumers drive it through command methods and observe it through watch
//! snapshots.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use shared::{
    AddCreditRequest, ApiEnvelope, CashoutCreditRequest, DepositRequest, Member, MemberListData,
    MemberSummary, PageQuery, Pagination, RemoveCreditRequest,
};

use crate::api::MemberApi;
use crate::error::ClientResult;

/// Debounce window for search keystrokes
const DEBOUNCE_MS: u64 = 300;

/// Page sizes the limit selector offers
pub const PAGE_SIZES: [u32; 4] = [10, 20, 50, 100];

const DEFAULT_PAGE_SIZE: u32 = PAGE_SIZES[0];

/// Visible page buttons around the current page
///
/// Two pages either side of the current one, clipped to the valid range, so
/// the strip never exceeds five buttons.
///
/// ```
/// use console_client::page_window;
///
/// assert_eq!(page_window(1, 10), vec![1, 2, 3]);
/// assert_eq!(page_window(5, 10), vec![3, 4, 5, 6, 7]);
/// assert_eq!(page_window(10, 10), vec![8, 9, 10]);
/// assert_eq!(page_window(1, 1), vec![1]);
/// ```
pub fn page_window(current: u32, last_page: u32) -> Vec<u32> {
    let last = last_page.max(1);
    let current = current.clamp(1, last);
    let min_page = current.saturating_sub(2).max(1);
    let max_page = (current + 2).min(last);
    (min_page..=max_page).collect()
}

/// Snapshot published after every observable change
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Rows of the page described by `query`
    pub members: Vec<Member>,
    /// Registration counts for the current search
    pub summary: MemberSummary,
    /// Server-computed pagination for the current query
    pub pagination: Pagination,
    /// The tuple the rows correspond to
    pub query: PageQuery,
    /// Live search text, may be ahead of `query.search` until the debounce
    /// window closes
    pub search_input: String,
    pub loading: bool,
    pub error: Option<String>,
}

impl ListState {
    /// Page buttons to render for this snapshot
    pub fn page_window(&self) -> Vec<u32> {
        page_window(self.query.page, self.pagination.total_pages)
    }
}

/// Controller tuning knobs
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// How long a search keystroke waits for a successor before committing
    pub debounce: Duration,
    /// Initial page size, must be one of [`PAGE_SIZES`]
    pub limit: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_MS),
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

enum ListCommand {
    Search(String),
    GoToPage(u32),
    FirstPage,
    PrevPage,
    NextPage,
    LastPage,
    SetLimit(u32),
    Reload,
    DeleteMember(String),
    AddCredit(String, AddCreditRequest),
    RemoveCredit(String, RemoveCreditRequest),
    CashoutCredit(String, CashoutCreditRequest),
    Deposit(DepositRequest),
}

enum WorkerEvent {
    FetchSettled {
        generation: u64,
        query: PageQuery,
        result: ClientResult<ApiEnvelope<MemberListData>>,
    },
    MutationSettled {
        action: &'static str,
        result: ClientResult<ApiEnvelope<Value>>,
    },
}

/// Handle to a spawned member-list worker
///
/// Dropping the controller stops the worker; commands sent after shutdown
/// are ignored.
pub struct MemberListController {
    commands: mpsc::UnboundedSender<ListCommand>,
    state: watch::Receiver<ListState>,
    shutdown: CancellationToken,
}

impl MemberListController {
    /// Spawn a controller with default options and load the first page
    pub fn spawn(api: Arc<dyn MemberApi>) -> Self {
        Self::spawn_with_options(api, ListOptions::default())
    }

    /// Spawn a controller with explicit options
    ///
    /// An initial limit outside [`PAGE_SIZES`] falls back to the default.
    pub fn spawn_with_options(api: Arc<dyn MemberApi>, options: ListOptions) -> Self {
        let limit = if PAGE_SIZES.contains(&options.limit) {
            options.limit
        } else {
            tracing::warn!(
                limit = options.limit,
                "initial page size outside the allowed set, using {DEFAULT_PAGE_SIZE}"
            );
            DEFAULT_PAGE_SIZE
        };
        let query = PageQuery {
            limit,
            ..PageQuery::default()
        };

        let initial = ListState {
            query: query.clone(),
            loading: true,
            ..ListState::default()
        };
        let (state_tx, state_rx) = watch::channel(initial);
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let worker = ListWorker {
            api,
            state: state_tx,
            query,
            debounce: options.debounce,
            debounce_deadline: None,
            generation: 0,
            in_flight: None,
            events_tx,
        };
        tokio::spawn(worker.run(commands_rx, events_rx, shutdown.clone()));

        Self {
            commands: commands_tx,
            state: state_rx,
            shutdown,
        }
    }

    fn send(&self, command: ListCommand) {
        let _ = self.commands.send(command);
    }

    /// Update the search text; commits after the debounce window closes
    pub fn search(&self, text: impl Into<String>) {
        self.send(ListCommand::Search(text.into()));
    }

    /// Jump to a page; out-of-range targets are clamped
    pub fn go_to_page(&self, page: u32) {
        self.send(ListCommand::GoToPage(page));
    }

    pub fn first_page(&self) {
        self.send(ListCommand::FirstPage);
    }

    pub fn prev_page(&self) {
        self.send(ListCommand::PrevPage);
    }

    pub fn next_page(&self) {
        self.send(ListCommand::NextPage);
    }

    pub fn last_page(&self) {
        self.send(ListCommand::LastPage);
    }

    /// Switch the page size; values outside [`PAGE_SIZES`] are ignored
    pub fn set_limit(&self, limit: u32) {
        self.send(ListCommand::SetLimit(limit));
    }

    /// Refetch the current query tuple
    pub fn reload(&self) {
        self.send(ListCommand::Reload);
    }

    /// Delete a member, reloading the current page on success
    pub fn delete_member(&self, id: impl Into<String>) {
        self.send(ListCommand::DeleteMember(id.into()));
    }

    /// Add credit to a member, reloading the current page on success
    pub fn add_credit(&self, id: impl Into<String>, request: AddCreditRequest) {
        self.send(ListCommand::AddCredit(id.into(), request));
    }

    /// Remove credit from a member, reloading the current page on success
    pub fn remove_credit(&self, id: impl Into<String>, request: RemoveCreditRequest) {
        self.send(ListCommand::RemoveCredit(id.into(), request));
    }

    /// Cash out a member, reloading the current page on success
    pub fn cashout_credit(&self, id: impl Into<String>, request: CashoutCreditRequest) {
        self.send(ListCommand::CashoutCredit(id.into(), request));
    }

    /// Record a deposit, reloading the current page on success
    pub fn deposit(&self, request: DepositRequest) {
        self.send(ListCommand::Deposit(request));
    }

    /// Watch the state snapshots
    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.clone()
    }

    /// Current snapshot
    pub fn state(&self) -> ListState {
        self.state.borrow().clone()
    }

    /// Stop the worker
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for MemberListController {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct ListWorker {
    api: Arc<dyn MemberApi>,
    state: watch::Sender<ListState>,
    query: PageQuery,
    debounce: Duration,
    debounce_deadline: Option<Instant>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    events_tx: mpsc::UnboundedSender<WorkerEvent>,
}

impl ListWorker {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<ListCommand>,
        mut events: mpsc::UnboundedReceiver<WorkerEvent>,
        shutdown: CancellationToken,
    ) {
        tracing::info!(limit = self.query.limit, "member list worker started");

        // Initial load of (1, limit, "")
        self.dispatch_fetch();

        loop {
            let sleep_until = self
                .debounce_deadline
                .unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                _ = shutdown.cancelled() => {
                    break;
                }

                _ = tokio::time::sleep_until(sleep_until), if self.debounce_deadline.is_some() => {
                    self.debounce_deadline = None;
                    self.commit_search();
                }

                Some(event) = events.recv() => {
                    self.handle_event(event);
                }

                command = commands.recv() => {
                    match command {
                        Some(command) => self.handle_command(command),
                        // every controller handle is gone
                        None => break,
                    }
                }
            }
        }

        if let Some(in_flight) = self.in_flight.take() {
            in_flight.abort();
        }
        tracing::info!("member list worker stopped");
    }

    fn handle_command(&mut self, command: ListCommand) {
        match command {
            ListCommand::Search(text) => {
                self.state.send_modify(|s| s.search_input = text);
                self.debounce_deadline = Some(Instant::now() + self.debounce);
            }
            ListCommand::GoToPage(page) => self.change_page(page),
            ListCommand::FirstPage => self.change_page(1),
            ListCommand::PrevPage => self.change_page(self.query.page.saturating_sub(1)),
            ListCommand::NextPage => self.change_page(self.query.page.saturating_add(1)),
            ListCommand::LastPage => self.change_page(self.last_page()),
            ListCommand::SetLimit(limit) => self.set_limit(limit),
            ListCommand::Reload => self.dispatch_fetch(),
            ListCommand::DeleteMember(id) => {
                let api = self.api.clone();
                self.spawn_mutation("delete member", async move {
                    api.delete_member(&id).await
                });
            }
            ListCommand::AddCredit(id, request) => {
                let api = self.api.clone();
                self.spawn_mutation("add credit", async move {
                    api.add_credit(&id, &request).await
                });
            }
            ListCommand::RemoveCredit(id, request) => {
                let api = self.api.clone();
                self.spawn_mutation("remove credit", async move {
                    api.remove_credit(&id, &request).await
                });
            }
            ListCommand::CashoutCredit(id, request) => {
                let api = self.api.clone();
                self.spawn_mutation("cashout credit", async move {
                    api.cashout_credit(&id, &request).await
                });
            }
            ListCommand::Deposit(request) => {
                let api = self.api.clone();
                self.spawn_mutation("deposit", async move { api.deposit(&request).await });
            }
        }
    }

    fn handle_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::FetchSettled {
                generation,
                query,
                result,
            } => self.settle_fetch(generation, query, result),
            WorkerEvent::MutationSettled { action, result } => {
                self.settle_mutation(action, result)
            }
        }
    }

    /// Commit the debounced search text and jump back to the first page
    fn commit_search(&mut self) {
        let text = self.state.borrow().search_input.clone();
        tracing::debug!(search = %text, "committing debounced search");
        self.query.search = text;
        self.query.page = 1;
        self.dispatch_fetch();
    }

    fn change_page(&mut self, target: u32) {
        let clamped = target.clamp(1, self.last_page());
        if clamped != self.query.page {
            self.query.page = clamped;
            self.dispatch_fetch();
        }
    }

    fn set_limit(&mut self, limit: u32) {
        if !PAGE_SIZES.contains(&limit) {
            tracing::warn!(limit, "ignoring page size outside the allowed set");
            return;
        }
        if limit != self.query.limit {
            self.query.limit = limit;
            self.query.page = 1;
            self.dispatch_fetch();
        }
    }

    /// Last page the server reported, floored at 1 for empty result sets
    fn last_page(&self) -> u32 {
        self.state.borrow().pagination.total_pages.max(1)
    }

    /// Issue a list request for the current tuple, superseding any in-flight
    /// one
    fn dispatch_fetch(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
            tracing::debug!(generation, "aborted superseded list request");
        }

        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let api = self.api.clone();
        let query = self.query.clone();
        let events = self.events_tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = api.list_members(&query).await;
            let _ = events.send(WorkerEvent::FetchSettled {
                generation,
                query,
                result,
            });
        }));
    }

    fn spawn_mutation<F>(&self, action: &'static str, request: F)
    where
        F: Future<Output = ClientResult<ApiEnvelope<Value>>> + Send + 'static,
    {
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = request.await;
            let _ = events.send(WorkerEvent::MutationSettled { action, result });
        });
    }

    fn settle_fetch(
        &mut self,
        generation: u64,
        query: PageQuery,
        result: ClientResult<ApiEnvelope<MemberListData>>,
    ) {
        if generation != self.generation {
            tracing::trace!(generation, "discarding stale list response");
            return;
        }
        self.in_flight = None;

        match result {
            Ok(envelope) if envelope.success => match envelope.data {
                Some(data) => {
                    self.state.send_modify(|s| {
                        s.members = data.members;
                        s.summary = data.summary;
                        s.pagination = data.pagination;
                        s.query = query;
                        s.loading = false;
                        s.error = None;
                    });
                }
                None => {
                    self.fail("member list arrived without a payload".to_string());
                }
            },
            Ok(envelope) => {
                self.fail(envelope.error_message().to_string());
            }
            Err(e) => {
                self.fail(e.to_string());
            }
        }
    }

    fn settle_mutation(&mut self, action: &'static str, result: ClientResult<ApiEnvelope<Value>>) {
        match result {
            Ok(envelope) if envelope.success => {
                tracing::info!(action, "mutation succeeded, reloading current page");
                self.dispatch_fetch();
            }
            Ok(envelope) => {
                tracing::warn!(action, error = envelope.error_message(), "mutation refused");
                self.fail(envelope.error_message().to_string());
            }
            Err(e) => {
                tracing::error!(action, error = %e, "mutation failed");
                self.fail(e.to_string());
            }
        }
    }

    fn fail(&mut self, message: String) {
        tracing::error!(error = %message, "member list error");
        self.state.send_modify(|s| {
            s.loading = false;
            s.error = Some(message);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fake API that records list queries and answers from a fixed row count
    struct ScriptedApi {
        calls: Mutex<Vec<PageQuery>>,
        total_items: u64,
    }

    impl ScriptedApi {
        fn new(total_items: u64) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                total_items,
            })
        }

        fn calls(&self) -> Vec<PageQuery> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MemberApi for ScriptedApi {
        async fn list_members(
            &self,
            query: &PageQuery,
        ) -> ClientResult<ApiEnvelope<MemberListData>> {
            self.calls.lock().unwrap().push(query.clone());
            Ok(ApiEnvelope::ok(MemberListData {
                members: Vec::new(),
                summary: MemberSummary::default(),
                pagination: Pagination::new(query.page, query.limit, self.total_items),
            }))
        }

        async fn delete_member(&self, _id: &str) -> ClientResult<ApiEnvelope<Value>> {
            Ok(ApiEnvelope::ok(Value::Null))
        }

        async fn add_credit(
            &self,
            _id: &str,
            _request: &AddCreditRequest,
        ) -> ClientResult<ApiEnvelope<Value>> {
            Ok(ApiEnvelope::ok(Value::Null))
        }

        async fn remove_credit(
            &self,
            _id: &str,
            _request: &RemoveCreditRequest,
        ) -> ClientResult<ApiEnvelope<Value>> {
            Ok(ApiEnvelope::ok(Value::Null))
        }

        async fn cashout_credit(
            &self,
            _id: &str,
            _request: &CashoutCreditRequest,
        ) -> ClientResult<ApiEnvelope<Value>> {
            Ok(ApiEnvelope::ok(Value::Null))
        }

        async fn deposit(&self, _request: &DepositRequest) -> ClientResult<ApiEnvelope<Value>> {
            Ok(ApiEnvelope::ok(Value::Null))
        }
    }

    /// API that always reports the missing-token short circuit
    struct NoTokenApi;

    #[async_trait]
    impl MemberApi for NoTokenApi {
        async fn list_members(
            &self,
            _query: &PageQuery,
        ) -> ClientResult<ApiEnvelope<MemberListData>> {
            Err(ClientError::MissingCredential)
        }

        async fn delete_member(&self, _id: &str) -> ClientResult<ApiEnvelope<Value>> {
            Err(ClientError::MissingCredential)
        }

        async fn add_credit(
            &self,
            _id: &str,
            _request: &AddCreditRequest,
        ) -> ClientResult<ApiEnvelope<Value>> {
            Err(ClientError::MissingCredential)
        }

        async fn remove_credit(
            &self,
            _id: &str,
            _request: &RemoveCreditRequest,
        ) -> ClientResult<ApiEnvelope<Value>> {
            Err(ClientError::MissingCredential)
        }

        async fn cashout_credit(
            &self,
            _id: &str,
            _request: &CashoutCreditRequest,
        ) -> ClientResult<ApiEnvelope<Value>> {
            Err(ClientError::MissingCredential)
        }

        async fn deposit(&self, _request: &DepositRequest) -> ClientResult<ApiEnvelope<Value>> {
            Err(ClientError::MissingCredential)
        }
    }

    async fn wait_for_calls(api: &ScriptedApi, count: usize) {
        while api.calls().len() < count {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    #[test]
    fn test_page_window_at_the_start() {
        assert_eq!(page_window(1, 10), vec![1, 2, 3]);
        assert_eq!(page_window(2, 10), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_page_window_in_the_middle() {
        assert_eq!(page_window(5, 10), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_page_window_at_the_end() {
        assert_eq!(page_window(10, 10), vec![8, 9, 10]);
        assert_eq!(page_window(9, 10), vec![7, 8, 9, 10]);
    }

    #[test]
    fn test_page_window_single_page() {
        assert_eq!(page_window(1, 1), vec![1]);
    }

    #[test]
    fn test_page_window_never_exceeds_five_buttons() {
        for current in 1..=20 {
            assert!(page_window(current, 20).len() <= 5);
        }
    }

    #[test]
    fn test_page_window_clamps_out_of_range_current() {
        assert_eq!(page_window(99, 3), vec![1, 2, 3]);
        assert_eq!(page_window(1, 0), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_load_uses_default_tuple() {
        let api = ScriptedApi::new(25);
        let controller = MemberListController::spawn(api.clone());
        let mut rx = controller.subscribe();

        rx.wait_for(|s| !s.loading).await.unwrap();
        let calls = api.calls();
        assert_eq!(calls, vec![PageQuery::default()]);
        assert_eq!(controller.state().pagination.total_pages, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_coalesces_keystrokes() {
        let api = ScriptedApi::new(25);
        let controller = MemberListController::spawn(api.clone());
        let mut rx = controller.subscribe();
        rx.wait_for(|s| !s.loading).await.unwrap();

        for text in ["j", "jo", "joh", "john"] {
            controller.search(text);
        }
        rx.wait_for(|s| !s.loading && s.query.search == "john")
            .await
            .unwrap();

        let calls = api.calls();
        assert_eq!(calls.len(), 2, "burst must coalesce into one request");
        assert_eq!(calls[1].search, "john");
        assert_eq!(calls[1].page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_commit_resets_page() {
        let api = ScriptedApi::new(100);
        let controller = MemberListController::spawn(api.clone());
        let mut rx = controller.subscribe();
        rx.wait_for(|s| !s.loading).await.unwrap();

        controller.go_to_page(3);
        rx.wait_for(|s| !s.loading && s.query.page == 3).await.unwrap();

        controller.search("somchai");
        rx.wait_for(|s| !s.loading && s.query.search == "somchai")
            .await
            .unwrap();

        let last = api.calls().pop().unwrap();
        assert_eq!(last.page, 1);
        assert_eq!(last.search, "somchai");
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_navigation_clamps_to_valid_range() {
        let api = ScriptedApi::new(25); // 3 pages at limit 10
        let controller = MemberListController::spawn(api.clone());
        let mut rx = controller.subscribe();
        rx.wait_for(|s| !s.loading).await.unwrap();

        controller.go_to_page(99);
        rx.wait_for(|s| !s.loading && s.query.page == 3).await.unwrap();
        assert_eq!(api.calls().pop().unwrap().page, 3);

        controller.go_to_page(0);
        rx.wait_for(|s| !s.loading && s.query.page == 1).await.unwrap();
        assert_eq!(api.calls().pop().unwrap().page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigating_to_the_current_page_issues_no_request() {
        let api = ScriptedApi::new(25);
        let controller = MemberListController::spawn(api.clone());
        let mut rx = controller.subscribe();
        rx.wait_for(|s| !s.loading).await.unwrap();

        let before = api.calls().len();
        controller.go_to_page(1);
        controller.first_page();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(api.calls().len(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_limit_change_resets_page_and_invalid_limit_is_ignored() {
        let api = ScriptedApi::new(200);
        let controller = MemberListController::spawn(api.clone());
        let mut rx = controller.subscribe();
        rx.wait_for(|s| !s.loading).await.unwrap();

        controller.go_to_page(4);
        rx.wait_for(|s| !s.loading && s.query.page == 4).await.unwrap();

        controller.set_limit(25); // not an allowed size
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(api.calls().len(), 2);

        controller.set_limit(50);
        rx.wait_for(|s| !s.loading && s.query.limit == 50)
            .await
            .unwrap();
        let last = api.calls().pop().unwrap();
        assert_eq!(last.limit, 50);
        assert_eq!(last.page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mutation_success_reloads_the_active_tuple() {
        let api = ScriptedApi::new(100);
        let controller = MemberListController::spawn(api.clone());
        let mut rx = controller.subscribe();
        rx.wait_for(|s| !s.loading).await.unwrap();

        controller.go_to_page(2);
        rx.wait_for(|s| !s.loading && s.query.page == 2).await.unwrap();

        controller.delete_member("m-7");
        wait_for_calls(&api, 3).await;

        let calls = api.calls();
        assert_eq!(calls[2].page, 2, "reload must keep the pre-mutation page");
        assert_eq!(calls[2].limit, calls[1].limit);
        assert_eq!(calls[2].search, calls[1].search);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_token_surfaces_as_error_snapshot() {
        let controller = MemberListController::spawn(Arc::new(NoTokenApi));
        let mut rx = controller.subscribe();

        let state = rx
            .wait_for(|s| !s.loading && s.error.is_some())
            .await
            .unwrap()
            .clone();
        assert_eq!(state.error.as_deref(), Some("token not set"));
        assert!(state.members.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_initial_limit_falls_back_to_default() {
        let api = ScriptedApi::new(10);
        let controller = MemberListController::spawn_with_options(
            api.clone(),
            ListOptions {
                limit: 33,
                ..ListOptions::default()
            },
        );
        let mut rx = controller.subscribe();
        rx.wait_for(|s| !s.loading).await.unwrap();
        assert_eq!(controller.state().query.limit, DEFAULT_PAGE_SIZE);
    }
}
