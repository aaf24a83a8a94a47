//! Mock adapter routes
//!
//! Everything mounts under the adapter's `/api` prefix. Answers with the
//! production adapter's envelope, including its quirk: the member read
//! routes (list, detail, by-phone, balance) wrap the payload a second time
//! under `data.data`, everything else wraps once.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use shared::{
    AddCreditRequest, CashoutCreditRequest, CheckAccountRequest, DepositRequest, Member,
    MemberBalance, MemberCreate, MemberListData, MemberUpdate, PageQuery, Pagination,
    RemoveCreditRequest,
};

use crate::state::AppState;

/// Build the mock adapter router
pub fn router(state: Arc<AppState>) -> Router {
    use tower::limit::ConcurrencyLimitLayer;

    // 并发限制：最多 64 个并发请求
    let concurrency_limit = ConcurrencyLimitLayer::new(64);

    Router::new()
        .route("/api/member/list", get(list_members))
        .route("/api/member/create", post(create_member))
        .route("/api/member/deposit", post(deposit))
        .route("/api/member/check-account", post(check_account))
        .route("/api/member/verify-bank-account", post(check_account))
        .route("/api/member/phone/{phone}", get(get_member_by_phone))
        .route(
            "/api/member/{id}",
            get(get_member).put(update_member).delete(delete_member),
        )
        .route("/api/member/{id}/balance", get(get_member_balance))
        .route("/api/member/{id}/add-credit", post(add_credit))
        .route("/api/member/{id}/remove-credit", post(remove_credit))
        .route("/api/member/{id}/cashout-credit", post(cashout_credit))
        .route("/api/bank/lao/list", get(list_banks))
        .route("/api/currency/list", get(list_currencies))
        .route("/api/customer-group/list", get(list_customer_groups))
        // Request accounting and fault injection - wraps every route
        .layer(middleware::from_fn_with_state(
            state.clone(),
            track_and_shape,
        ))
        // 并发限制
        .layer(concurrency_limit)
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Count every request and apply the injected delay/failure knobs
async fn track_and_shape(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    state.record_hit();

    if state.take_failure().await {
        tracing::debug!("answering with an injected 500");
        return http_fail(StatusCode::INTERNAL_SERVER_ERROR, "Injected server error");
    }
    if let Some(delay) = state.take_delay().await {
        tracing::debug!(delay_ms = delay.as_millis() as u64, "delaying response");
        tokio::time::sleep(delay).await;
    }

    next.run(request).await
}

// ========== Envelope helpers ==========

fn ok_flat(data: Value) -> Response {
    Json(json!({
        "success": true,
        "data": data,
        "timestamp": Utc::now().to_rfc3339(),
    }))
    .into_response()
}

/// The production backend's double wrap on member read routes
fn ok_nested(data: Value) -> Response {
    ok_flat(json!({
        "data": data,
        "requestId": Uuid::new_v4().to_string(),
    }))
}

/// Business refusal delivered over HTTP 200
fn refuse(error: &str) -> Response {
    Json(json!({
        "success": false,
        "error": error,
        "timestamp": Utc::now().to_rfc3339(),
    }))
    .into_response()
}

fn http_fail(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "error": error,
            "statusCode": status.as_u16(),
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
        .into_response()
}

fn unauthorized() -> Response {
    http_fail(StatusCode::UNAUTHORIZED, "Invalid or missing token")
}

fn not_found() -> Response {
    http_fail(StatusCode::NOT_FOUND, "Member not found")
}

fn authorized(state: &AppState, headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token == state.valid_token)
        .unwrap_or(false)
}

fn matches_search(member: &Member, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let optional_hit = |field: &Option<String>| {
        field
            .as_deref()
            .map(|value| value.to_lowercase().contains(needle))
            .unwrap_or(false)
    };
    member.name.to_lowercase().contains(needle)
        || member.username.to_lowercase().contains(needle)
        || optional_hit(&member.phone)
        || optional_hit(&member.bank_account_no)
}

// ========== Member read routes ==========

async fn list_members(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    state.record_list_call(query.clone()).await;

    let members = state.members.read().await;
    let needle = query.search.to_lowercase();
    let hits: Vec<&Member> = members
        .iter()
        .filter(|member| matches_search(member, &needle))
        .collect();
    let total = hits.len() as u64;
    let rows: Vec<Member> = hits
        .into_iter()
        .skip(query.offset() as usize)
        .take(query.limit as usize)
        .cloned()
        .collect();

    let payload = MemberListData {
        members: rows,
        summary: state.summary().await,
        pagination: Pagination::new(query.page, query.limit, total),
    };
    ok_nested(json!(payload))
}

async fn get_member(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let members = state.members.read().await;
    match members.iter().find(|m| m.id == id) {
        Some(member) => ok_nested(json!(member)),
        None => not_found(),
    }
}

async fn get_member_by_phone(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(phone): Path<String>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let members = state.members.read().await;
    match members.iter().find(|m| m.phone.as_deref() == Some(phone.as_str())) {
        Some(member) => ok_nested(json!(member)),
        None => not_found(),
    }
}

async fn get_member_balance(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    state.record_balance_call();

    let members = state.members.read().await;
    match members.iter().find(|m| m.id == id) {
        Some(member) => {
            let payload = MemberBalance {
                member_id: member.id.clone(),
                balance: member.credit_balance.unwrap_or_default(),
                member: Some(member.clone()),
            };
            ok_nested(json!(payload))
        }
        None => not_found(),
    }
}

// ========== Member write routes ==========

async fn create_member(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<MemberCreate>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let mut members = state.members.write().await;
    if members.iter().any(|m| m.username == request.username) {
        return refuse("Username already exists");
    }

    let now = Utc::now();
    let member = Member {
        id: Uuid::new_v4().to_string(),
        name: request.name,
        username: request.username,
        phone: request.phone,
        bank_account_no: request.bank_account_no,
        bank_code: request.bank_code,
        currency: request.currency,
        credit_balance: Some(Decimal::ZERO),
        agent_username: None,
        is_banned: false,
        last_login_at: None,
        created_at: Some(now),
        updated_at: Some(now),
    };
    members.push(member.clone());
    tracing::info!(username = %member.username, "member created");
    ok_flat(json!(member))
}

async fn update_member(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<MemberUpdate>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let mut members = state.members.write().await;
    let Some(member) = members.iter_mut().find(|m| m.id == id) else {
        return not_found();
    };

    if let Some(name) = update.name {
        member.name = name;
    }
    if let Some(phone) = update.phone {
        member.phone = Some(phone);
    }
    if let Some(account) = update.bank_account_no {
        member.bank_account_no = Some(account);
    }
    if let Some(code) = update.bank_code {
        member.bank_code = Some(code);
    }
    if let Some(currency) = update.currency {
        member.currency = Some(currency);
    }
    if let Some(banned) = update.is_banned {
        member.is_banned = banned;
    }
    member.updated_at = Some(Utc::now());
    ok_flat(json!(member.clone()))
}

async fn delete_member(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let mut members = state.members.write().await;
    let before = members.len();
    members.retain(|m| m.id != id);
    if members.len() == before {
        return not_found();
    }
    tracing::info!(%id, "member deleted");
    ok_flat(json!({ "deleted": true, "id": id }))
}

// ========== Credit routes ==========

async fn add_credit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<AddCreditRequest>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    if request.amount <= Decimal::ZERO {
        return refuse("Amount must be positive");
    }
    let mut members = state.members.write().await;
    let Some(member) = members.iter_mut().find(|m| m.id == id) else {
        return not_found();
    };
    let balance = member.credit_balance.unwrap_or_default() + request.amount;
    member.credit_balance = Some(balance);
    ok_flat(json!({ "newBalance": balance.to_f64().unwrap_or_default() }))
}

async fn remove_credit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<RemoveCreditRequest>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    if request.amount <= Decimal::ZERO {
        return refuse("Amount must be positive");
    }
    let mut members = state.members.write().await;
    let Some(member) = members.iter_mut().find(|m| m.id == id) else {
        return not_found();
    };
    let balance = member.credit_balance.unwrap_or_default();
    if balance < request.amount {
        return refuse("Insufficient balance");
    }
    let balance = balance - request.amount;
    member.credit_balance = Some(balance);
    ok_flat(json!({ "newBalance": balance.to_f64().unwrap_or_default() }))
}

async fn cashout_credit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(_request): Json<CashoutCreditRequest>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let mut members = state.members.write().await;
    let Some(member) = members.iter_mut().find(|m| m.id == id) else {
        return not_found();
    };
    let cashed = member.credit_balance.unwrap_or_default();
    member.credit_balance = Some(Decimal::ZERO);
    ok_flat(json!({ "cashedOut": cashed.to_f64().unwrap_or_default(), "newBalance": 0.0 }))
}

async fn deposit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<DepositRequest>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    if request.amount <= Decimal::ZERO {
        return refuse("Amount must be positive");
    }
    let mut members = state.members.write().await;
    let Some(member) = members
        .iter_mut()
        .find(|m| m.phone.as_deref() == Some(request.phone.as_str()))
    else {
        return refuse("Member not found");
    };

    let balance = member.credit_balance.unwrap_or_default() + request.amount;
    member.credit_balance = Some(balance);
    tracing::info!(
        phone = %request.phone,
        recorded_at = %request.actual_date_time,
        "deposit recorded"
    );
    ok_flat(json!({
        "message": "Deposit recorded",
        "memberId": member.id,
        "newBalance": balance.to_f64().unwrap_or_default(),
        "actualDateTime": request.actual_date_time,
    }))
}

// ========== Verification route ==========

async fn check_account(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CheckAccountRequest>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let account = request.bank_account_number.trim();
    let plausible =
        (8..=16).contains(&account.len()) && account.chars().all(|c| c.is_ascii_digit());
    if !plausible {
        return refuse("Account not found");
    }
    // deterministic holder name so tests can assert the auto-fill
    let last4 = &account[account.len() - 4..];
    ok_flat(json!({ "message": format!("ACCOUNT HOLDER {last4}") }))
}

// ========== Reference routes ==========

async fn list_banks(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    ok_flat(json!([
        { "value": "BCEL", "label": "Banque pour le Commerce Exterieur Lao" },
        { "value": "LDB", "label": "Lao Development Bank" },
        { "value": "JDB", "label": "Joint Development Bank" },
        { "value": "APB", "label": "Agricultural Promotion Bank" },
    ]))
}

async fn list_currencies(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    ok_flat(json!([
        { "value": "LAK", "label": "Lao Kip" },
        { "value": "THB", "label": "Thai Baht" },
        { "value": "USD", "label": "US Dollar" },
    ]))
}

async fn list_customer_groups(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    ok_flat(json!([
        { "id": "cg-1", "picklistLabel": "VIP" },
        { "id": "cg-2", "picklistLabel": "Regular" },
        { "id": "cg-3", "picklistLabel": "New" },
    ]))
}
