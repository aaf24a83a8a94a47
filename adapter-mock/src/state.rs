//! In-memory adapter state
//!
//! Holds the member store plus the counters and fault-injection knobs the
//! integration tests assert against.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use shared::{Member, MemberSummary, PageQuery};

/// Shared state behind every handler and the test harness
pub struct AppState {
    /// The one bearer token the mock accepts
    pub valid_token: String,
    pub members: RwLock<Vec<Member>>,
    /// Every request seen, including rejected ones
    hits: AtomicU64,
    /// Authorized list fetches
    list_calls: AtomicU64,
    /// Authorized balance fetches
    balance_calls: AtomicU64,
    /// Queries of authorized list fetches, in arrival order
    list_queries: RwLock<Vec<PageQuery>>,
    /// Latency injected into the next N requests
    delay: Mutex<Option<(u32, Duration)>>,
    /// HTTP 500s returned for the next N requests
    fail: Mutex<u32>,
}

impl AppState {
    pub fn new(valid_token: impl Into<String>, members: Vec<Member>) -> Self {
        Self {
            valid_token: valid_token.into(),
            members: RwLock::new(members),
            hits: AtomicU64::new(0),
            list_calls: AtomicU64::new(0),
            balance_calls: AtomicU64::new(0),
            list_queries: RwLock::new(Vec::new()),
            delay: Mutex::new(None),
            fail: Mutex::new(0),
        }
    }

    // ========== Request accounting ==========

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) async fn record_list_call(&self, query: PageQuery) {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.list_queries.write().await.push(query);
    }

    pub(crate) fn record_balance_call(&self) {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
    }

    /// Total requests that reached the mock
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn balance_calls(&self) -> u64 {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub async fn list_queries(&self) -> Vec<PageQuery> {
        self.list_queries.read().await.clone()
    }

    // ========== Fault injection ==========

    /// Delay the next `count` requests by `delay`
    pub async fn delay_next(&self, count: u32, delay: Duration) {
        *self.delay.lock().await = Some((count, delay));
    }

    /// Answer the next `count` requests with HTTP 500
    pub async fn fail_next(&self, count: u32) {
        *self.fail.lock().await = count;
    }

    pub(crate) async fn take_delay(&self) -> Option<Duration> {
        let mut slot = self.delay.lock().await;
        match slot.take() {
            Some((count, delay)) if count > 1 => {
                *slot = Some((count - 1, delay));
                Some(delay)
            }
            Some((_, delay)) => Some(delay),
            None => None,
        }
    }

    pub(crate) async fn take_failure(&self) -> bool {
        let mut remaining = self.fail.lock().await;
        if *remaining > 0 {
            *remaining -= 1;
            true
        } else {
            false
        }
    }

    // ========== Member store ==========

    /// Registration counts over the whole store
    pub async fn summary(&self) -> MemberSummary {
        let members = self.members.read().await;
        let now = Utc::now();
        let mut summary = MemberSummary {
            total: members.len() as u64,
            ..MemberSummary::default()
        };
        for member in members.iter() {
            let Some(created) = member.created_at else {
                continue;
            };
            let age = now - created;
            if age <= chrono::Duration::days(1) {
                summary.today += 1;
            }
            if age <= chrono::Duration::days(7) {
                summary.week += 1;
            }
            if age <= chrono::Duration::days(30) {
                summary.month += 1;
            }
        }
        summary
    }

    pub async fn member_id_by_username(&self, username: &str) -> Option<String> {
        self.members
            .read()
            .await
            .iter()
            .find(|m| m.username == username)
            .map(|m| m.id.clone())
    }

    pub async fn member_balance(&self, id: &str) -> Option<Decimal> {
        self.members
            .read()
            .await
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.credit_balance.unwrap_or_default())
    }
}

const SEED_POOL: [(&str, &str); 8] = [
    ("Somchai Vongsa", "somchai"),
    ("Khamla Phommason", "khamla"),
    ("Noy Keobounphan", "noy"),
    ("Bounmy Sisouk", "bounmy"),
    ("Chanthavy Luangrath", "chanthavy"),
    ("Phet Inthavong", "phet"),
    ("Malee Saynasine", "malee"),
    ("Anousone Chanthala", "anousone"),
];

const SEED_BANKS: [&str; 4] = ["BCEL", "LDB", "JDB", "APB"];

/// Deterministic member fixtures with staggered registration dates
pub fn seed_members(count: usize) -> Vec<Member> {
    let now = Utc::now();
    (0..count)
        .map(|i| {
            let (name, username) = SEED_POOL[i % SEED_POOL.len()];
            Member {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                username: format!("{username}{i:03}"),
                phone: Some(format!("2055{:06}", 510_000 + i)),
                bank_account_no: Some(format!("1100{:08}", 12_345_678 + i)),
                bank_code: Some(SEED_BANKS[i % SEED_BANKS.len()].to_string()),
                currency: Some(if i % 5 == 4 { "THB" } else { "LAK" }.to_string()),
                credit_balance: Some(Decimal::from(100_000 * (i as u32 % 10 + 1))),
                agent_username: None,
                is_banned: false,
                last_login_at: None,
                created_at: Some(now - chrono::Duration::days(i as i64)),
                updated_at: Some(now - chrono::Duration::days(i as i64)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_members_are_unique_and_staggered() {
        let members = seed_members(12);
        assert_eq!(members.len(), 12);

        let mut usernames: Vec<_> = members.iter().map(|m| m.username.clone()).collect();
        usernames.sort();
        usernames.dedup();
        assert_eq!(usernames.len(), 12);

        // newest first, one day apart
        assert!(members[0].created_at > members[11].created_at);
    }

    #[tokio::test]
    async fn test_summary_buckets_by_age() {
        let state = AppState::new("t", seed_members(40));
        let summary = state.summary().await;
        assert_eq!(summary.total, 40);
        // member i registered i days ago, so only i = 0 is younger than a day
        assert_eq!(summary.today, 1);
        assert_eq!(summary.week, 7);
        assert_eq!(summary.month, 30);
    }

    #[tokio::test]
    async fn test_delay_knob_decrements() {
        let state = AppState::new("t", Vec::new());
        state.delay_next(2, Duration::from_millis(5)).await;
        assert!(state.take_delay().await.is_some());
        assert!(state.take_delay().await.is_some());
        assert!(state.take_delay().await.is_none());
    }

    #[tokio::test]
    async fn test_failure_knob_decrements() {
        let state = AppState::new("t", Vec::new());
        state.fail_next(1).await;
        assert!(state.take_failure().await);
        assert!(!state.take_failure().await);
    }
}
