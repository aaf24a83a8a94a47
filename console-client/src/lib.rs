//! Console client for the bank-adapter API
//!
//! File-backed token storage, a typed HTTP client covering the member,
//! reference and credit endpoints, and an async member-list controller with
//! debounced search and server-driven pagination.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod http;
pub mod token;

pub use api::{MemberApi, ReferenceData};
pub use config::ClientConfig;
pub use controller::{ListOptions, ListState, MemberListController, PAGE_SIZES, page_window};
pub use error::{ClientError, ClientResult};
pub use http::AdapterClient;
pub use token::{StoredToken, TokenProbe, TokenStore};

// Re-export shared types for convenience
pub use shared::{
    AddCreditRequest, ApiEnvelope, BankOption, CashoutCreditRequest, CheckAccountRequest,
    CurrencyOption, CustomerGroup, DepositRequest, Member, MemberBalance, MemberCreate,
    MemberListData, MemberSummary, MemberUpdate, PageQuery, Pagination, RemoveCreditRequest,
};
