//! Shared types for the bank-adapter console
//!
//! Wire-format types used by both the client library and the mock adapter:
//! the response envelope, pagination metadata, member models and request
//! payloads.

pub mod models;
pub mod request;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Envelope and pagination re-exports (for convenient access)
pub use response::{ApiEnvelope, Pagination};

// Model re-exports
pub use models::{
    BankOption, CurrencyOption, CustomerGroup, Member, MemberBalance, MemberCreate,
    MemberListData, MemberSummary, MemberUpdate,
};

// Request re-exports
pub use request::{
    AddCreditRequest, CashoutCreditRequest, CheckAccountRequest, DepositRequest, PageQuery,
    RemoveCreditRequest, RequestError,
};
