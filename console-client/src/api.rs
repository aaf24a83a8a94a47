//! Typed adapter API operations
//!
//! One thin method per adapter endpoint. Every call returns the full
//! envelope so business failures (`success: false`) reach the caller with
//! the adapter's own message intact.

use async_trait::async_trait;
use serde_json::Value;

use shared::{
    AddCreditRequest, ApiEnvelope, BankOption, CashoutCreditRequest, CheckAccountRequest,
    CurrencyOption, CustomerGroup, DepositRequest, Member, MemberBalance, MemberCreate,
    MemberListData, MemberUpdate, PageQuery, RemoveCreditRequest,
};

use crate::error::ClientResult;
use crate::http::AdapterClient;

/// Picklists a member form needs, loaded together
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub banks: Vec<BankOption>,
    pub currencies: Vec<CurrencyOption>,
    pub customer_groups: Vec<CustomerGroup>,
}

impl AdapterClient {
    // ========== Member API ==========

    /// Fetch one page of members with the registration summary
    pub async fn list_members(
        &self,
        query: &PageQuery,
    ) -> ClientResult<ApiEnvelope<MemberListData>> {
        self.get_with_query("member/list", query).await
    }

    /// Fetch a member by id
    pub async fn get_member(&self, id: &str) -> ClientResult<ApiEnvelope<Member>> {
        self.get(&format!("member/{id}")).await
    }

    /// Fetch a member by phone number
    pub async fn get_member_by_phone(&self, phone: &str) -> ClientResult<ApiEnvelope<Member>> {
        self.get(&format!("member/phone/{phone}")).await
    }

    /// Fetch a member's live balance
    ///
    /// Always hits the adapter; balances are never cached client-side.
    pub async fn get_member_balance(
        &self,
        id: &str,
    ) -> ClientResult<ApiEnvelope<MemberBalance>> {
        self.get(&format!("member/{id}/balance")).await
    }

    /// Create a member
    pub async fn create_member(
        &self,
        member: &MemberCreate,
    ) -> ClientResult<ApiEnvelope<Member>> {
        self.post("member/create", member).await
    }

    /// Update a member
    pub async fn update_member(
        &self,
        id: &str,
        update: &MemberUpdate,
    ) -> ClientResult<ApiEnvelope<Member>> {
        self.put(&format!("member/{id}"), update).await
    }

    /// Delete a member
    pub async fn delete_member(&self, id: &str) -> ClientResult<ApiEnvelope<Value>> {
        self.delete(&format!("member/{id}")).await
    }

    // ========== Reference API ==========

    /// List the Lao banks picklist
    pub async fn list_banks(&self) -> ClientResult<ApiEnvelope<Vec<BankOption>>> {
        self.get("bank/lao/list").await
    }

    /// List supported currencies
    pub async fn list_currencies(&self) -> ClientResult<ApiEnvelope<Vec<CurrencyOption>>> {
        self.get("currency/list").await
    }

    /// List customer groups
    pub async fn list_customer_groups(&self) -> ClientResult<ApiEnvelope<Vec<CustomerGroup>>> {
        self.get("customer-group/list").await
    }

    /// Load every picklist a member form needs, concurrently
    ///
    /// A failure or refusal of any of the three lists aborts the load.
    pub async fn load_reference_data(&self) -> ClientResult<ReferenceData> {
        let (banks, currencies, groups) = tokio::try_join!(
            self.list_banks(),
            self.list_currencies(),
            self.list_customer_groups(),
        )?;
        Ok(ReferenceData {
            banks: banks.data.unwrap_or_default(),
            currencies: currencies.data.unwrap_or_default(),
            customer_groups: groups.data.unwrap_or_default(),
        })
    }

    // ========== Account verification API ==========

    /// Verify a bank account before creating a member
    ///
    /// On success the envelope's payload carries a `message` with the
    /// resolved account-holder name, which the console uses to fill the
    /// member's name.
    pub async fn check_account(
        &self,
        request: &CheckAccountRequest,
    ) -> ClientResult<ApiEnvelope<Value>> {
        self.post("member/check-account", request).await
    }

    /// Alternate verification route kept by some adapter deployments
    pub async fn verify_bank_account(
        &self,
        request: &CheckAccountRequest,
    ) -> ClientResult<ApiEnvelope<Value>> {
        self.post("member/verify-bank-account", request).await
    }

    // ========== Credit API ==========

    /// Add credit to a member
    pub async fn add_credit(
        &self,
        id: &str,
        request: &AddCreditRequest,
    ) -> ClientResult<ApiEnvelope<Value>> {
        self.post(&format!("member/{id}/add-credit"), request).await
    }

    /// Remove credit from a member
    pub async fn remove_credit(
        &self,
        id: &str,
        request: &RemoveCreditRequest,
    ) -> ClientResult<ApiEnvelope<Value>> {
        self.post(&format!("member/{id}/remove-credit"), request)
            .await
    }

    /// Cash out a member's entire balance
    pub async fn cashout_credit(
        &self,
        id: &str,
        request: &CashoutCreditRequest,
    ) -> ClientResult<ApiEnvelope<Value>> {
        self.post(&format!("member/{id}/cashout-credit"), request)
            .await
    }

    /// Record a manual deposit
    pub async fn deposit(&self, request: &DepositRequest) -> ClientResult<ApiEnvelope<Value>> {
        self.post("member/deposit", request).await
    }
}

/// Operations the member-list controller drives
///
/// Concrete signatures keep the trait object-safe, so tests can swap in a
/// scripted fake without opening a socket.
#[async_trait]
pub trait MemberApi: Send + Sync {
    async fn list_members(&self, query: &PageQuery) -> ClientResult<ApiEnvelope<MemberListData>>;

    async fn delete_member(&self, id: &str) -> ClientResult<ApiEnvelope<Value>>;

    async fn add_credit(
        &self,
        id: &str,
        request: &AddCreditRequest,
    ) -> ClientResult<ApiEnvelope<Value>>;

    async fn remove_credit(
        &self,
        id: &str,
        request: &RemoveCreditRequest,
    ) -> ClientResult<ApiEnvelope<Value>>;

    async fn cashout_credit(
        &self,
        id: &str,
        request: &CashoutCreditRequest,
    ) -> ClientResult<ApiEnvelope<Value>>;

    async fn deposit(&self, request: &DepositRequest) -> ClientResult<ApiEnvelope<Value>>;
}

#[async_trait]
impl MemberApi for AdapterClient {
    async fn list_members(&self, query: &PageQuery) -> ClientResult<ApiEnvelope<MemberListData>> {
        AdapterClient::list_members(self, query).await
    }

    async fn delete_member(&self, id: &str) -> ClientResult<ApiEnvelope<Value>> {
        AdapterClient::delete_member(self, id).await
    }

    async fn add_credit(
        &self,
        id: &str,
        request: &AddCreditRequest,
    ) -> ClientResult<ApiEnvelope<Value>> {
        AdapterClient::add_credit(self, id, request).await
    }

    async fn remove_credit(
        &self,
        id: &str,
        request: &RemoveCreditRequest,
    ) -> ClientResult<ApiEnvelope<Value>> {
        AdapterClient::remove_credit(self, id, request).await
    }

    async fn cashout_credit(
        &self,
        id: &str,
        request: &CashoutCreditRequest,
    ) -> ClientResult<ApiEnvelope<Value>> {
        AdapterClient::cashout_credit(self, id, request).await
    }

    async fn deposit(&self, request: &DepositRequest) -> ClientResult<ApiEnvelope<Value>> {
        AdapterClient::deposit(self, request).await
    }
}
