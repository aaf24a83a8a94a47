//! Request payloads accepted by the adapter
//!
//! The credit and deposit amounts are JSON numbers on the wire, matching
//! what the adapter's own console sends.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Member list query parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageQuery {
    /// Page number (1-based, default: 1)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Items per page (default: 10)
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Search keyword, matched against name, username, phone and account no
    #[serde(default)]
    pub search: String,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: String::new(),
        }
    }
}

impl PageQuery {
    /// Get the slice offset for the requested page
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) as u64 * self.limit as u64
    }
}

/// Bank account verification payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAccountRequest {
    pub bank_account_number: String,
    /// Bank short code, e.g. "BCEL"
    pub bank_name: String,
    /// Currency of the account being checked
    pub bank_type: String,
    pub phone: String,
}

/// Credit top-up payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCreditRequest {
    pub phone: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub remarks: String,
}

/// Credit deduction payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveCreditRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub remarks: String,
}

/// Full cashout payload, the adapter zeroes the balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashoutCreditRequest {
    pub remarks: String,
}

/// Manual deposit payload
///
/// The console collects the deposit date and time as two separate inputs;
/// `actual_date_time` is their combination and is what the adapter records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub phone: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub bank_name: String,
    /// As entered, `YYYY-MM-DD`
    pub date_deposit: String,
    /// As entered, `HH:MM`
    pub time_deposit: String,
    /// `date_deposit` + `time_deposit` as one local instant
    pub actual_date_time: NaiveDateTime,
}

impl DepositRequest {
    /// Build a deposit, combining the date and time inputs
    ///
    /// Rejects malformed inputs before anything reaches the wire.
    pub fn new(
        phone: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
        bank_name: impl Into<String>,
        date_deposit: &str,
        time_deposit: &str,
    ) -> Result<Self, RequestError> {
        let date = NaiveDate::parse_from_str(date_deposit, "%Y-%m-%d")
            .map_err(|_| RequestError::InvalidDate(date_deposit.to_string()))?;
        let time = NaiveTime::parse_from_str(time_deposit, "%H:%M")
            .map_err(|_| RequestError::InvalidTime(time_deposit.to_string()))?;
        Ok(Self {
            phone: phone.into(),
            amount,
            currency: currency.into(),
            bank_name: bank_name.into(),
            date_deposit: date_deposit.to_string(),
            time_deposit: time_deposit.to_string(),
            actual_date_time: date.and_time(time),
        })
    }
}

/// Payload construction failure
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("invalid deposit date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid deposit time '{0}', expected HH:MM")]
    InvalidTime(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.search, "");
    }

    #[test]
    fn test_page_query_defaults_apply_when_params_missing() {
        let query: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query, PageQuery::default());
    }

    #[test]
    fn test_offset_math() {
        let query = PageQuery {
            page: 3,
            limit: 20,
            search: String::new(),
        };
        assert_eq!(query.offset(), 40);
        assert_eq!(PageQuery::default().offset(), 0);
    }

    #[test]
    fn test_deposit_combines_date_and_time() {
        let deposit = DepositRequest::new(
            "2055512345",
            Decimal::new(500_000, 0),
            "LAK",
            "BCEL",
            "2024-01-15",
            "14:30",
        )
        .unwrap();
        let json = serde_json::to_string(&deposit).unwrap();
        assert!(json.contains("\"actualDateTime\":\"2024-01-15T14:30:00\""));
        assert!(json.contains("\"dateDeposit\":\"2024-01-15\""));
        assert!(json.contains("\"timeDeposit\":\"14:30\""));
    }

    #[test]
    fn test_deposit_rejects_malformed_time() {
        let result = DepositRequest::new(
            "2055512345",
            Decimal::ONE,
            "LAK",
            "BCEL",
            "2024-01-15",
            "25:99",
        );
        assert!(matches!(result, Err(RequestError::InvalidTime(_))));
    }

    #[test]
    fn test_deposit_rejects_malformed_date() {
        let result = DepositRequest::new(
            "2055512345",
            Decimal::ONE,
            "LAK",
            "BCEL",
            "15/01/2024",
            "14:30",
        );
        assert!(matches!(result, Err(RequestError::InvalidDate(_))));
    }
}
