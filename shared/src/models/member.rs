//! Member Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::response::Pagination;

/// Member entity (会员)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Backend-assigned opaque id
    pub id: String,
    pub name: String,
    pub username: String,
    pub phone: Option<String>,
    pub bank_account_no: Option<String>,
    /// Bank short code, e.g. "BCEL"
    pub bank_code: Option<String>,
    pub currency: Option<String>,
    /// Credit balance (余额), decimal string on the wire
    pub credit_balance: Option<Decimal>,
    pub agent_username: Option<String>,
    #[serde(default)]
    pub is_banned: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Registration counts shown above the member table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberSummary {
    pub today: u64,
    pub week: u64,
    pub month: u64,
    pub total: u64,
}

/// One page of the member list plus its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberListData {
    pub members: Vec<Member>,
    pub summary: MemberSummary,
    pub pagination: Pagination,
}

/// Live balance lookup result, never cached
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBalance {
    pub member_id: String,
    /// JSON number on the wire, unlike the list's decimal strings
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub member: Option<Member>,
}

/// Create member payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCreate {
    pub name: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// BCEL One wallet id, when the member registered through it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcel_one_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_channel_id: Option<String>,
}

/// Update member payload, every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_banned: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_member() -> Member {
        Member {
            id: "m-001".into(),
            name: "Somchai Vongsa".into(),
            username: "somchai".into(),
            phone: Some("2055512345".into()),
            bank_account_no: Some("110012345678".into()),
            bank_code: Some("BCEL".into()),
            currency: Some("LAK".into()),
            credit_balance: Some(Decimal::new(12050, 2)),
            agent_username: None,
            is_banned: false,
            last_login_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_member_wire_keys_are_camel_case() {
        let json = serde_json::to_string(&sample_member()).unwrap();
        assert!(json.contains("\"bankAccountNo\":\"110012345678\""));
        assert!(json.contains("\"isBanned\":false"));
        assert!(json.contains("\"creditBalance\":\"120.50\""));
    }

    #[test]
    fn test_member_tolerates_missing_optionals() {
        let member: Member =
            serde_json::from_str(r#"{"id":"m-9","name":"Noy","username":"noy"}"#).unwrap();
        assert_eq!(member.id, "m-9");
        assert!(!member.is_banned);
        assert!(member.credit_balance.is_none());
    }

    #[test]
    fn test_balance_is_a_number_on_the_wire() {
        let balance = MemberBalance {
            member_id: "m-001".into(),
            balance: Decimal::new(99925, 2),
            member: Some(sample_member()),
        };
        let json = serde_json::to_string(&balance).unwrap();
        assert!(json.contains("\"balance\":999.25"));
        assert!(json.contains("\"memberId\":\"m-001\""));
    }

    #[test]
    fn test_update_payload_skips_unset_fields() {
        let update = MemberUpdate {
            phone: Some("2055599999".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"phone":"2055599999"}"#
        );
    }
}
