//! Reference data served by the adapter's picklist endpoints

use serde::{Deserialize, Serialize};

/// Lao bank picklist entry, `value` is the short code sent back on create
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BankOption {
    pub value: String,
    pub label: String,
}

/// Currency picklist entry (e.g. LAK, THB)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrencyOption {
    pub value: String,
    pub label: String,
}

/// Customer segmentation group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerGroup {
    pub id: String,
    pub picklist_label: String,
}
