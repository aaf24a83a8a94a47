//! Adapter response envelope
//!
//! Every adapter endpoint answers with the same JSON envelope, camelCase on
//! the wire. Business failures travel inside a 200 response with
//! `success: false` and a human-readable `error`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Unified adapter response envelope
///
/// ```json
/// {
///     "success": true,
///     "data": { ... },
///     "timestamp": "2024-01-15T14:30:00Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    /// Business outcome (transport status is carried by HTTP itself)
    pub success: bool,
    /// Response payload (absent on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Route prefix echoed by some deployments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Server-side RFC 3339 timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Human-readable failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// HTTP status echoed on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Free-form validation details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl<T> ApiEnvelope<T> {
    /// Create a successful envelope
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            prefix: None,
            timestamp: Some(Utc::now().to_rfc3339()),
            error: None,
            status_code: None,
            details: None,
        }
    }

    /// Create a failure envelope
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            prefix: None,
            timestamp: Some(Utc::now().to_rfc3339()),
            error: Some(error.into()),
            status_code: None,
            details: None,
        }
    }

    /// Create a failure envelope carrying the HTTP status it rode on
    pub fn fail_with_status(error: impl Into<String>, status: u16) -> Self {
        let mut envelope = Self::fail(error);
        envelope.status_code = Some(status);
        envelope
    }

    /// Failure message, or a fixed fallback when the backend sent none
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown adapter error")
    }
}

/// Pagination metadata, server-computed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub limit: u32,
    /// Total number of items across all pages
    pub total_items: u64,
    /// Total number of pages
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    /// Create pagination metadata, deriving page count and flags
    pub fn new(page: u32, limit: u32, total_items: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            ((total_items as f64) / (limit as f64)).ceil() as u32
        };
        Self {
            page,
            limit,
            total_items,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 10, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_rounds_up_partial_pages() {
        let p = Pagination::new(1, 10, 23);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next_page);
        assert!(!p.has_prev_page);
    }

    #[test]
    fn test_pagination_exact_division() {
        let p = Pagination::new(2, 20, 40);
        assert_eq!(p.total_pages, 2);
        assert!(!p.has_next_page);
        assert!(p.has_prev_page);
    }

    #[test]
    fn test_pagination_empty_set() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
        assert!(!p.has_prev_page);
    }

    #[test]
    fn test_envelope_uses_camel_case_keys() {
        let envelope = ApiEnvelope::<()>::fail_with_status("duplicate username", 400);
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains("\"statusCode\":400"));
        assert!(json.contains("\"success\":false"));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_pagination_wire_format() {
        let json = serde_json::to_string(&Pagination::new(2, 10, 23)).unwrap();
        assert!(json.contains("\"totalItems\":23"));
        assert!(json.contains("\"totalPages\":3"));
        assert!(json.contains("\"hasNextPage\":true"));
        assert!(json.contains("\"hasPrevPage\":true"));
    }
}
