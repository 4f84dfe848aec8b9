//! Data transfer objects for the PayFast HTTP endpoints.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Query Parameters
// ════════════════════════════════════════════════════════════════════════════════

/// Query for `GET /pay`.
#[derive(Debug, Clone, Deserialize)]
pub struct PayQuery {
    pub order_id: i64,
    /// Set when the buyer retries payment from the order details page.
    #[serde(default)]
    pub retry: bool,
}

/// Query for the buyer return endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderQuery {
    pub order_id: i64,
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create an error response with details.
    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pay_query_retry_defaults_to_false() {
        let query: PayQuery = serde_json::from_str(r#"{"order_id": 7}"#).unwrap();
        assert_eq!(query.order_id, 7);
        assert!(!query.retry);
    }

    #[test]
    fn error_response_omits_missing_details() {
        let json = serde_json::to_value(ErrorResponse::new("ORDER_NOT_FOUND", "Order 1 not found"))
            .unwrap();
        assert_eq!(json["error_code"], "ORDER_NOT_FOUND");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn error_response_with_details_includes_details() {
        let response = ErrorResponse::with_details(
            "VALIDATION_FAILED",
            "Invalid order id",
            serde_json::json!({"field": "order_id"}),
        );
        assert_eq!(response.details.unwrap()["field"], "order_id");
    }
}
