//! Axum router configuration for the PayFast endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{cancel, notify, pay, success, PaymentAppState};

/// Create the PayFast router.
///
/// # Routes
///
/// ## Buyer Endpoints
/// - `GET /pay?order_id=N` - Redirect to the PayFast hosted page
/// - `GET /success?order_id=N` - Return after payment
/// - `GET /cancel?order_id=N` - Return after cancelling
///
/// ## Gateway Endpoints (signature verified)
/// - `POST /notify` - Instant transaction notification
pub fn payment_routes() -> Router<PaymentAppState> {
    Router::new()
        .route("/pay", get(pay))
        .route("/success", get(success))
        .route("/cancel", get(cancel))
        .route("/notify", post(notify))
}

/// Create the complete PayFast module router, mounted at `/payfast`.
///
/// # Example
///
/// ```ignore
/// let app = payfast_router().with_state(app_state);
/// ```
pub fn payfast_router() -> Router<PaymentAppState> {
    Router::new().nest("/payfast", payment_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::memory::{InMemoryOrderLock, InMemoryOrderRepository};
    use crate::adapters::payfast::{PayFastPaymentMethod, StaticSettingsProvider};
    use crate::domain::foundation::{Amount, OrderGuid, OrderId};
    use crate::domain::order::{Order, OrderItem, PaymentStatus};
    use crate::domain::payfast::{GatewaySettings, RevalidationError};
    use crate::ports::PaymentValidator;

    // ════════════════════════════════════════════════════════════════════════════
    // Fixtures
    // ════════════════════════════════════════════════════════════════════════════

    struct AlwaysValid;

    #[async_trait]
    impl PaymentValidator for AlwaysValid {
        async fn validate(
            &self,
            _settings: &GatewaySettings,
            _body: &str,
        ) -> Result<(), RevalidationError> {
            Ok(())
        }
    }

    const BASE_URL: &str = "https://shop.test/";

    fn state_with(orders: Vec<Order>) -> PaymentAppState {
        let repository = Arc::new(InMemoryOrderRepository::new());
        for order in orders {
            repository.insert(order);
        }
        let settings = Arc::new(StaticSettingsProvider::new(GatewaySettings::new(
            true, "10000100", "46f0cd694581a", None,
        )));
        PaymentAppState {
            order_repository: repository,
            order_lock: Arc::new(InMemoryOrderLock::new()),
            payment_validator: Arc::new(AlwaysValid),
            settings_provider: settings.clone(),
            payment_method: Arc::new(PayFastPaymentMethod::new(settings, BASE_URL)),
            store_base_url: BASE_URL.to_string(),
            store_scope: None,
        }
    }

    fn order(id: i64) -> Order {
        Order::place(
            OrderId::new(id).unwrap(),
            OrderGuid::new(),
            Amount::parse_invariant("250.00").unwrap(),
            vec![OrderItem::new("Blue Mug", 2)],
        )
    }

    async fn get(state: PaymentAppState, uri: &str) -> axum::response::Response {
        payfast_router()
            .with_state(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Buyer Endpoints
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn pay_redirects_to_sandbox_process_page() {
        let response = get(state_with(vec![order(3)]), "/payfast/pay?order_id=3").await;

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = location(&response);
        assert!(location.starts_with("https://sandbox.payfast.co.za/eng/process?"));
        assert!(location.contains("amount=250.00"));
        assert!(location.contains("&signature="));
    }

    #[tokio::test]
    async fn pay_for_unknown_order_is_not_found() {
        let response = get(state_with(vec![]), "/payfast/pay?order_id=3").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn pay_for_paid_order_is_conflict() {
        let mut paid = order(4);
        paid.payment_status = PaymentStatus::Paid;

        let response = get(state_with(vec![paid]), "/payfast/pay?order_id=4").await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn pay_retry_too_soon_is_conflict() {
        let response = get(state_with(vec![order(5)]), "/payfast/pay?order_id=5&retry=true").await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn pay_with_non_positive_order_id_is_bad_request() {
        let response = get(state_with(vec![]), "/payfast/pay?order_id=0").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn success_redirects_to_checkout_completed() {
        let response = get(state_with(vec![]), "/payfast/success?order_id=42").await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "https://shop.test/checkout/completed/42");
    }

    #[tokio::test]
    async fn cancel_redirects_to_order_details() {
        let response = get(state_with(vec![]), "/payfast/cancel?order_id=42").await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "https://shop.test/orderdetails/42");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Gateway Endpoint
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unsigned_notification_is_acknowledged() {
        let response = payfast_router()
            .with_state(state_with(vec![order(6)]))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/payfast/notify")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .header(header::REFERER, "https://www.payfast.co.za/eng/process")
                    .body(Body::from("payment_status=COMPLETE&amount_gross=250.00"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn notify_rejects_get() {
        let response = get(state_with(vec![]), "/payfast/notify").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
