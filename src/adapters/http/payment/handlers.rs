//! HTTP handlers for the PayFast endpoints.
//!
//! These handlers connect Axum routes to the payment command handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::payment::{
    HandlePaymentNotificationCommand, HandlePaymentNotificationHandler, PostProcessPaymentCommand,
    PostProcessPaymentHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode, OrderId};
use crate::domain::payfast::{NotificationError, NotificationOutcome};
use crate::ports::{
    GatewaySettingsProvider, OrderLock, OrderRepository, PaymentMethod, PaymentValidator,
};

use super::dto::{ErrorResponse, OrderQuery, PayQuery};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the PayFast endpoints.
#[derive(Clone)]
pub struct PaymentAppState {
    pub order_repository: Arc<dyn OrderRepository>,
    pub order_lock: Arc<dyn OrderLock>,
    pub payment_validator: Arc<dyn PaymentValidator>,
    pub settings_provider: Arc<dyn GatewaySettingsProvider>,
    pub payment_method: Arc<dyn PaymentMethod>,
    /// Public store URL ending in `/`.
    pub store_base_url: String,
    /// Settings scope for per-store merchant overrides.
    pub store_scope: Option<String>,
}

impl PaymentAppState {
    pub fn post_process_payment_handler(&self) -> PostProcessPaymentHandler {
        PostProcessPaymentHandler::new(self.order_repository.clone(), self.payment_method.clone())
    }

    pub fn notification_handler(&self) -> HandlePaymentNotificationHandler {
        HandlePaymentNotificationHandler::new(
            self.settings_provider.clone(),
            self.order_repository.clone(),
            self.order_lock.clone(),
            self.payment_validator.clone(),
        )
    }
}

/// `302 Found` to `location`.
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

// ════════════════════════════════════════════════════════════════════════════════
// Buyer Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /payfast/pay - Send the buyer to the PayFast hosted page
pub async fn pay(
    State(state): State<PaymentAppState>,
    Query(query): Query<PayQuery>,
) -> Result<Response, PaymentApiError> {
    let handler = state.post_process_payment_handler();
    let cmd = PostProcessPaymentCommand {
        order_id: OrderId::new(query.order_id)?,
        is_retry: query.retry,
    };

    let redirect = handler.handle(cmd).await?;

    Ok(found(redirect.url))
}

/// GET /payfast/success - Buyer returns after paying
pub async fn success(
    State(state): State<PaymentAppState>,
    Query(query): Query<OrderQuery>,
) -> Result<Response, PaymentApiError> {
    let order_id = OrderId::new(query.order_id)?;
    Ok(found(format!(
        "{}checkout/completed/{}",
        state.store_base_url, order_id
    )))
}

/// GET /payfast/cancel - Buyer abandons the hosted page
pub async fn cancel(
    State(state): State<PaymentAppState>,
    Query(query): Query<OrderQuery>,
) -> Result<Response, PaymentApiError> {
    let order_id = OrderId::new(query.order_id)?;
    Ok(found(format!("{}orderdetails/{}", state.store_base_url, order_id)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Gateway Endpoint
// ════════════════════════════════════════════════════════════════════════════════

/// POST /payfast/notify - PayFast instant transaction notification
///
/// Answers `200 OK` for every notification that reached a terminal outcome,
/// including rejected ones, so the gateway stops redelivering.
pub async fn notify(
    State(state): State<PaymentAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, NotificationApiError> {
    let referer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let handler = state.notification_handler();
    let cmd = HandlePaymentNotificationCommand {
        body: body.to_vec(),
        referer,
        store_scope: state.store_scope.clone(),
    };

    let outcome = handler.handle(cmd).await?;

    if let NotificationOutcome::Rejected(reason) = &outcome {
        tracing::debug!(reason = %reason, "PayFast notification acknowledged without changes");
    }

    Ok(StatusCode::OK)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct PaymentApiError(DomainError);

impl From<DomainError> for PaymentApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::ValidationError> for PaymentApiError {
    fn from(err: crate::domain::foundation::ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> Response {
        let status = match self.0.code {
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::OrderNotFound => StatusCode::NOT_FOUND,
            ErrorCode::InvalidStateTransition
            | ErrorCode::AuthorizationConflict
            | ErrorCode::ConcurrentModification => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::LockUnavailable | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "PayFast request failed");
        }

        let body = ErrorResponse::new(self.0.code.to_string(), self.0.message);
        (status, Json(body)).into_response()
    }
}

/// Notification failure answered with a non-2xx status so PayFast redelivers.
#[derive(Debug)]
pub struct NotificationApiError(NotificationError);

impl From<NotificationError> for NotificationApiError {
    fn from(err: NotificationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for NotificationApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let error_code = match &self.0 {
            NotificationError::Revalidation(_) => "REVALIDATION_FAILED",
            NotificationError::Store(_) => "ORDER_STORE_ERROR",
            NotificationError::Lock(_) => "LOCK_UNAVAILABLE",
            NotificationError::Settings(_) => "SETTINGS_UNAVAILABLE",
        };

        if !matches!(self.0, NotificationError::Revalidation(_)) {
            tracing::error!(error = %self.0, retryable = self.0.is_retryable(), "PayFast notification failed");
        }

        let body = ErrorResponse::new(error_code, self.0.to_string());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: DomainError) -> StatusCode {
        PaymentApiError::from(err).into_response().status()
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        assert_eq!(
            status_of(DomainError::new(ErrorCode::OrderNotFound, "missing")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::new(ErrorCode::InvalidStateTransition, "paid")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::validation("order_id", "must be positive")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::new(ErrorCode::DatabaseError, "down")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn notification_errors_keep_gateway_statuses() {
        use crate::domain::payfast::RevalidationError;

        let revalidation = NotificationApiError::from(NotificationError::from(
            RevalidationError::Timeout,
        ));
        assert_eq!(revalidation.into_response().status(), StatusCode::BAD_REQUEST);

        let lock = NotificationApiError::from(NotificationError::Lock(DomainError::new(
            ErrorCode::LockUnavailable,
            "busy",
        )));
        assert_eq!(lock.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
