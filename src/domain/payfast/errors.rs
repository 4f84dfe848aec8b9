//! Error types for PayFast notification handling.
//!
//! Status codes drive the gateway's redelivery: it retries any non-2xx
//! response, so only failures worth retrying map to an error status.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Failure of the server-to-server validation round trip.
#[derive(Debug, Error)]
pub enum RevalidationError {
    /// Request could not be sent or the connection failed.
    #[error("Validation request failed: {0}")]
    Network(String),

    /// No response within the configured timeout.
    #[error("Validation request timed out")]
    Timeout,

    /// Validation endpoint answered with a non-success status.
    #[error("Validation endpoint returned HTTP {0}")]
    HttpStatus(u16),

    /// Validation endpoint answered but did not confirm the notification.
    #[error("Validation endpoint did not confirm notification: {0:?}")]
    NotValid(String),
}

/// Errors that abort notification processing with a non-2xx response.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The gateway could not confirm the notification.
    #[error("Revalidation failed: {0}")]
    Revalidation(#[from] RevalidationError),

    /// Order store failure, including a lost optimistic-lock race.
    #[error("Order store error: {0}")]
    Store(DomainError),

    /// Per-order lock could not be taken.
    #[error("Lock error: {0}")]
    Lock(DomainError),

    /// Merchant settings for the store scope could not be resolved.
    #[error("Settings error: {0}")]
    Settings(DomainError),
}

impl NotificationError {
    /// Returns true if redelivery of the notification may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NotificationError::Revalidation(_)
                | NotificationError::Store(_)
                | NotificationError::Lock(_)
                | NotificationError::Settings(_)
        )
    }

    /// Maps the error to the HTTP status returned to the gateway.
    ///
    /// - 400: revalidation failed, gateway redelivers later
    /// - 500: infrastructure failure
    pub fn status_code(&self) -> StatusCode {
        match self {
            NotificationError::Revalidation(_) => StatusCode::BAD_REQUEST,
            NotificationError::Store(_)
            | NotificationError::Lock(_)
            | NotificationError::Settings(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
