//! Gateway revalidation port.

use async_trait::async_trait;

use crate::domain::payfast::{GatewaySettings, RevalidationError};

/// Confirms a notification with the gateway's validation endpoint.
///
/// Implementations post `body` as `application/x-www-form-urlencoded` to
/// the endpoint selected by `settings` and succeed only when the gateway
/// answers with the literal `VALID`.
#[async_trait]
pub trait PaymentValidator: Send + Sync {
    async fn validate(
        &self,
        settings: &GatewaySettings,
        body: &str,
    ) -> Result<(), RevalidationError>;
}
