//! Gateway settings provider port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::payfast::GatewaySettings;

/// Resolves merchant settings for a store scope.
///
/// `None` selects the default scope. A store without overrides falls back
/// to the default values field by field.
#[async_trait]
pub trait GatewaySettingsProvider: Send + Sync {
    async fn load(&self, store_scope: Option<&str>) -> Result<GatewaySettings, DomainError>;
}
