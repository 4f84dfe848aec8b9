//! Gateway settings providers.

use async_trait::async_trait;

use crate::config::PayFastConfig;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::payfast::GatewaySettings;
use crate::ports::GatewaySettingsProvider;

/// Resolves merchant settings from [`PayFastConfig`], honoring store overrides.
#[derive(Debug, Clone)]
pub struct ConfiguredSettingsProvider {
    config: PayFastConfig,
}

impl ConfiguredSettingsProvider {
    pub fn new(config: PayFastConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl GatewaySettingsProvider for ConfiguredSettingsProvider {
    async fn load(&self, store_scope: Option<&str>) -> Result<GatewaySettings, DomainError> {
        let settings = self.config.resolve(store_scope);

        if settings.merchant_id.is_empty() {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                "PayFast merchant id is not configured",
            )
            .with_detail("store", store_scope.unwrap_or("default")));
        }

        if let Some(store) = store_scope {
            tracing::trace!(
                store,
                overrides = ?self.config.overridden_fields(store),
                "Resolved PayFast settings"
            );
        }

        Ok(settings)
    }
}

/// Serves one fixed set of settings for every scope.
#[derive(Debug, Clone)]
pub struct StaticSettingsProvider {
    settings: GatewaySettings,
}

impl StaticSettingsProvider {
    pub fn new(settings: GatewaySettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl GatewaySettingsProvider for StaticSettingsProvider {
    async fn load(&self, _store_scope: Option<&str>) -> Result<GatewaySettings, DomainError> {
        Ok(self.settings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreOverrides;
    use secrecy::SecretString;

    fn config() -> PayFastConfig {
        let mut config = PayFastConfig {
            merchant_id: "10000100".to_string(),
            merchant_key: Some(SecretString::new("46f0cd694581a".to_string())),
            ..Default::default()
        };
        config.stores.insert(
            "outlet".to_string(),
            StoreOverrides {
                sandbox: Some(false),
                ..Default::default()
            },
        );
        config
    }

    #[tokio::test]
    async fn configured_provider_applies_store_scope() {
        let provider = ConfiguredSettingsProvider::new(config());

        let default = provider.load(None).await.unwrap();
        let outlet = provider.load(Some("outlet")).await.unwrap();

        assert!(default.sandbox);
        assert!(!outlet.sandbox);
        assert_eq!(outlet.merchant_id, "10000100");
    }

    #[tokio::test]
    async fn missing_merchant_id_fails() {
        let provider = ConfiguredSettingsProvider::new(PayFastConfig::default());

        let err = provider.load(None).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn static_provider_ignores_scope() {
        let provider =
            StaticSettingsProvider::new(GatewaySettings::new(true, "m", "k", None));

        let settings = provider.load(Some("anything")).await.unwrap();

        assert_eq!(settings.merchant_id, "m");
    }
}
