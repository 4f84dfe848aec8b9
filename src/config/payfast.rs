//! PayFast merchant configuration

use std::collections::HashMap;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::payfast::GatewaySettings;

/// Per-store overrides of the default merchant settings.
///
/// Every field is optional; an absent field falls back to the default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreOverrides {
    pub sandbox: Option<bool>,
    pub merchant_id: Option<String>,
    pub merchant_key: Option<SecretString>,
    pub passphrase: Option<SecretString>,
}

/// PayFast configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PayFastConfig {
    /// Use the sandbox environment
    #[serde(default = "default_sandbox")]
    pub sandbox: bool,

    /// Merchant identifier issued by PayFast
    #[serde(default)]
    pub merchant_id: String,

    /// Merchant key issued by PayFast
    pub merchant_key: Option<SecretString>,

    /// Salt passphrase appended to signed strings
    pub passphrase: Option<SecretString>,

    /// Timeout for the server-to-server validation call
    #[serde(default = "default_validation_timeout")]
    pub validation_timeout_secs: u64,

    /// Expiry of a held order lock
    #[serde(default = "default_lock_ttl")]
    pub lock_ttl_secs: u64,

    /// Overrides keyed by store id
    #[serde(default)]
    pub stores: HashMap<String, StoreOverrides>,
}

impl PayFastConfig {
    pub fn validation_timeout(&self) -> Duration {
        Duration::from_secs(self.validation_timeout_secs)
    }

    pub fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_secs)
    }

    /// Merchant settings for a store scope.
    ///
    /// Unknown stores and `None` resolve to the defaults.
    pub fn resolve(&self, store: Option<&str>) -> GatewaySettings {
        let overrides = store.and_then(|id| self.stores.get(id));

        let sandbox = overrides
            .and_then(|o| o.sandbox)
            .unwrap_or(self.sandbox);
        let merchant_id = overrides
            .and_then(|o| o.merchant_id.clone())
            .unwrap_or_else(|| self.merchant_id.clone());
        let merchant_key = overrides
            .and_then(|o| o.merchant_key.as_ref())
            .or(self.merchant_key.as_ref())
            .map(|k| k.expose_secret().clone())
            .unwrap_or_default();
        let passphrase = overrides
            .and_then(|o| o.passphrase.as_ref())
            .or(self.passphrase.as_ref())
            .map(|p| p.expose_secret().clone());

        GatewaySettings::new(sandbox, merchant_id, merchant_key, passphrase)
    }

    /// Names of the fields a store overrides.
    pub fn overridden_fields(&self, store: &str) -> Vec<&'static str> {
        let Some(overrides) = self.stores.get(store) else {
            return Vec::new();
        };

        let mut fields = Vec::new();
        if overrides.sandbox.is_some() {
            fields.push("sandbox");
        }
        if overrides.merchant_id.is_some() {
            fields.push("merchant_id");
        }
        if overrides.merchant_key.is_some() {
            fields.push("merchant_key");
        }
        if overrides.passphrase.is_some() {
            fields.push("passphrase");
        }
        fields
    }

    /// Validate PayFast configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.merchant_id.is_empty() {
            return Err(ValidationError::MissingRequired("PAYFAST__MERCHANT_ID"));
        }
        if self.merchant_key.is_none() {
            return Err(ValidationError::MissingRequired("PAYFAST__MERCHANT_KEY"));
        }
        if !(1..=60).contains(&self.validation_timeout_secs) {
            return Err(ValidationError::InvalidValidationTimeout);
        }
        if !(5..=300).contains(&self.lock_ttl_secs) {
            return Err(ValidationError::InvalidLockTtl);
        }
        Ok(())
    }
}

impl Default for PayFastConfig {
    fn default() -> Self {
        Self {
            sandbox: default_sandbox(),
            merchant_id: String::new(),
            merchant_key: None,
            passphrase: None,
            validation_timeout_secs: default_validation_timeout(),
            lock_ttl_secs: default_lock_ttl(),
            stores: HashMap::new(),
        }
    }
}

fn default_sandbox() -> bool {
    true
}

fn default_validation_timeout() -> u64 {
    10
}

fn default_lock_ttl() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> Option<SecretString> {
        Some(SecretString::new(value.to_string()))
    }

    fn configured() -> PayFastConfig {
        PayFastConfig {
            merchant_id: "10000100".to_string(),
            merchant_key: secret("46f0cd694581a"),
            passphrase: secret("jt7NOE43FZPn"),
            ..Default::default()
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Resolution
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn default_scope_uses_defaults() {
        let settings = configured().resolve(None);
        assert!(settings.sandbox);
        assert_eq!(settings.merchant_id, "10000100");
        assert_eq!(settings.merchant_key(), "46f0cd694581a");
        assert_eq!(settings.passphrase(), Some("jt7NOE43FZPn"));
    }

    #[test]
    fn unknown_store_falls_back_to_defaults() {
        let settings = configured().resolve(Some("outlet"));
        assert_eq!(settings.merchant_id, "10000100");
    }

    #[test]
    fn store_overrides_apply_field_by_field() {
        let mut config = configured();
        config.stores.insert(
            "outlet".to_string(),
            StoreOverrides {
                sandbox: Some(false),
                merchant_id: Some("20000200".to_string()),
                ..Default::default()
            },
        );

        let settings = config.resolve(Some("outlet"));
        assert!(!settings.sandbox);
        assert_eq!(settings.merchant_id, "20000200");
        assert_eq!(settings.merchant_key(), "46f0cd694581a");
        assert_eq!(settings.passphrase(), Some("jt7NOE43FZPn"));
    }

    #[test]
    fn empty_passphrase_override_is_no_passphrase() {
        let mut config = configured();
        config.stores.insert(
            "outlet".to_string(),
            StoreOverrides {
                passphrase: secret(""),
                ..Default::default()
            },
        );

        assert!(config.resolve(Some("outlet")).passphrase().is_none());
    }

    #[test]
    fn overridden_fields_lists_present_overrides() {
        let mut config = configured();
        config.stores.insert(
            "outlet".to_string(),
            StoreOverrides {
                merchant_key: secret("other"),
                passphrase: secret("salt"),
                ..Default::default()
            },
        );

        assert_eq!(
            config.overridden_fields("outlet"),
            vec!["merchant_key", "passphrase"]
        );
        assert!(config.overridden_fields("unknown").is_empty());
    }

    // ══════════════════════════════════════════════════════════════
    // Validation
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn validate_requires_merchant_credentials() {
        assert_eq!(
            PayFastConfig::default().validate(),
            Err(ValidationError::MissingRequired("PAYFAST__MERCHANT_ID"))
        );

        let config = PayFastConfig {
            merchant_id: "10000100".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("PAYFAST__MERCHANT_KEY"))
        );
    }

    #[test]
    fn validate_bounds_timeouts() {
        let config = PayFastConfig {
            validation_timeout_secs: 0,
            ..configured()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidValidationTimeout));

        let config = PayFastConfig {
            lock_ttl_secs: 600,
            ..configured()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidLockTtl));

        assert!(configured().validate().is_ok());
    }
}
