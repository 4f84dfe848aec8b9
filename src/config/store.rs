//! Store front configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Store the gateway serves
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Public store URL, used for callback URLs and buyer redirects
    pub base_url: String,

    /// Settings scope for per-store merchant overrides
    pub store_id: Option<String>,
}

impl StoreConfig {
    /// Buyer landing page after a completed checkout.
    pub fn completed_url(&self, order_id: i64) -> String {
        format!("{}checkout/completed/{}", self.base_url, order_id)
    }

    /// Order details page shown after a cancelled checkout.
    pub fn order_details_url(&self, order_id: i64) -> String {
        format!("{}orderdetails/{}", self.base_url, order_id)
    }

    /// Validate store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("STORE__BASE_URL"));
        }
        let scheme_ok =
            self.base_url.starts_with("http://") || self.base_url.starts_with("https://");
        if !scheme_ok || !self.base_url.ends_with('/') {
            return Err(ValidationError::InvalidStoreBaseUrl);
        }
        Ok(())
    }
}
