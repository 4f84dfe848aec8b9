//! Resolved PayFast merchant settings for one store scope.

use secrecy::{ExposeSecret, SecretString};

const LIVE_HOST: &str = "www.payfast.co.za";
const SANDBOX_HOST: &str = "sandbox.payfast.co.za";

const PROCESS_PATH: &str = "/eng/process";
const VALIDATE_PATH: &str = "/eng/query/validate";

/// Merchant credentials and environment selection.
///
/// Loaded once per request from the settings provider and never mutated.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub sandbox: bool,
    pub merchant_id: String,
    pub merchant_key: SecretString,
    pub passphrase: Option<SecretString>,
}

impl GatewaySettings {
    /// An empty passphrase is treated as none so it never reaches the signer.
    pub fn new(
        sandbox: bool,
        merchant_id: impl Into<String>,
        merchant_key: impl Into<String>,
        passphrase: Option<String>,
    ) -> Self {
        Self {
            sandbox,
            merchant_id: merchant_id.into(),
            merchant_key: SecretString::new(merchant_key.into()),
            passphrase: passphrase
                .filter(|p| !p.is_empty())
                .map(SecretString::new),
        }
    }

    fn host(&self) -> &'static str {
        if self.sandbox {
            SANDBOX_HOST
        } else {
            LIVE_HOST
        }
    }

    /// Hosted payment page the buyer is redirected to.
    pub fn process_url(&self) -> String {
        format!("https://{}{}", self.host(), PROCESS_PATH)
    }

    /// Server-to-server notification validation endpoint.
    pub fn validate_url(&self) -> String {
        format!("https://{}{}", self.host(), VALIDATE_PATH)
    }

    pub fn merchant_key(&self) -> &str {
        self.merchant_key.expose_secret()
    }

    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_ref().map(|p| p.expose_secret().as_str())
    }
}
