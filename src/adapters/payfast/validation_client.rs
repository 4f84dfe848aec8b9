//! PayFast notification validation client.
//!
//! Posts the notification fields back to the gateway's `/eng/query/validate`
//! endpoint. The gateway answers with a plain-text `VALID` or `INVALID`.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::payfast::{GatewaySettings, RevalidationError};
use crate::ports::PaymentValidator;

/// Literal body the gateway returns for a genuine notification.
const VALID_RESPONSE: &str = "VALID";

/// Longest response excerpt kept in a `NotValid` error.
const MAX_BODY_EXCERPT: usize = 200;

/// reqwest-backed [`PaymentValidator`].
#[derive(Debug, Clone)]
pub struct PayFastValidationClient {
    client: Client,
    timeout: Duration,
    base_url: Option<String>,
}

impl PayFastValidationClient {
    /// Creates a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
            base_url: None,
        }
    }

    /// Overrides the gateway host (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    fn validate_url(&self, settings: &GatewaySettings) -> String {
        match &self.base_url {
            Some(base) => format!("{}/eng/query/validate", base),
            None => settings.validate_url(),
        }
    }
}

#[async_trait]
impl PaymentValidator for PayFastValidationClient {
    async fn validate(
        &self,
        settings: &GatewaySettings,
        body: &str,
    ) -> Result<(), RevalidationError> {
        let response = self
            .client
            .post(self.validate_url(settings))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .timeout(self.timeout)
            .body(body.to_string())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RevalidationError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await.map_err(map_transport_error)?;
        let verdict = text.trim();
        if verdict == VALID_RESPONSE {
            Ok(())
        } else {
            Err(RevalidationError::NotValid(
                verdict.chars().take(MAX_BODY_EXCERPT).collect(),
            ))
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> RevalidationError {
    if e.is_timeout() {
        RevalidationError::Timeout
    } else if e.is_connect() {
        RevalidationError::Network(format!("Connection failed: {}", e))
    } else {
        RevalidationError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings() -> GatewaySettings {
        GatewaySettings::new(true, "10000100", "46f0cd694581a", None)
    }

    fn client_for(server: &MockServer) -> PayFastValidationClient {
        PayFastValidationClient::new(Duration::from_secs(2)).with_base_url(server.uri())
    }

    #[test]
    fn default_url_follows_sandbox_flag() {
        let client = PayFastValidationClient::new(Duration::from_secs(1));
        assert_eq!(
            client.validate_url(&settings()),
            "https://sandbox.payfast.co.za/eng/query/validate"
        );
    }

    #[tokio::test]
    async fn valid_response_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/eng/query/validate"))
            .and(header("Content-Type", "application/x-www-form-urlencoded"))
            .and(body_string("pf_payment_id=PF123&item_name=Blue+Mug"))
            .respond_with(ResponseTemplate::new(200).set_body_string("VALID"))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .validate(&settings(), "pf_payment_id=PF123&item_name=Blue+Mug")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn trailing_whitespace_is_tolerated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("VALID\r\n"))
            .mount(&server)
            .await;

        let result = client_for(&server).validate(&settings(), "a=1").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn invalid_response_is_not_valid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("INVALID"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .validate(&settings(), "a=1")
            .await
            .unwrap_err();

        assert!(matches!(err, RevalidationError::NotValid(ref body) if body == "INVALID"));
    }

    #[tokio::test]
    async fn server_error_is_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .validate(&settings(), "a=1")
            .await
            .unwrap_err();

        assert!(matches!(err, RevalidationError::HttpStatus(503)));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("VALID")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client =
            PayFastValidationClient::new(Duration::from_millis(50)).with_base_url(server.uri());
        let err = client.validate(&settings(), "a=1").await.unwrap_err();

        assert!(matches!(err, RevalidationError::Timeout));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        // Port 9 (discard) is not listening on loopback
        let client = PayFastValidationClient::new(Duration::from_secs(2))
            .with_base_url("http://127.0.0.1:9");
        let err = client.validate(&settings(), "a=1").await.unwrap_err();

        assert!(matches!(err, RevalidationError::Network(_)));
    }
}
