//! Builds the signed redirect to the PayFast hosted payment page.

use url::form_urlencoded;

use crate::domain::order::Order;

use super::canonical::{ParameterSet, SpaceEncoding};
use super::settings::GatewaySettings;
use super::signature;

/// Name of the field carrying the order correlation token.
pub const CORRELATION_FIELD: &str = "custom_str1";

/// Name of the signature field.
pub const SIGNATURE_FIELD: &str = "signature";

/// A signed payment-initiation request ready to send to the buyer's browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRedirect {
    /// Signed fields in canonical order, without the signature.
    pub parameters: ParameterSet,
    pub signature: String,
    /// Full gateway URL including the query string.
    pub url: String,
}

/// Store URLs the gateway sends the buyer and the notification back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackUrls {
    pub return_url: String,
    pub cancel_url: String,
    pub notify_url: String,
}

impl CallbackUrls {
    /// Derives the callback URLs from the store base URL (ending in `/`).
    pub fn for_order(store_base_url: &str, order: &Order) -> Self {
        Self {
            return_url: format!("{}payfast/success?order_id={}", store_base_url, order.id),
            cancel_url: format!("{}payfast/cancel?order_id={}", store_base_url, order.id),
            notify_url: format!("{}payfast/notify", store_base_url),
        }
    }
}

/// Assembles and signs the outbound parameter set for an order.
///
/// Missing credentials are not checked here; the gateway rejects them.
pub fn build_payment_redirect(
    order: &Order,
    settings: &GatewaySettings,
    store_base_url: &str,
) -> PaymentRedirect {
    let callbacks = CallbackUrls::for_order(store_base_url, order);

    let mut parameters = ParameterSet::new();
    parameters.push("merchant_id", settings.merchant_id.as_str());
    parameters.push("merchant_key", settings.merchant_key());
    parameters.push("return_url", callbacks.return_url);
    parameters.push("cancel_url", callbacks.cancel_url);
    parameters.push("notify_url", callbacks.notify_url);
    parameters.push("amount", order.total.to_invariant_string());
    parameters.push("item_name", order.item_summary());
    parameters.push(CORRELATION_FIELD, order.order_guid.to_string());

    let canonical = parameters.canonical_string(SpaceEncoding::Plus);
    let signature = signature::sign(&canonical, settings.passphrase());

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(parameters.iter())
        .append_pair(SIGNATURE_FIELD, &signature)
        .finish();
    let url = format!("{}?{}", settings.process_url(), query);

    PaymentRedirect {
        parameters,
        signature,
        url,
    }
}
