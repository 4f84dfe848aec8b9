//! PayFast adapters.
//!
//! - `PayFastValidationClient` - server-to-server notification revalidation
//! - `PayFastPaymentMethod` - store-facing redirect payment method
//! - `ConfiguredSettingsProvider` / `StaticSettingsProvider` - merchant settings

mod payment_method;
mod settings_provider;
mod validation_client;

pub use payment_method::{PayFastPaymentMethod, SYSTEM_NAME};
pub use settings_provider::{ConfiguredSettingsProvider, StaticSettingsProvider};
pub use validation_client::PayFastValidationClient;
