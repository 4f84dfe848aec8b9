//! PayFast Gateway - Redirect payment integration for an online store.
//!
//! Builds signed redirects to the PayFast hosted payment page and settles
//! orders from the gateway's server-to-server payment notifications.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
