//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `order` - Order aggregate and its status machines
//! - `payfast` - Gateway signing, notification verification and reconciliation

pub mod foundation;
pub mod order;
pub mod payfast;
