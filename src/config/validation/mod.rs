//! Configuration validation
//!
//! Field-level checks live on the models themselves; this module adds the
//! cross-section rules that need the whole [`GatewayConfig`](super::GatewayConfig).

mod config_validators;
mod trait_def;

pub use trait_def::Validate;
