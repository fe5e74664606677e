//! Application configuration module
//!
//! Environment-driven settings plus the shop's constants (roles, limits,
//! response messages).

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
