//! # Smart Home Shared
//!
//! Common types used across all smart home crates.

pub mod error;
pub mod identifier;
pub mod config;

// Re-exports
pub use error::*;
pub use identifier::*;
pub use config::*;
