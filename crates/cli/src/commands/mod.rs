//! CLI Commands

pub mod layout;
pub mod policy;

pub use layout::LayoutCommand;
pub use policy::{resolve_permission, PolicyCommand};
