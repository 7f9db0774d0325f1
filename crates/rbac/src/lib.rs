//! # Smart Home RBAC
//!
//! Role-based access control over the closed action catalog.
//!
//! ## Components
//!
//! - `Action` - The closed catalog of operations
//! - `PolicyTable` / `Permission` - Shared per-level allowed sets
//! - `ProfileSet` - Persisted person profiles resolved to permissions
//! - `ModuleCatalog` - Fixture kinds grouped to their actions

pub mod action;
pub mod permission;
pub mod profile;
pub mod module_catalog;

pub use action::Action;
pub use permission::{Permission, PermissionLevel, PolicyTable};
pub use profile::ProfileSet;
pub use module_catalog::{MenuEntry, Module, ModuleCatalog};
