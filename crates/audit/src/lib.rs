//! # Smart Home Audit
//!
//! Bounded audit trail of attempted actions, actor switches and policy edits.

mod audit_logger;

pub use audit_logger::{AuditEntry, AuditEventType, AuditLogger, AuditStats};
