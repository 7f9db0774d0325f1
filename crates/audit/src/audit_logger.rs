//! AuditLogger - Bounded trail of attempted actions

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub timestamp: String,
    pub event_type: AuditEventType,
    pub actor: String,
    pub action: Option<String>,
    pub target: Option<String>,
    pub success: bool,
    pub reason: Option<String>,
}

/// Types of audit events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    ActorSwitch,
    ActionApplied,
    ActionBlocked,
    ActionDenied,
    ActionFailed,
    PolicyChange,
}

impl AuditEventType {
    /// Whether events of this type count as successful
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            AuditEventType::ActorSwitch | AuditEventType::ActionApplied | AuditEventType::PolicyChange
        )
    }
}

/// Audit logger
#[derive(Debug)]
pub struct AuditLogger {
    entries: VecDeque<AuditEntry>,
    max_entries: usize,
}

impl AuditLogger {
    /// Create a new AuditLogger keeping at most `max_entries`
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries.min(1024)),
            max_entries,
        }
    }

    /// Log an audit entry, dropping the oldest when full
    pub fn log(&mut self, entry: AuditEntry) {
        if self.max_entries == 0 {
            return;
        }
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Log a change of the acting person
    pub fn log_actor_switch(&mut self, from_actor: &str, to_actor: &str) {
        self.log(AuditEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type: AuditEventType::ActorSwitch,
            actor: to_actor.to_string(),
            action: None,
            target: None,
            success: true,
            reason: Some(format!("Switched from '{}'", from_actor)),
        });
    }

    /// Log an attempted action and how it ended
    pub fn log_action(
        &mut self,
        actor: &str,
        action: &str,
        target: &str,
        event_type: AuditEventType,
        reason: Option<&str>,
    ) {
        self.log(AuditEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type,
            actor: actor.to_string(),
            action: Some(action.to_string()),
            target: Some(target.to_string()),
            success: event_type.is_success(),
            reason: reason.map(|s| s.to_string()),
        });
    }

    /// Log an allow/disallow edit to a permission level
    pub fn log_policy_change(&mut self, actor: &str, level: &str, action: &str, allowed: bool) {
        self.log(AuditEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type: AuditEventType::PolicyChange,
            actor: actor.to_string(),
            action: Some(action.to_string()),
            target: Some(level.to_string()),
            success: true,
            reason: Some(if allowed { "allowed" } else { "disallowed" }.to_string()),
        });
    }

    /// Get recent entries, newest first
    pub fn get_recent(&self, limit: usize) -> Vec<&AuditEntry> {
        self.entries.iter().rev().take(limit).collect()
    }

    /// Get recent refused entries (denied, blocked or failed), newest first
    pub fn get_recent_refusals(&self, limit: usize) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| !e.success)
            .take(limit)
            .collect()
    }

    /// Get statistics
    pub fn get_stats(&self) -> AuditStats {
        let count = |kind: AuditEventType| self.entries.iter().filter(|e| e.event_type == kind).count();

        AuditStats {
            total_entries: self.entries.len(),
            denial_count: count(AuditEventType::ActionDenied),
            blocked_count: count(AuditEventType::ActionBlocked),
            failure_count: count(AuditEventType::ActionFailed),
        }
    }

    /// Export as JSON
    pub fn export_json(&self) -> serde_json::Value {
        serde_json::to_value(self.entries.iter().collect::<Vec<_>>()).unwrap_or_default()
    }
}

/// Audit statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStats {
    pub total_entries: usize,
    pub denial_count: usize,
    pub blocked_count: usize,
    pub failure_count: usize,
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new(1000)
    }
}
