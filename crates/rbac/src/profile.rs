//! ProfileSet - Persisted person profiles resolved to permissions

use crate::action::Action;
use crate::permission::{Permission, PermissionLevel, PolicyTable};
use shared::{validate, Identifier, ProfileDocument, ProfileRecord, Result};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

const CUSTOM_TOKEN: &str = "Custom";

/// A record that passed validation but has not touched the policy table yet
enum StagedLevel {
    Fixed(PermissionLevel),
    Custom(BTreeSet<Action>),
}

/// Known people and the permission each one holds
#[derive(Debug, Default)]
pub struct ProfileSet {
    profiles: BTreeMap<Identifier, Permission>,
}

impl ProfileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a profile document against a policy table.
    ///
    /// Every record is validated before anything is registered, so a bad
    /// record leaves the table untouched. A custom record registers a custom
    /// level named after the person.
    pub fn from_document(document: &ProfileDocument, table: &mut PolicyTable) -> Result<Self> {
        let staged = document
            .profiles
            .iter()
            .map(Self::stage)
            .collect::<Result<Vec<_>>>()?;

        let mut profiles = BTreeMap::new();
        for (name, level) in staged {
            let permission = match level {
                StagedLevel::Fixed(level) => Permission::new(level),
                StagedLevel::Custom(actions) => table.register_custom_actions(name.clone(), actions),
            };
            profiles.insert(name, permission);
        }

        info!(count = profiles.len(), "profiles loaded");
        Ok(Self { profiles })
    }

    fn stage(record: &ProfileRecord) -> Result<(Identifier, StagedLevel)> {
        let name = validate(&record.name)?;
        let level = if record.level == CUSTOM_TOKEN {
            let actions = record
                .actions
                .iter()
                .map(|token| Action::from_token(token))
                .collect::<Result<BTreeSet<_>>>()?;
            StagedLevel::Custom(actions)
        } else {
            StagedLevel::Fixed(PermissionLevel::from_fixed_token(&record.level)?)
        };
        Ok((name, level))
    }

    /// Add or replace a profile
    pub fn insert(&mut self, name: Identifier, permission: Permission) {
        self.profiles.insert(name, permission);
    }

    pub fn get(&self, name: &str) -> Option<&Permission> {
        self.profiles.get(name)
    }

    /// Profile names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(|n| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &Permission)> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
