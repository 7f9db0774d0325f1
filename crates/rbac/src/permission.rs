//! Permission levels and the shared policy table
//!
//! A [`Permission`] is a handle naming a level. The allowed actions live in
//! one [`PolicyTable`] owned by the session, so `allow`/`disallow` on one
//! holder's level is seen by every holder of the same level. Mutation needs
//! `&mut PolicyTable`; callers sharing a table across threads wrap it in
//! their own lock.

use crate::action::Action;
use serde::{Deserialize, Serialize};
use shared::{validate, HomeError, Identifier, PermissionDeniedError, Result};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// The levels a person can hold
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PermissionLevel {
    Parent,
    Child,
    Guest,
    Stranger,
    Custom(Identifier),
}

impl PermissionLevel {
    /// The four built-in levels
    pub const FIXED: [PermissionLevel; 4] = [
        PermissionLevel::Parent,
        PermissionLevel::Child,
        PermissionLevel::Guest,
        PermissionLevel::Stranger,
    ];

    /// Display name (custom levels use their own name)
    pub fn name(&self) -> &str {
        match self {
            PermissionLevel::Parent => "Parent",
            PermissionLevel::Child => "Child",
            PermissionLevel::Guest => "Guest",
            PermissionLevel::Stranger => "Stranger",
            PermissionLevel::Custom(name) => name.as_str(),
        }
    }

    /// Parse a built-in level token. `Custom` needs a name and is resolved by the caller.
    pub fn from_fixed_token(token: &str) -> Result<Self> {
        match token {
            "Parent" => Ok(PermissionLevel::Parent),
            "Child" => Ok(PermissionLevel::Child),
            "Guest" => Ok(PermissionLevel::Guest),
            "Stranger" => Ok(PermissionLevel::Stranger),
            other => Err(HomeError::UnknownPermissionLevel(other.to_string())),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, PermissionLevel::Custom(_))
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Allowed action sets for every level known to a session
#[derive(Debug, Clone)]
pub struct PolicyTable {
    levels: HashMap<PermissionLevel, BTreeSet<Action>>,
}

impl PolicyTable {
    /// Create a table seeded with the default eligibility of the fixed levels
    pub fn new() -> Self {
        let levels = PermissionLevel::FIXED
            .iter()
            .map(|level| {
                let allowed = Action::all()
                    .iter()
                    .copied()
                    .filter(|a| a.eligible_by_default(level))
                    .collect();
                (level.clone(), allowed)
            })
            .collect();

        Self { levels }
    }

    /// Check whether a level allows an action. Unregistered levels allow nothing.
    pub fn is_allowed(&self, level: &PermissionLevel, action: Action) -> bool {
        self.levels
            .get(level)
            .map(|set| set.contains(&action))
            .unwrap_or(false)
    }

    /// Allowed actions for a level, in catalog order
    pub fn allowed_actions(&self, level: &PermissionLevel) -> Vec<Action> {
        self.levels
            .get(level)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Add an action to a level's shared set. Returns true if it was newly added.
    pub fn allow(&mut self, level: &PermissionLevel, action: Action) -> bool {
        let added = self.levels.entry(level.clone()).or_default().insert(action);
        if added {
            debug!(level = %level, action = action.token(), "action allowed");
        }
        added
    }

    /// Remove an action from a level's shared set. Returns true if it was present.
    pub fn disallow(&mut self, level: &PermissionLevel, action: Action) -> bool {
        let removed = self
            .levels
            .get_mut(level)
            .map(|set| set.remove(&action))
            .unwrap_or(false);
        if removed {
            debug!(level = %level, action = action.token(), "action disallowed");
        }
        removed
    }

    /// Build a custom level from persisted action tokens.
    ///
    /// Any unknown token fails the whole construction and nothing is
    /// registered. Registering an existing custom name replaces its set.
    pub fn register_custom<S: AsRef<str>>(
        &mut self,
        name: &str,
        action_names: &[S],
    ) -> Result<Permission> {
        let name = validate(name)?;
        let actions = action_names
            .iter()
            .map(|token| Action::from_token(token.as_ref()))
            .collect::<Result<BTreeSet<_>>>()?;

        Ok(self.register_custom_actions(name, actions))
    }

    pub(crate) fn register_custom_actions(
        &mut self,
        name: Identifier,
        actions: BTreeSet<Action>,
    ) -> Permission {
        let level = PermissionLevel::Custom(name);
        debug!(level = %level, count = actions.len(), "custom permission registered");
        self.levels.insert(level.clone(), actions);
        Permission::new(level)
    }

    /// Whether a level has an entry in this table
    pub fn has_level(&self, level: &PermissionLevel) -> bool {
        self.levels.contains_key(level)
    }

    /// Names of registered custom levels, sorted
    pub fn custom_levels(&self) -> Vec<&PermissionLevel> {
        let mut custom: Vec<_> = self.levels.keys().filter(|l| l.is_custom()).collect();
        custom.sort();
        custom
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a permission level held by a person
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    level: PermissionLevel,
}

impl Permission {
    pub fn new(level: PermissionLevel) -> Self {
        Self { level }
    }

    pub fn parent() -> Self {
        Self::new(PermissionLevel::Parent)
    }

    pub fn child() -> Self {
        Self::new(PermissionLevel::Child)
    }

    pub fn guest() -> Self {
        Self::new(PermissionLevel::Guest)
    }

    pub fn stranger() -> Self {
        Self::new(PermissionLevel::Stranger)
    }

    pub fn level(&self) -> &PermissionLevel {
        &self.level
    }

    /// Return the action if this level may perform it. Never mutates.
    pub fn authorize(
        &self,
        table: &PolicyTable,
        action: Action,
    ) -> std::result::Result<Action, PermissionDeniedError> {
        if table.is_allowed(&self.level, action) {
            Ok(action)
        } else {
            Err(PermissionDeniedError {
                action: action.token().to_string(),
                level: self.level.name().to_string(),
            })
        }
    }

    /// Allow an action for every holder of this level
    pub fn allow(&self, table: &mut PolicyTable, action: Action) -> bool {
        table.allow(&self.level, action)
    }

    /// Disallow an action for every holder of this level
    pub fn disallow(&self, table: &mut PolicyTable, action: Action) -> bool {
        table.disallow(&self.level, action)
    }

    pub fn allowed_actions(&self, table: &PolicyTable) -> Vec<Action> {
        table.allowed_actions(&self.level)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.level)
    }
}
