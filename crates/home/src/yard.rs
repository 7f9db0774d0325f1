//! Yard - The single place outside the house

use crate::fixture::Light;
use rbac::Permission;
use shared::{validate, Identifier, Result};
use std::collections::BTreeMap;

/// Location id that always denotes the yard
pub const YARD_LOCATION: &str = "yard";

/// The exterior, with its own occupants and one light.
///
/// A session builds exactly one yard up front and hands it from house to
/// house when layouts are replaced.
#[derive(Debug, Clone, Default)]
pub struct Yard {
    occupants: BTreeMap<Identifier, Permission>,
    light: Light,
}

impl Yard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_person(&mut self, name: &str, permission: Permission) -> Result<()> {
        let name = validate(name)?;
        self.insert_occupant(name, permission);
        Ok(())
    }

    pub(crate) fn insert_occupant(&mut self, name: Identifier, permission: Permission) {
        self.occupants.insert(name, permission);
    }

    pub fn remove_person(&mut self, name: &str) -> bool {
        self.occupants.remove(name).is_some()
    }

    pub fn has_occupant(&self, name: &str) -> bool {
        self.occupants.contains_key(name)
    }

    pub fn occupant_permission(&self, name: &str) -> Option<&Permission> {
        self.occupants.get(name)
    }

    pub fn occupants(&self) -> Vec<&str> {
        self.occupants.keys().map(|n| n.as_str()).collect()
    }

    pub(crate) fn occupant_names(&self) -> impl Iterator<Item = &Identifier> {
        self.occupants.keys()
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn light_mut(&mut self) -> &mut Light {
        &mut self.light
    }
}
