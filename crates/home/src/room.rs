//! Room - Fixtures per wall slot, lights and occupants

use crate::fixture::{Door, Light, WallSlot, Window};
use rbac::Permission;
use serde::Serialize;
use shared::{validate, Identifier, Result, RoomSpec};
use std::collections::BTreeMap;

/// Temperature a room starts at when the layout gives none
pub const DEFAULT_TEMPERATURE: f64 = 21.0;

/// A room owned by a house
#[derive(Debug, Clone)]
pub struct Room {
    doors: [Option<Door>; 4],
    windows: [Option<Window>; 4],
    lights: Vec<Light>,
    occupants: BTreeMap<Identifier, Permission>,
    temperature: f64,
    away_light: bool,
}

impl Room {
    /// Create a room with empty slots and no lights
    pub fn new() -> Self {
        Self {
            doors: [None; 4],
            windows: [None; 4],
            lights: Vec::new(),
            occupants: BTreeMap::new(),
            temperature: DEFAULT_TEMPERATURE,
            away_light: false,
        }
    }

    /// Build a room from a layout entry
    pub fn from_spec(spec: &RoomSpec) -> Self {
        Self {
            doors: spec.doors.map(|d| d.as_ref().map(Door::from_spec)),
            windows: spec.windows.map(|w| w.as_ref().map(Window::from_spec)),
            lights: spec.lights.iter().map(Light::from_spec).collect(),
            occupants: BTreeMap::new(),
            temperature: spec.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            away_light: false,
        }
    }

    /// Builder: place a door
    pub fn with_door(mut self, slot: WallSlot, door: Door) -> Self {
        self.doors[slot.index()] = Some(door);
        self
    }

    /// Builder: place a window
    pub fn with_window(mut self, slot: WallSlot, window: Window) -> Self {
        self.windows[slot.index()] = Some(window);
        self
    }

    /// Builder: add a light
    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    // ========== Fixtures ==========

    pub fn door(&self, slot: WallSlot) -> Option<&Door> {
        self.doors[slot.index()].as_ref()
    }

    pub fn door_mut(&mut self, slot: WallSlot) -> Option<&mut Door> {
        self.doors[slot.index()].as_mut()
    }

    pub fn window(&self, slot: WallSlot) -> Option<&Window> {
        self.windows[slot.index()].as_ref()
    }

    pub fn window_mut(&mut self, slot: WallSlot) -> Option<&mut Window> {
        self.windows[slot.index()].as_mut()
    }

    pub fn light(&self, index: usize) -> Option<&Light> {
        self.lights.get(index)
    }

    pub fn light_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_mut(index)
    }

    pub fn doors(&self) -> impl Iterator<Item = &Door> {
        self.doors.iter().flatten()
    }

    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.iter().flatten()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    // ========== Counts ==========

    pub fn open_doors(&self) -> usize {
        self.doors().filter(|d| d.is_open()).count()
    }

    pub fn locked_doors(&self) -> usize {
        self.doors().filter(|d| d.is_locked()).count()
    }

    pub fn lights_on(&self) -> usize {
        self.lights.iter().filter(|l| l.is_on()).count()
    }

    pub fn open_windows(&self) -> usize {
        self.windows().filter(|w| w.is_open()).count()
    }

    pub fn obstructed_windows(&self) -> usize {
        self.windows().filter(|w| w.is_obstructed()).count()
    }

    pub fn has_obstructed_window(&self) -> bool {
        self.windows().any(|w| w.is_obstructed())
    }

    /// Close and lock every door and close every window
    pub(crate) fn secure_openables(&mut self) {
        for door in self.doors.iter_mut().flatten() {
            door.secure();
        }
        for window in self.windows.iter_mut().flatten() {
            window.close();
        }
    }

    // ========== Occupants ==========

    /// Add a person, replacing any permission they held here
    pub fn add_person(&mut self, name: &str, permission: Permission) -> Result<()> {
        let name = validate(name)?;
        self.insert_occupant(name, permission);
        Ok(())
    }

    pub(crate) fn insert_occupant(&mut self, name: Identifier, permission: Permission) {
        self.occupants.insert(name, permission);
    }

    /// Remove a person. Returns false if they were not here.
    pub fn remove_person(&mut self, name: &str) -> bool {
        self.occupants.remove(name).is_some()
    }

    pub fn has_occupant(&self, name: &str) -> bool {
        self.occupants.contains_key(name)
    }

    pub fn occupant_permission(&self, name: &str) -> Option<&Permission> {
        self.occupants.get(name)
    }

    /// Occupant names, sorted
    pub fn occupants(&self) -> Vec<&str> {
        self.occupants.keys().map(|n| n.as_str()).collect()
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    // ========== Climate & Away Lights ==========

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn set_temperature(&mut self, degrees: f64) {
        self.temperature = degrees;
    }

    pub fn away_light(&self) -> bool {
        self.away_light
    }

    pub fn set_away_light(&mut self, away_light: bool) {
        self.away_light = away_light;
    }

    /// Serializable view of this room placed at `location`
    pub fn summary(&self, location: &str) -> RoomSummary {
        RoomSummary {
            location: location.to_string(),
            occupants: self.occupants().into_iter().map(String::from).collect(),
            open_doors: self.open_doors(),
            locked_doors: self.locked_doors(),
            open_windows: self.open_windows(),
            obstructed_windows: self.obstructed_windows(),
            lights_on: self.lights_on(),
            light_count: self.lights.len(),
            temperature: self.temperature,
            away_light: self.away_light,
        }
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time counts for one room
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub location: String,
    pub occupants: Vec<String>,
    pub open_doors: usize,
    pub locked_doors: usize,
    pub open_windows: usize,
    pub obstructed_windows: usize,
    pub lights_on: usize,
    pub light_count: usize,
    pub temperature: f64,
    pub away_light: bool,
}
