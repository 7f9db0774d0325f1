//! House - Room topology graph, occupant directory and tours
//!
//! Rooms are nodes keyed by location id. Edges are symmetric, a room has at
//! most [`MAX_CONNECTIONS`] neighbours, and two rooms that already share a
//! neighbour are never connected directly (no 3-cycles). Every mutation
//! checks all of its preconditions before touching the graph.

use crate::room::{Room, RoomSummary};
use crate::yard::{Yard, YARD_LOCATION};
use rbac::Permission;
use serde::Serialize;
use shared::{validate, HomeError, Identifier, LayoutSpec, Result};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Maximum number of rooms adjacent to any one room
pub const MAX_CONNECTIONS: usize = 4;

/// Where a person currently is
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    Room(Identifier),
    Yard,
}

impl Location {
    pub fn as_str(&self) -> &str {
        match self {
            Location::Room(id) => id.as_str(),
            Location::Yard => YARD_LOCATION,
        }
    }

    pub fn is_yard(&self) -> bool {
        matches!(self, Location::Yard)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The house: rooms, their connections and who is where
#[derive(Debug, Default)]
pub struct House {
    rooms: BTreeMap<Identifier, Room>,
    /// location → adjacent locations. Ordered so tours are deterministic.
    adjacency: BTreeMap<Identifier, BTreeSet<Identifier>>,
    root: Option<Identifier>,
    directory: BTreeMap<Identifier, Location>,
    yard: Yard,
}

impl House {
    /// Create an empty house with a fresh yard
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty house around an existing yard, keeping its occupants
    pub fn with_yard(yard: Yard) -> Self {
        let directory = yard
            .occupant_names()
            .map(|name| (name.clone(), Location::Yard))
            .collect();

        Self {
            directory,
            yard,
            ..Default::default()
        }
    }

    /// Build a house from a layout with a fresh yard
    pub fn from_layout(layout: &LayoutSpec) -> Result<Self> {
        Self::from_layout_with_yard(layout, Yard::new())
    }

    /// Build a house from a layout: rooms in order, then connections, then root
    pub fn from_layout_with_yard(layout: &LayoutSpec, yard: Yard) -> Result<Self> {
        let mut house = Self::with_yard(yard);

        for spec in &layout.rooms {
            house.add_room(Room::from_spec(spec), &spec.id)?;
        }
        for [a, b] in &layout.connections {
            house.add_connection(a, b)?;
        }
        if let Some(root) = &layout.root {
            house.set_root(root)?;
        }

        info!(
            rooms = house.rooms.len(),
            connections = house.connection_count(),
            root = house.root().unwrap_or("-"),
            "layout loaded"
        );
        Ok(house)
    }

    // ========== Topology ==========

    /// Insert a room at an empty location.
    ///
    /// Returns `Ok(false)` without changing anything if the location is taken.
    /// The yard location is reserved and rejected with `ReservedLocation`.
    pub fn add_room(&mut self, room: Room, location: &str) -> Result<bool> {
        let location = validate(location)?;

        if location.as_str() == YARD_LOCATION {
            return Err(HomeError::ReservedLocation(location.to_string()));
        }
        if self.rooms.contains_key(&location) {
            debug!(location = %location, "location already occupied, room not added");
            return Ok(false);
        }

        self.adjacency.insert(location.clone(), BTreeSet::new());
        self.rooms.insert(location, room);
        Ok(true)
    }

    /// Connect two rooms symmetrically.
    ///
    /// The degree and triangle checks apply even when the rooms are already
    /// connected. Past them, re-adding an existing edge adds nothing.
    pub fn add_connection(&mut self, a: &str, b: &str) -> Result<()> {
        let a = self.validate_location(a)?;
        let b = self.validate_location(b)?;

        if a == b {
            return Err(HomeError::SelfConnection(a.to_string()));
        }

        let adj_a = self.neighbours(&a);
        let adj_b = self.neighbours(&b);

        for (location, adjacent) in [(&a, adj_a), (&b, adj_b)] {
            if adjacent.len() >= MAX_CONNECTIONS {
                return Err(HomeError::ConnectionLimitExceeded {
                    location: location.to_string(),
                    limit: MAX_CONNECTIONS,
                });
            }
        }

        if let Some(via) = adj_a.intersection(adj_b).next() {
            return Err(HomeError::TriangleConnection {
                a: a.to_string(),
                b: b.to_string(),
                via: via.to_string(),
            });
        }

        if adj_a.contains(&b) {
            debug!(a = %a, b = %b, "rooms already connected");
            return Ok(());
        }

        self.adjacency.entry(a.clone()).or_default().insert(b.clone());
        self.adjacency.entry(b.clone()).or_default().insert(a.clone());
        debug!(a = %a, b = %b, "rooms connected");
        Ok(())
    }

    fn neighbours(&self, location: &Identifier) -> &BTreeSet<Identifier> {
        static EMPTY: BTreeSet<Identifier> = BTreeSet::new();
        self.adjacency.get(location).unwrap_or(&EMPTY)
    }

    /// Check that a location names a room and return its key
    pub fn validate_location(&self, location: &str) -> Result<Identifier> {
        self.rooms
            .get_key_value(location)
            .map(|(key, _)| key.clone())
            .ok_or_else(|| HomeError::NoSuchLocation(location.to_string()))
    }

    /// Locations adjacent to a room, sorted. `None` if the room does not exist.
    pub fn adjacents(&self, location: &str) -> Option<Vec<&str>> {
        self.adjacency
            .get(location)
            .map(|set| set.iter().map(|id| id.as_str()).collect())
    }

    pub fn are_connected(&self, a: &str, b: &str) -> bool {
        self.adjacency
            .get(a)
            .map(|set| set.contains(b))
            .unwrap_or(false)
    }

    /// Number of undirected edges
    pub fn connection_count(&self) -> usize {
        self.adjacency.values().map(|set| set.len()).sum::<usize>() / 2
    }

    pub fn set_root(&mut self, location: &str) -> Result<()> {
        let location = self.validate_location(location)?;
        self.root = Some(location);
        Ok(())
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_ref().map(|r| r.as_str())
    }

    // ========== Rooms ==========

    /// Room locations, sorted
    pub fn get_locations(&self) -> Vec<&str> {
        self.rooms.keys().map(|id| id.as_str()).collect()
    }

    pub fn get_room(&self, location: &str) -> Option<&Room> {
        self.rooms.get(location)
    }

    pub fn get_room_mut(&mut self, location: &str) -> Option<&mut Room> {
        self.rooms.get_mut(location)
    }

    pub fn rooms(&self) -> impl Iterator<Item = (&str, &Room)> {
        self.rooms.iter().map(|(id, room)| (id.as_str(), room))
    }

    pub(crate) fn rooms_mut(&mut self) -> impl Iterator<Item = (&Identifier, &mut Room)> {
        self.rooms.iter_mut()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn yard(&self) -> &Yard {
        &self.yard
    }

    pub fn yard_mut(&mut self) -> &mut Yard {
        &mut self.yard
    }

    // ========== Occupants ==========

    /// Place a person at a room or at the yard, moving them if they were elsewhere
    pub fn add_person(&mut self, name: &str, permission: Permission, location: &str) -> Result<()> {
        let name = validate(name)?;
        let target = if location == YARD_LOCATION {
            Location::Yard
        } else {
            Location::Room(self.validate_location(location)?)
        };

        if let Some(previous) = self.directory.remove(&name) {
            self.remove_from(&previous, name.as_str());
        }

        match &target {
            Location::Yard => self.yard.insert_occupant(name.clone(), permission),
            Location::Room(id) => {
                if let Some(room) = self.rooms.get_mut(id) {
                    room.insert_occupant(name.clone(), permission);
                }
            }
        }

        info!(person = %name, location = %target, "person placed");
        self.directory.insert(name, target);
        Ok(())
    }

    /// Remove a person from wherever they are. Returns false if unknown.
    pub fn remove_person(&mut self, name: &str) -> bool {
        match self.directory.remove(name) {
            Some(previous) => {
                self.remove_from(&previous, name);
                info!(person = name, location = %previous, "person removed");
                true
            }
            None => false,
        }
    }

    fn remove_from(&mut self, location: &Location, name: &str) {
        match location {
            Location::Yard => {
                self.yard.remove_person(name);
            }
            Location::Room(id) => {
                if let Some(room) = self.rooms.get_mut(id) {
                    room.remove_person(name);
                }
            }
        }
    }

    /// Current location id of a person (a room id or `"yard"`)
    pub fn location_of(&self, name: &str) -> Option<&str> {
        self.directory.get(name).map(|loc| loc.as_str())
    }

    pub fn location(&self, name: &str) -> Option<&Location> {
        self.directory.get(name)
    }

    /// Permission a person holds where they currently are
    pub fn permission_of(&self, name: &str) -> Option<&Permission> {
        match self.directory.get(name)? {
            Location::Yard => self.yard.occupant_permission(name),
            Location::Room(id) => self.rooms.get(id)?.occupant_permission(name),
        }
    }

    // ========== Tours ==========

    /// Depth-first walk from the root with an explicit stack.
    ///
    /// Only the root's connected component is visited, each room once.
    /// Neighbours are visited in ascending location order.
    pub fn tour<F>(&self, mut visitor: F) -> Result<()>
    where
        F: FnMut(&str, &Room),
    {
        let root = self.root.as_ref().ok_or(HomeError::RootNotSet)?;

        let mut visited: BTreeSet<&Identifier> = BTreeSet::new();
        let mut stack: Vec<&Identifier> = vec![root];

        while let Some(location) = stack.pop() {
            if !visited.insert(location) {
                continue;
            }
            if let Some(room) = self.rooms.get(location) {
                visitor(location.as_str(), room);
            }
            for next in self.neighbours(location).iter().rev() {
                if !visited.contains(next) {
                    stack.push(next);
                }
            }
        }

        Ok(())
    }

    /// Locations in tour order
    pub fn tour_order(&self) -> Result<Vec<String>> {
        let mut order = Vec::with_capacity(self.rooms.len());
        self.tour(|location, _| order.push(location.to_string()))?;
        Ok(order)
    }

    /// Project the current state by touring from the root
    pub fn snapshot(&self) -> Result<HouseSnapshot> {
        let mut rooms = Vec::with_capacity(self.rooms.len());
        self.tour(|location, room| rooms.push(room.summary(location)))?;

        let unreachable = self
            .rooms
            .keys()
            .filter(|id| !rooms.iter().any(|r| r.location == id.as_str()))
            .map(|id| id.to_string())
            .collect();

        Ok(HouseSnapshot {
            root: self.root().map(String::from),
            rooms,
            unreachable,
            yard_occupants: self.yard.occupants().into_iter().map(String::from).collect(),
            yard_light_on: self.yard.light().is_on(),
            number_of_people: self.number_of_people(),
        })
    }

    // ========== Whole-house Operations ==========

    /// Close and lock every door and close every window in every room.
    ///
    /// Fails without changing anything if any window is obstructed.
    pub fn close_openables(&mut self) -> Result<()> {
        if self.has_obstructed_window() {
            return Err(HomeError::ObstructedWindowPresent);
        }
        for (_, room) in self.rooms_mut() {
            room.secure_openables();
        }
        info!(rooms = self.rooms.len(), "all openables closed");
        Ok(())
    }

    pub fn has_obstructed_window(&self) -> bool {
        self.rooms.values().any(|room| room.has_obstructed_window())
    }

    /// True if any room's temperature is more than `threshold` degrees away
    /// from the mean room temperature
    pub fn has_temperature_aberration(&self, threshold: f64) -> bool {
        if self.rooms.is_empty() {
            return false;
        }
        let mean = self.rooms.values().map(|r| r.temperature()).sum::<f64>() / self.rooms.len() as f64;
        self.rooms
            .values()
            .any(|room| (room.temperature() - mean).abs() > threshold)
    }

    /// True if the yard or any room has someone in it
    pub fn is_occupied(&self) -> bool {
        !self.yard.is_empty() || self.rooms.values().any(|room| !room.is_empty())
    }

    pub fn number_of_people(&self) -> usize {
        self.yard.occupant_count() + self.rooms.values().map(|r| r.occupant_count()).sum::<usize>()
    }
}

/// State projection produced by a tour
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseSnapshot {
    pub root: Option<String>,
    /// Rooms in tour order
    pub rooms: Vec<RoomSummary>,
    /// Rooms outside the root's connected component
    pub unreachable: Vec<String>,
    pub yard_occupants: Vec<String>,
    pub yard_light_on: bool,
    pub number_of_people: usize,
}
