//! Layout and profile documents handed to the simulation core
//!
//! These are plain serde models. The core consumes them already parsed;
//! the `from_file` helpers are for the loader side (CLI, tooling).

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Initial state of a door placed in a wall slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorSpec {
    #[serde(default)]
    pub open: bool,

    #[serde(default)]
    pub locked: bool,
}

/// Initial state of a window placed in a wall slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSpec {
    #[serde(default)]
    pub open: bool,

    #[serde(default)]
    pub obstructed: bool,
}

/// Initial state of a light
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightSpec {
    #[serde(default)]
    pub on: bool,
}

/// One room of a layout. Door and window slots are in [North, East, South, West] order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSpec {
    /// Room identifier, also its location in the house
    pub id: String,

    #[serde(default)]
    pub doors: [Option<DoorSpec>; 4],

    #[serde(default)]
    pub windows: [Option<WindowSpec>; 4],

    #[serde(default)]
    pub lights: Vec<LightSpec>,

    /// Starting temperature in degrees Celsius
    pub temperature: Option<f64>,
}

impl RoomSpec {
    /// Create a room spec with every slot empty
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder: place a door in slot `index` (0 = North .. 3 = West)
    pub fn with_door(mut self, index: usize, door: DoorSpec) -> Self {
        if let Some(slot) = self.doors.get_mut(index) {
            *slot = Some(door);
        }
        self
    }

    /// Builder: place a window in slot `index` (0 = North .. 3 = West)
    pub fn with_window(mut self, index: usize, window: WindowSpec) -> Self {
        if let Some(slot) = self.windows.get_mut(index) {
            *slot = Some(window);
        }
        self
    }

    /// Builder: append a light
    pub fn with_light(mut self, light: LightSpec) -> Self {
        self.lights.push(light);
        self
    }
}

/// A complete house layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSpec {
    pub rooms: Vec<RoomSpec>,

    /// Room id pairs, inserted in order
    #[serde(default)]
    pub connections: Vec<[String; 2]>,

    /// Starting room for tours
    pub root: Option<String>,
}

impl LayoutSpec {
    /// Load a layout from a JSON file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let layout: Self = serde_json::from_str(&content)?;
        Ok(layout)
    }

    /// Room ids in document order
    pub fn room_ids(&self) -> Vec<&str> {
        self.rooms.iter().map(|r| r.id.as_str()).collect()
    }
}

/// One persisted person profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub name: String,

    /// Level token: Parent, Child, Guest, Stranger or Custom
    pub level: String,

    /// Action tokens, only read for Custom levels
    #[serde(default)]
    pub actions: Vec<String>,
}

/// A profile store document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    #[serde(default)]
    pub profiles: Vec<ProfileRecord>,
}

impl ProfileDocument {
    /// Load profiles from a YAML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let document: Self = serde_yaml::from_str(&content)?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_layout_parse() {
        let json = r#"{
            "rooms": [
                {
                    "id": "kitchen",
                    "doors": [{"open": false, "locked": true}, null, null, null],
                    "windows": [null, {"open": true}, null, null],
                    "lights": [{"on": true}, {}]
                },
                { "id": "hall" }
            ],
            "connections": [["kitchen", "hall"]],
            "root": "hall"
        }"#;

        let layout: LayoutSpec = serde_json::from_str(json).unwrap();
        assert_eq!(layout.room_ids(), vec!["kitchen", "hall"]);
        assert_eq!(layout.rooms[0].doors[0], Some(DoorSpec { open: false, locked: true }));
        assert!(layout.rooms[0].doors[1].is_none());
        assert_eq!(layout.rooms[0].windows[1], Some(WindowSpec { open: true, obstructed: false }));
        assert_eq!(layout.rooms[0].lights.len(), 2);
        assert!(layout.rooms[1].doors.iter().all(|d| d.is_none()));
        assert_eq!(layout.root.as_deref(), Some("hall"));
    }

    #[test]
    fn test_room_spec_builder_ignores_bad_slot() {
        let room = RoomSpec::new("attic")
            .with_door(2, DoorSpec::default())
            .with_door(7, DoorSpec::default())
            .with_light(LightSpec { on: true });

        assert!(room.doors[2].is_some());
        assert_eq!(room.doors.iter().filter(|d| d.is_some()).count(), 1);
        assert_eq!(room.lights.len(), 1);
    }

    #[test]
    fn test_layout_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rooms": [{{"id": "den"}}], "root": "den"}}"#).unwrap();

        let layout = LayoutSpec::from_file(file.path()).unwrap();
        assert_eq!(layout.room_ids(), vec!["den"]);
        assert!(layout.connections.is_empty());
    }

    #[test]
    fn test_layout_from_missing_file() {
        let result = LayoutSpec::from_file(Path::new("/nonexistent/layout.json"));
        assert!(matches!(result, Err(crate::HomeError::Io(_))));
    }

    #[test]
    fn test_profiles_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
profiles:
  - name: alice
    level: Parent
  - name: babysitter
    level: Custom
    actions:
      - ToggleLight
      - ToggleDoorOpen
"#
        )
        .unwrap();

        let document = ProfileDocument::from_file(file.path()).unwrap();
        assert_eq!(document.profiles.len(), 2);
        assert_eq!(document.profiles[0].level, "Parent");
        assert!(document.profiles[0].actions.is_empty());
        assert_eq!(document.profiles[1].actions, vec!["ToggleLight", "ToggleDoorOpen"]);
    }
}
