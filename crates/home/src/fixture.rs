//! Fixture state machines - doors, windows and lights
//!
//! Each fixture keeps the invariant of its state machine itself. Precondition
//! failures come back as [`Outcome::Blocked`] and leave the fixture unchanged.

use crate::outcome::{Blocked, Outcome};
use serde::{Deserialize, Serialize};
use shared::{DoorSpec, HomeError, LightSpec, Result, WindowSpec};
use std::str::FromStr;

/// The four wall positions a door or window can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WallSlot {
    North,
    East,
    South,
    West,
}

impl WallSlot {
    /// Fixed slot order used by layouts
    pub const ALL: [WallSlot; 4] = [WallSlot::North, WallSlot::East, WallSlot::South, WallSlot::West];

    pub fn index(&self) -> usize {
        match self {
            WallSlot::North => 0,
            WallSlot::East => 1,
            WallSlot::South => 2,
            WallSlot::West => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WallSlot::North => "north",
            WallSlot::East => "east",
            WallSlot::South => "south",
            WallSlot::West => "west",
        }
    }
}

impl FromStr for WallSlot {
    type Err = HomeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(WallSlot::North),
            "east" | "e" => Ok(WallSlot::East),
            "south" | "s" => Ok(WallSlot::South),
            "west" | "w" => Ok(WallSlot::West),
            _ => Err(HomeError::InvalidWallSlot(s.to_string())),
        }
    }
}

impl std::fmt::Display for WallSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Reachable door states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DoorState {
    ClosedUnlocked,
    ClosedLocked,
    OpenUnlocked,
}

/// A door. Never open and locked at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Door {
    open: bool,
    locked: bool,
}

impl Door {
    /// Create a door. An open door is never locked, so `locked` is ignored when `open`.
    pub fn new(open: bool, locked: bool) -> Self {
        Self {
            open,
            locked: locked && !open,
        }
    }

    pub fn from_spec(spec: &DoorSpec) -> Self {
        Self::new(spec.open, spec.locked)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn state(&self) -> DoorState {
        match (self.open, self.locked) {
            (true, _) => DoorState::OpenUnlocked,
            (false, true) => DoorState::ClosedLocked,
            (false, false) => DoorState::ClosedUnlocked,
        }
    }

    pub fn toggle_open(&mut self) -> Outcome {
        if self.locked {
            return Outcome::Blocked(Blocked::ByLock);
        }
        self.open = !self.open;
        Outcome::applied(if self.open { "door opened" } else { "door closed" })
    }

    pub fn toggle_lock(&mut self) -> Outcome {
        if self.open {
            return Outcome::Blocked(Blocked::ByOpenState);
        }
        self.locked = !self.locked;
        Outcome::applied(if self.locked { "door locked" } else { "door unlocked" })
    }

    /// Close and lock regardless of the current state
    pub fn secure(&mut self) {
        self.open = false;
        self.locked = true;
    }
}

/// Reachable window states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WindowState {
    ClosedClear,
    ClosedObstructed,
    OpenClear,
}

/// A window. Never open and obstructed at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Window {
    open: bool,
    obstructed: bool,
}

impl Window {
    /// Create a window. An obstructed window is closed, so `open` is ignored when `obstructed`.
    pub fn new(open: bool, obstructed: bool) -> Self {
        Self {
            open: open && !obstructed,
            obstructed,
        }
    }

    pub fn from_spec(spec: &WindowSpec) -> Self {
        Self::new(spec.open, spec.obstructed)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_obstructed(&self) -> bool {
        self.obstructed
    }

    pub fn state(&self) -> WindowState {
        match (self.open, self.obstructed) {
            (_, true) => WindowState::ClosedObstructed,
            (true, false) => WindowState::OpenClear,
            (false, false) => WindowState::ClosedClear,
        }
    }

    pub fn toggle_open(&mut self) -> Outcome {
        if self.obstructed {
            return Outcome::Blocked(Blocked::ByObstruction);
        }
        self.open = !self.open;
        Outcome::applied(if self.open { "window opened" } else { "window closed" })
    }

    /// Obstructing an open window closes it first.
    pub fn toggle_obstruct(&mut self) -> Outcome {
        if self.obstructed {
            self.obstructed = false;
            return Outcome::applied("window cleared");
        }

        let was_open = self.open;
        self.open = false;
        self.obstructed = true;
        Outcome::applied(if was_open {
            "window closed and obstructed"
        } else {
            "window obstructed"
        })
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

/// A light
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Light {
    on: bool,
}

impl Light {
    pub fn new(on: bool) -> Self {
        Self { on }
    }

    pub fn from_spec(spec: &LightSpec) -> Self {
        Self::new(spec.on)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn toggle(&mut self) -> Outcome {
        self.on = !self.on;
        Outcome::applied(if self.on { "light on" } else { "light off" })
    }
}
