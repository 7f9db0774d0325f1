//! Action - The closed catalog of operations a person can attempt
//!
//! Every member is matched exhaustively wherever behaviour differs, so a new
//! variant does not compile until its label, token, default eligibility and
//! transition are all written down.

use crate::permission::PermissionLevel;
use serde::{Deserialize, Serialize};
use shared::{HomeError, Result};
use std::str::FromStr;

/// Operations on fixtures and simulation-wide modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    ToggleDoorOpen,
    ToggleDoorLock,
    ToggleWindowOpen,
    ToggleWindowObstruct,
    ToggleLight,
    ToggleAutoLight,
    SetAwayMode,
    SetAwayModeLights,
    SetAwayModeDelay,
    /// Placeholder for climate control; only records the requested value
    ChangeTemperature,
}

impl Action {
    /// Every member of the catalog, in presentation order
    pub const ALL: [Action; 10] = [
        Action::ToggleDoorOpen,
        Action::ToggleDoorLock,
        Action::ToggleWindowOpen,
        Action::ToggleWindowObstruct,
        Action::ToggleLight,
        Action::ToggleAutoLight,
        Action::SetAwayMode,
        Action::SetAwayModeLights,
        Action::SetAwayModeDelay,
        Action::ChangeTemperature,
    ];

    pub fn all() -> &'static [Action] {
        &Self::ALL
    }

    /// Human readable label for menus
    pub fn label(&self) -> &'static str {
        match self {
            Action::ToggleDoorOpen => "Open/close door",
            Action::ToggleDoorLock => "Lock/unlock door",
            Action::ToggleWindowOpen => "Open/close window",
            Action::ToggleWindowObstruct => "Obstruct/clear window",
            Action::ToggleLight => "Turn light on/off",
            Action::ToggleAutoLight => "Toggle automatic lighting",
            Action::SetAwayMode => "Set away mode",
            Action::SetAwayModeLights => "Set away mode lights",
            Action::SetAwayModeDelay => "Set away mode alarm delay",
            Action::ChangeTemperature => "Change temperature",
        }
    }

    /// Stable token used by persisted profiles
    pub fn token(&self) -> &'static str {
        match self {
            Action::ToggleDoorOpen => "ToggleDoorOpen",
            Action::ToggleDoorLock => "ToggleDoorLock",
            Action::ToggleWindowOpen => "ToggleWindowOpen",
            Action::ToggleWindowObstruct => "ToggleWindowObstruct",
            Action::ToggleLight => "ToggleLight",
            Action::ToggleAutoLight => "ToggleAutoLight",
            Action::SetAwayMode => "SetAwayMode",
            Action::SetAwayModeLights => "SetAwayModeLights",
            Action::SetAwayModeDelay => "SetAwayModeDelay",
            Action::ChangeTemperature => "ChangeTemperature",
        }
    }

    /// Parse a persisted token
    pub fn from_token(token: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.token() == token)
            .ok_or_else(|| HomeError::UnknownAction(token.to_string()))
    }

    /// Whether a level allows this action before any `allow`/`disallow` edits.
    ///
    /// Custom levels start from their own explicit list, never from this table.
    pub fn eligible_by_default(&self, level: &PermissionLevel) -> bool {
        match level {
            PermissionLevel::Parent => true,
            PermissionLevel::Stranger | PermissionLevel::Custom(_) => false,
            PermissionLevel::Child => match self {
                Action::ToggleDoorOpen
                | Action::ToggleWindowOpen
                | Action::ToggleLight
                | Action::ToggleAutoLight => true,
                Action::ToggleDoorLock
                | Action::ToggleWindowObstruct
                | Action::SetAwayMode
                | Action::SetAwayModeLights
                | Action::SetAwayModeDelay
                | Action::ChangeTemperature => false,
            },
            PermissionLevel::Guest => match self {
                Action::ToggleDoorOpen
                | Action::ToggleWindowOpen
                | Action::ToggleLight
                | Action::ChangeTemperature => true,
                Action::ToggleDoorLock
                | Action::ToggleWindowObstruct
                | Action::ToggleAutoLight
                | Action::SetAwayMode
                | Action::SetAwayModeLights
                | Action::SetAwayModeDelay => false,
            },
        }
    }
}

impl FromStr for Action {
    type Err = HomeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
