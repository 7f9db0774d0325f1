//! Transition dispatch - applies a catalog action to a typed target
//!
//! The outer match is over [`Action`] with no wildcard, so a new catalog
//! member does not compile until it has a transition here. Each arm accepts
//! exactly one [`Manipulable`] variant; anything else is `IncompatibleTarget`.

use crate::fixture::{Door, Light, Window};
use crate::house::House;
use crate::modes::{AwayDelay, AwayMode, LightWindow};
use crate::outcome::{Blocked, Outcome};
use crate::room::Room;
use rbac::Action;
use shared::{HomeError, IncompatibleTargetError, Result};
use std::collections::BTreeSet;
use tracing::info;

/// Borrowed target of an action, with any arguments the action needs
#[derive(Debug)]
pub enum Manipulable<'a> {
    Door(&'a mut Door),
    Window(&'a mut Window),
    Light(&'a mut Light),
    Thermostat {
        room: &'a mut Room,
        degrees: f64,
    },
    AwayMode {
        house: &'a mut House,
        away: &'a mut AwayMode,
        enable: bool,
    },
    AwayLights {
        house: &'a mut House,
        away: &'a mut AwayMode,
        rooms: &'a [String],
        window: LightWindow,
    },
    AwayDelay {
        away: &'a mut AwayMode,
        delay: AwayDelay,
    },
    AutoLight(&'a mut bool),
}

impl Manipulable<'_> {
    /// Short description used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Manipulable::Door(_) => "a door",
            Manipulable::Window(_) => "a window",
            Manipulable::Light(_) => "a light",
            Manipulable::Thermostat { .. } => "a thermostat",
            Manipulable::AwayMode { .. } => "away mode",
            Manipulable::AwayLights { .. } => "away mode lights",
            Manipulable::AwayDelay { .. } => "the away mode delay",
            Manipulable::AutoLight(_) => "automatic lighting",
        }
    }
}

fn incompatible(action: Action, target: &Manipulable<'_>) -> HomeError {
    IncompatibleTargetError {
        action: action.token().to_string(),
        target: target.kind().to_string(),
    }
    .into()
}

/// Apply an action to its target.
///
/// Precondition failures are returned as `Ok(Outcome::Blocked(_))` with the
/// target unchanged; a mismatched target is an error.
pub fn do_action(action: Action, target: Manipulable<'_>) -> Result<Outcome> {
    match action {
        Action::ToggleDoorOpen => match target {
            Manipulable::Door(door) => Ok(door.toggle_open()),
            other => Err(incompatible(action, &other)),
        },
        Action::ToggleDoorLock => match target {
            Manipulable::Door(door) => Ok(door.toggle_lock()),
            other => Err(incompatible(action, &other)),
        },
        Action::ToggleWindowOpen => match target {
            Manipulable::Window(window) => Ok(window.toggle_open()),
            other => Err(incompatible(action, &other)),
        },
        Action::ToggleWindowObstruct => match target {
            Manipulable::Window(window) => Ok(window.toggle_obstruct()),
            other => Err(incompatible(action, &other)),
        },
        Action::ToggleLight => match target {
            Manipulable::Light(light) => Ok(light.toggle()),
            other => Err(incompatible(action, &other)),
        },
        Action::ToggleAutoLight => match target {
            Manipulable::AutoLight(flag) => {
                *flag = !*flag;
                info!(enabled = *flag, "automatic lighting toggled");
                Ok(Outcome::applied(if *flag {
                    "automatic lighting on"
                } else {
                    "automatic lighting off"
                }))
            }
            other => Err(incompatible(action, &other)),
        },
        Action::SetAwayMode => match target {
            Manipulable::AwayMode { house, away, enable } => set_away_mode(house, away, enable),
            other => Err(incompatible(action, &other)),
        },
        Action::SetAwayModeLights => match target {
            Manipulable::AwayLights {
                house,
                away,
                rooms,
                window,
            } => set_away_lights(house, away, rooms, window),
            other => Err(incompatible(action, &other)),
        },
        Action::SetAwayModeDelay => match target {
            Manipulable::AwayDelay { away, delay } => {
                away.delay = Some(delay);
                Ok(Outcome::applied(format!(
                    "away mode delay set to {}ms",
                    delay.millis()
                )))
            }
            other => Err(incompatible(action, &other)),
        },
        Action::ChangeTemperature => match target {
            Manipulable::Thermostat { room, degrees } => {
                room.set_temperature(degrees);
                Ok(Outcome::applied(format!("temperature set to {:.1}°C", degrees)))
            }
            other => Err(incompatible(action, &other)),
        },
    }
}

fn set_away_mode(house: &mut House, away: &mut AwayMode, enable: bool) -> Result<Outcome> {
    if !enable {
        away.enabled = false;
        info!("away mode disabled");
        return Ok(Outcome::applied("away mode disabled"));
    }

    if house.has_obstructed_window() {
        return Ok(Outcome::Blocked(Blocked::ObstructedWindowPresent));
    }
    if house.number_of_people() > 0 {
        return Ok(Outcome::Blocked(Blocked::HouseOccupied));
    }

    house.close_openables()?;
    away.enabled = true;
    info!("away mode enabled");
    Ok(Outcome::applied("away mode enabled, all doors locked and windows closed"))
}

fn set_away_lights(
    house: &mut House,
    away: &mut AwayMode,
    rooms: &[String],
    window: LightWindow,
) -> Result<Outcome> {
    let selected = rooms
        .iter()
        .map(|location| house.validate_location(location))
        .collect::<Result<BTreeSet<_>>>()?;

    for (location, room) in house.rooms_mut() {
        room.set_away_light(selected.contains(location));
    }
    away.light_window = Some(window);

    info!(rooms = selected.len(), start = %window.start, end = %window.end, "away lights set");
    Ok(Outcome::applied(format!(
        "away lights set for {} room(s) from {} to {}",
        selected.len(),
        window.start.format("%H:%M"),
        window.end.format("%H:%M")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{DoorState, WallSlot, WindowState};
    use chrono::NaiveTime;
    use rbac::Permission;

    fn at(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    // ============== Fixture Dispatch Tests ==============

    #[test]
    fn test_lock_then_open_is_blocked() {
        let mut door = Door::default();

        let locked = do_action(Action::ToggleDoorLock, Manipulable::Door(&mut door)).unwrap();
        let opened = do_action(Action::ToggleDoorOpen, Manipulable::Door(&mut door)).unwrap();

        assert!(locked.is_applied());
        assert_eq!(opened.blocked_by(), Some(Blocked::ByLock));
        assert_eq!(door.state(), DoorState::ClosedLocked);
    }

    #[test]
    fn test_window_dispatch() {
        let mut window = Window::default();

        do_action(Action::ToggleWindowObstruct, Manipulable::Window(&mut window)).unwrap();
        let outcome = do_action(Action::ToggleWindowOpen, Manipulable::Window(&mut window)).unwrap();

        assert_eq!(outcome.blocked_by(), Some(Blocked::ByObstruction));
        assert_eq!(window.state(), WindowState::ClosedObstructed);
    }

    #[test]
    fn test_incompatible_target() {
        let mut door = Door::default();

        let err = do_action(Action::ToggleLight, Manipulable::Door(&mut door)).unwrap_err();

        assert!(matches!(
            err,
            HomeError::IncompatibleTarget(IncompatibleTargetError { ref action, ref target })
                if action == "ToggleLight" && target == "a door"
        ));
        assert_eq!(door.state(), DoorState::ClosedUnlocked);
    }

    #[test]
    fn test_every_fixture_action_rejects_auto_light_flag() {
        for action in [
            Action::ToggleDoorOpen,
            Action::ToggleDoorLock,
            Action::ToggleWindowOpen,
            Action::ToggleWindowObstruct,
            Action::ToggleLight,
        ] {
            let mut flag = false;
            assert!(do_action(action, Manipulable::AutoLight(&mut flag)).is_err());
            assert!(!flag);
        }
    }

    #[test]
    fn test_auto_light_flips_flag_only() {
        let mut flag = false;
        let mut light = Light::default();

        do_action(Action::ToggleAutoLight, Manipulable::AutoLight(&mut flag)).unwrap();

        assert!(flag);
        assert!(!light.is_on());
        do_action(Action::ToggleLight, Manipulable::Light(&mut light)).unwrap();
        assert!(light.is_on());
    }

    #[test]
    fn test_change_temperature() {
        let mut room = Room::new();
        let outcome = do_action(
            Action::ChangeTemperature,
            Manipulable::Thermostat { room: &mut room, degrees: 18.5 },
        )
        .unwrap();

        assert_eq!(room.temperature(), 18.5);
        assert_eq!(outcome, Outcome::applied("temperature set to 18.5°C"));
    }

    // ============== Away Mode Tests ==============

    fn open_house() -> House {
        let mut house = House::new();
        let room = Room::new()
            .with_door(WallSlot::North, Door::new(true, false))
            .with_window(WallSlot::East, Window::new(true, false));
        house.add_room(room, "hall").unwrap();
        house.add_room(Room::new(), "study").unwrap();
        house
    }

    #[test]
    fn test_away_mode_blocked_while_occupied() {
        let mut house = open_house();
        let mut away = AwayMode::default();
        house.add_person("alice", Permission::parent(), "study").unwrap();

        let outcome = do_action(
            Action::SetAwayMode,
            Manipulable::AwayMode { house: &mut house, away: &mut away, enable: true },
        )
        .unwrap();

        assert_eq!(outcome.blocked_by(), Some(Blocked::HouseOccupied));
        assert!(!away.enabled);
        assert!(house.get_room("hall").unwrap().door(WallSlot::North).unwrap().is_open());
    }

    #[test]
    fn test_away_mode_blocked_while_someone_in_yard() {
        let mut house = open_house();
        let mut away = AwayMode::default();
        house.add_person("bob", Permission::child(), "yard").unwrap();

        let outcome = do_action(
            Action::SetAwayMode,
            Manipulable::AwayMode { house: &mut house, away: &mut away, enable: true },
        )
        .unwrap();

        assert_eq!(outcome.blocked_by(), Some(Blocked::HouseOccupied));
    }

    #[test]
    fn test_away_mode_blocked_by_obstruction() {
        let mut house = open_house();
        let mut away = AwayMode::default();
        house
            .get_room_mut("hall")
            .unwrap()
            .window_mut(WallSlot::East)
            .unwrap()
            .toggle_obstruct();

        let outcome = do_action(
            Action::SetAwayMode,
            Manipulable::AwayMode { house: &mut house, away: &mut away, enable: true },
        )
        .unwrap();

        assert_eq!(outcome.blocked_by(), Some(Blocked::ObstructedWindowPresent));
        assert!(!away.enabled);
    }

    #[test]
    fn test_away_mode_secures_empty_house() {
        let mut house = open_house();
        let mut away = AwayMode::default();

        let outcome = do_action(
            Action::SetAwayMode,
            Manipulable::AwayMode { house: &mut house, away: &mut away, enable: true },
        )
        .unwrap();

        assert!(outcome.is_applied());
        assert!(away.enabled);
        let hall = house.get_room("hall").unwrap();
        assert!(hall.doors().all(|d| d.state() == DoorState::ClosedLocked));
        assert!(hall.windows().all(|w| !w.is_open()));
    }

    #[test]
    fn test_away_mode_disable_has_no_precondition() {
        let mut house = open_house();
        house.add_person("alice", Permission::parent(), "hall").unwrap();
        let mut away = AwayMode {
            enabled: true,
            ..Default::default()
        };

        let outcome = do_action(
            Action::SetAwayMode,
            Manipulable::AwayMode { house: &mut house, away: &mut away, enable: false },
        )
        .unwrap();

        assert!(outcome.is_applied());
        assert!(!away.enabled);
    }

    #[test]
    fn test_away_lights_marks_selected_rooms() {
        let mut house = open_house();
        house.get_room_mut("study").unwrap().set_away_light(true);
        let mut away = AwayMode::default();
        let rooms = vec!["hall".to_string()];

        do_action(
            Action::SetAwayModeLights,
            Manipulable::AwayLights {
                house: &mut house,
                away: &mut away,
                rooms: &rooms,
                window: LightWindow::new(at(18), at(23)),
            },
        )
        .unwrap();

        assert!(house.get_room("hall").unwrap().away_light());
        assert!(!house.get_room("study").unwrap().away_light());
        assert_eq!(away.light_window, Some(LightWindow::new(at(18), at(23))));
    }

    #[test]
    fn test_away_lights_unknown_room_changes_nothing() {
        let mut house = open_house();
        let mut away = AwayMode::default();
        let rooms = vec!["hall".to_string(), "pool".to_string()];

        let err = do_action(
            Action::SetAwayModeLights,
            Manipulable::AwayLights {
                house: &mut house,
                away: &mut away,
                rooms: &rooms,
                window: LightWindow::new(at(18), at(23)),
            },
        )
        .unwrap_err();

        assert!(matches!(err, HomeError::NoSuchLocation(l) if l == "pool"));
        assert!(!house.get_room("hall").unwrap().away_light());
        assert!(away.light_window.is_none());
    }

    #[test]
    fn test_away_delay() {
        let mut away = AwayMode::default();
        let delay = AwayDelay::new(45_000).unwrap();

        do_action(
            Action::SetAwayModeDelay,
            Manipulable::AwayDelay { away: &mut away, delay },
        )
        .unwrap();

        assert_eq!(away.delay, Some(delay));
    }
}
