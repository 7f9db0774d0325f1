//! Integration tests driving a whole session.
//!
//! Exercises: layout file → House → actor placement → authorized attempts
//! → fixture transitions → away mode → audit trail.

use home::{Blocked, DoorState, Session, Target, WallSlot, WindowState};
use rbac::{Action, Permission};
use shared::{DoorSpec, HomeError, LayoutSpec, LightSpec, ProfileDocument, RoomSpec, WindowSpec};
use std::io::Write;

// ── Helpers ────────────────────────────────────────────────────────────

fn four_rooms() -> LayoutSpec {
    LayoutSpec {
        rooms: vec![
            RoomSpec::new("kitchen")
                .with_door(0, DoorSpec::default())
                .with_window(1, WindowSpec::default())
                .with_light(LightSpec::default()),
            RoomSpec::new("living_room").with_light(LightSpec { on: true }),
            RoomSpec::new("hall").with_door(2, DoorSpec { open: true, locked: false }),
            RoomSpec::new("bedroom").with_window(3, WindowSpec { open: true, obstructed: false }),
        ],
        connections: vec![
            ["hall".to_string(), "kitchen".to_string()],
            ["hall".to_string(), "living_room".to_string()],
            ["living_room".to_string(), "bedroom".to_string()],
        ],
        root: Some("hall".to_string()),
    }
}

fn session_as(permission: Permission) -> Session {
    let mut session = Session::new();
    session.load_layout(&four_rooms()).unwrap();
    session.set_actor("alice", permission, "kitchen").unwrap();
    session
}

fn door(room: &str, slot: WallSlot) -> Target {
    Target::Door {
        room: room.to_string(),
        slot,
    }
}

fn window(room: &str, slot: WallSlot) -> Target {
    Target::Window {
        room: room.to_string(),
        slot,
    }
}

// ── Topology ───────────────────────────────────────────────────────────

#[test]
fn duplicate_connection_leaves_one_entry() {
    let mut session = session_as(Permission::parent());
    let house = session.house_mut();

    house.add_connection("kitchen", "living_room").unwrap_err();
    house.add_connection("bedroom", "hall").unwrap_err();
    house.add_connection("hall", "kitchen").unwrap();

    let adjacent = house.adjacents("kitchen").unwrap();
    assert_eq!(adjacent, vec!["hall"]);
    assert_eq!(house.connection_count(), 3);
}

#[test]
fn tour_reaches_every_connected_room_in_any_order() {
    let mut reversed = four_rooms();
    reversed.rooms.reverse();
    reversed.connections.reverse();

    let mut first = Session::new();
    first.load_layout(&four_rooms()).unwrap();
    let mut second = Session::new();
    second.load_layout(&reversed).unwrap();

    let mut a = first.house().tour_order().unwrap();
    let mut b = second.house().tour_order().unwrap();
    assert_eq!(a.len(), 4);
    a.sort();
    b.sort();
    assert_eq!(a, b);
}

#[test]
fn layout_loads_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "rooms": [
                {{"id": "kitchen", "doors": [{{"locked": true}}, null, null, null]}},
                {{"id": "hall", "lights": [{{"on": true}}]}}
            ],
            "connections": [["kitchen", "hall"]],
            "root": "kitchen"
        }}"#
    )
    .unwrap();

    let layout = LayoutSpec::from_file(file.path()).unwrap();
    let mut session = Session::new();
    session.load_layout(&layout).unwrap();

    assert_eq!(session.house().tour_order().unwrap(), vec!["kitchen", "hall"]);
    let kitchen = session.house().get_room("kitchen").unwrap();
    assert_eq!(kitchen.door(WallSlot::North).unwrap().state(), DoorState::ClosedLocked);
    assert_eq!(session.house().get_room("hall").unwrap().lights_on(), 1);
}

// ── Occupancy ──────────────────────────────────────────────────────────

#[test]
fn moving_to_the_yard_updates_everything() {
    let mut session = session_as(Permission::parent());
    assert_eq!(session.house().get_room("kitchen").unwrap().occupant_count(), 1);

    session.move_actor("yard").unwrap();

    assert!(session.house().get_room("kitchen").unwrap().is_empty());
    assert!(session.house().yard().has_occupant("alice"));
    assert_eq!(session.house().location_of("alice"), Some("yard"));
    assert_eq!(session.house().number_of_people(), 1);
}

#[test]
fn moving_to_unknown_room_keeps_position() {
    let mut session = session_as(Permission::parent());

    let err = session.move_actor("cellar").unwrap_err();

    assert!(matches!(err, HomeError::NoSuchLocation(_)));
    assert_eq!(session.actor_location(), Some("kitchen"));
}

// ── Fixture invariants ─────────────────────────────────────────────────

#[test]
fn lock_then_open_is_blocked_by_lock() {
    let mut session = session_as(Permission::parent());

    let locked = session.attempt(Action::ToggleDoorLock, door("kitchen", WallSlot::North)).unwrap();
    let opened = session.attempt(Action::ToggleDoorOpen, door("kitchen", WallSlot::North)).unwrap();

    assert!(locked.outcome.is_applied());
    assert_eq!(opened.outcome.blocked_by(), Some(Blocked::ByLock));
}

#[test]
fn open_door_cannot_be_locked() {
    let mut session = session_as(Permission::parent());
    let hall_door = door("hall", WallSlot::South);

    let report = session.attempt(Action::ToggleDoorLock, hall_door.clone()).unwrap();
    assert_eq!(report.outcome.blocked_by(), Some(Blocked::ByOpenState));

    session.attempt(Action::ToggleDoorOpen, hall_door.clone()).unwrap();
    let report = session.attempt(Action::ToggleDoorLock, hall_door).unwrap();
    assert!(report.outcome.is_applied());

    let state = session.house().get_room("hall").unwrap().door(WallSlot::South).unwrap().state();
    assert_eq!(state, DoorState::ClosedLocked);
}

#[test]
fn obstructed_window_stays_closed() {
    let mut session = session_as(Permission::parent());
    let bedroom = window("bedroom", WallSlot::West);

    session.attempt(Action::ToggleWindowObstruct, bedroom.clone()).unwrap();
    let report = session.attempt(Action::ToggleWindowOpen, bedroom).unwrap();

    assert_eq!(report.outcome.blocked_by(), Some(Blocked::ByObstruction));
    let state = session.house().get_room("bedroom").unwrap().window(WallSlot::West).unwrap().state();
    assert_eq!(state, WindowState::ClosedObstructed);
}

// ── Away mode ──────────────────────────────────────────────────────────

#[test]
fn away_mode_refused_while_anyone_is_home() {
    let mut session = session_as(Permission::parent());
    session.move_actor("yard").unwrap();

    let report = session
        .attempt(Action::SetAwayMode, Target::AwayMode { enable: true })
        .unwrap();

    assert_eq!(report.outcome.blocked_by(), Some(Blocked::HouseOccupied));
    assert!(!session.modes().away.enabled);
}

#[test]
fn away_mode_secures_house_and_disables_freely() {
    let mut session = session_as(Permission::parent());
    session.house_mut().remove_person("alice");

    let report = session
        .attempt(Action::SetAwayMode, Target::AwayMode { enable: true })
        .unwrap();
    assert!(report.outcome.is_applied());

    for (_, room) in session.house().rooms() {
        assert!(room.doors().all(|d| d.state() == DoorState::ClosedLocked));
        assert_eq!(room.open_windows(), 0);
    }

    session.move_actor("hall").unwrap();
    let report = session
        .attempt(Action::SetAwayMode, Target::AwayMode { enable: false })
        .unwrap();
    assert!(report.outcome.is_applied());
    assert!(!session.modes().away.enabled);
}

#[test]
fn away_mode_refused_with_obstructed_window() {
    let mut session = session_as(Permission::parent());
    session
        .attempt(Action::ToggleWindowObstruct, window("kitchen", WallSlot::East))
        .unwrap();
    session.house_mut().remove_person("alice");

    let report = session
        .attempt(Action::SetAwayMode, Target::AwayMode { enable: true })
        .unwrap();

    assert_eq!(report.outcome.blocked_by(), Some(Blocked::ObstructedWindowPresent));
    let hall_door = session.house().get_room("hall").unwrap().door(WallSlot::South).unwrap();
    assert!(hall_door.is_open());
}

// ── Authorization ──────────────────────────────────────────────────────

#[test]
fn parent_may_attempt_every_action() {
    let session = session_as(Permission::parent());
    let parent = session.actor().unwrap().permission().clone();

    for action in Action::all() {
        assert!(parent.authorize(session.policy(), *action).is_ok());
    }
}

#[test]
fn stranger_is_denied_and_nothing_changes() {
    let mut session = session_as(Permission::stranger());

    for action in Action::all() {
        let report = session.attempt(*action, Target::AutoLight).unwrap();
        assert!(report.outcome.is_denied());
    }

    assert!(!session.modes().auto_light);
    assert_eq!(session.audit().get_stats().denial_count, Action::all().len());
}

#[test]
fn allowing_an_action_reaches_every_holder() {
    let mut session = session_as(Permission::child());
    session
        .house_mut()
        .add_person("tom", Permission::child(), "hall")
        .unwrap();

    session.allow(&Permission::child(), Action::ChangeTemperature);

    let tom = session.house().permission_of("tom").unwrap().clone();
    assert!(tom.authorize(session.policy(), Action::ChangeTemperature).is_ok());
    let report = session
        .attempt(
            Action::ChangeTemperature,
            Target::Thermostat {
                room: "kitchen".to_string(),
                degrees: 19.0,
            },
        )
        .unwrap();
    assert!(report.outcome.is_applied());
    assert_eq!(session.house().get_room("kitchen").unwrap().temperature(), 19.0);
}

#[test]
fn profiles_load_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
profiles:
  - name: alice
    level: Parent
  - name: sitter
    level: Custom
    actions: [ToggleLight]
"#
    )
    .unwrap();

    let document = ProfileDocument::from_file(file.path()).unwrap();
    let mut session = Session::new();
    session.load_layout(&four_rooms()).unwrap();
    assert_eq!(session.load_profiles(&document).unwrap(), 2);

    session.set_actor_from_profile("sitter", "living_room").unwrap();
    let light = Target::Light {
        room: "living_room".to_string(),
        index: 0,
    };
    let applied = session.attempt(Action::ToggleLight, light).unwrap();
    let denied = session.attempt(Action::ToggleDoorOpen, door("kitchen", WallSlot::North)).unwrap();

    assert!(applied.outcome.is_applied());
    assert!(denied.outcome.is_denied());
}

#[test]
fn bad_custom_profile_registers_nothing() {
    let document: ProfileDocument = serde_yaml::from_str(
        r#"
profiles:
  - name: sitter
    level: Custom
    actions: [ToggleLight, FlyAway]
"#,
    )
    .unwrap();

    let mut session = Session::new();
    let err = session.load_profiles(&document).unwrap_err();

    assert!(matches!(err, HomeError::UnknownAction(a) if a == "FlyAway"));
    assert!(session.profiles().is_empty());
    assert!(session.policy().custom_levels().is_empty());
}
