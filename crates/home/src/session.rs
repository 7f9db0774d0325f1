//! Session - One house, its policy table, modes and the current actor
//!
//! Every attempted action runs through [`Session::attempt`]: authorize against
//! the actor's permission, resolve the target inside the house, dispatch, then
//! record the result in the audit trail.

use crate::fixture::WallSlot;
use crate::house::House;
use crate::modes::{AwayDelay, LightWindow, ModeSettings};
use crate::outcome::Outcome;
use crate::room::Room;
use crate::transition::{do_action, Manipulable};
use audit::{AuditEventType, AuditLogger};
use rbac::{Action, MenuEntry, ModuleCatalog, Permission, PolicyTable, ProfileSet};
use serde::Serialize;
use shared::{validate, HomeError, Identifier, LayoutSpec, ProfileDocument, Result};
use tracing::{info, warn};

/// The person currently issuing actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    name: Identifier,
    permission: Permission,
}

impl Actor {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn permission(&self) -> &Permission {
        &self.permission
    }
}

/// What an action is aimed at, by location rather than by reference
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Door { room: String, slot: WallSlot },
    Window { room: String, slot: WallSlot },
    Light { room: String, index: usize },
    YardLight,
    Thermostat { room: String, degrees: f64 },
    AwayMode { enable: bool },
    AwayLights { rooms: Vec<String>, window: LightWindow },
    AwayDelay(AwayDelay),
    AutoLight,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Door { room, slot } => write!(f, "{} {} door", room, slot),
            Target::Window { room, slot } => write!(f, "{} {} window", room, slot),
            Target::Light { room, index } => write!(f, "{} light {}", room, index),
            Target::YardLight => write!(f, "yard light"),
            Target::Thermostat { room, degrees } => write!(f, "{} thermostat ({:.1}°C)", room, degrees),
            Target::AwayMode { enable } => {
                write!(f, "away mode ({})", if *enable { "on" } else { "off" })
            }
            Target::AwayLights { rooms, window } => write!(
                f,
                "away lights [{}] {}-{}",
                rooms.join(", "),
                window.start.format("%H:%M"),
                window.end.format("%H:%M")
            ),
            Target::AwayDelay(delay) => write!(f, "away delay ({}ms)", delay.millis()),
            Target::AutoLight => write!(f, "automatic lighting"),
        }
    }
}

/// Result of one attempt, whatever its outcome
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReport {
    pub actor: String,
    pub action: Action,
    pub target: String,
    pub outcome: Outcome,
}

/// Simulation session
#[derive(Debug)]
pub struct Session {
    house: House,
    policy: PolicyTable,
    modes: ModeSettings,
    profiles: ProfileSet,
    actor: Option<Actor>,
    audit: AuditLogger,
    catalog: ModuleCatalog,
}

impl Session {
    /// Empty house, default policy table and modes, no actor
    pub fn new() -> Self {
        Self {
            house: House::new(),
            policy: PolicyTable::new(),
            modes: ModeSettings::default(),
            profiles: ProfileSet::new(),
            actor: None,
            audit: AuditLogger::default(),
            catalog: ModuleCatalog::new(),
        }
    }

    // ========== Loading ==========

    /// Replace the house with one built from `layout`.
    ///
    /// The yard and its occupants carry over. On error the current house is
    /// left as it was.
    pub fn load_layout(&mut self, layout: &LayoutSpec) -> Result<()> {
        let yard = self.house.yard().clone();
        let house = House::from_layout_with_yard(layout, yard)?;
        self.house = house;
        Ok(())
    }

    /// Load person profiles, registering custom levels. All or nothing.
    pub fn load_profiles(&mut self, document: &ProfileDocument) -> Result<usize> {
        let profiles = ProfileSet::from_document(document, &mut self.policy)?;
        let count = profiles.len();
        for (name, permission) in profiles.iter() {
            self.profiles.insert(name.clone(), permission.clone());
        }
        info!(profiles = count, total = self.profiles.len(), "profiles added to session");
        Ok(count)
    }

    // ========== Actor ==========

    /// Place `name` at `location` and make them the actor
    pub fn set_actor(&mut self, name: &str, permission: Permission, location: &str) -> Result<()> {
        let id = validate(name)?;
        self.house.add_person(name, permission.clone(), location)?;

        let previous = self
            .actor
            .as_ref()
            .map(|a| a.name().to_string())
            .unwrap_or_else(|| "none".to_string());
        self.audit.log_actor_switch(&previous, id.as_str());
        info!(actor = %id, permission = %permission, location, "actor set");

        self.actor = Some(Actor { name: id, permission });
        Ok(())
    }

    /// Make a loaded profile the actor
    pub fn set_actor_from_profile(&mut self, name: &str, location: &str) -> Result<()> {
        let permission = self
            .profiles
            .get(name)
            .cloned()
            .ok_or_else(|| HomeError::UnknownPerson(name.to_string()))?;
        self.set_actor(name, permission, location)
    }

    /// Move the current actor somewhere else in the house or to the yard
    pub fn move_actor(&mut self, location: &str) -> Result<()> {
        let actor = self.actor.as_ref().ok_or(HomeError::NoActor)?;
        self.house
            .add_person(actor.name(), actor.permission.clone(), location)
    }

    // ========== People ==========

    /// Place someone in the house or the yard without making them the actor.
    ///
    /// Placing the actor this way also updates the actor's permission.
    pub fn add_person(&mut self, name: &str, permission: Permission, location: &str) -> Result<()> {
        self.house.add_person(name, permission.clone(), location)?;
        if let Some(actor) = self.actor.as_mut().filter(|a| a.name() == name) {
            actor.permission = permission;
        }
        Ok(())
    }

    /// Take someone out of the house and the yard. Returns false if unknown.
    ///
    /// Removing the actor keeps them selected with no location, so they can
    /// still act on the house from outside it.
    pub fn remove_person(&mut self, name: &str) -> bool {
        self.house.remove_person(name)
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    /// Where the actor currently is, if they are still in the house
    pub fn actor_location(&self) -> Option<&str> {
        self.actor
            .as_ref()
            .and_then(|a| self.house.location_of(a.name()))
    }

    // ========== Attempts ==========

    /// Attempt an action as the current actor.
    ///
    /// Denials and blocked preconditions come back as `Ok` with a
    /// non-applied outcome. Missing locations or fixtures and mismatched
    /// targets are errors.
    pub fn attempt(&mut self, action: Action, target: Target) -> Result<ActionReport> {
        let actor = self.actor.as_ref().ok_or(HomeError::NoActor)?;
        let actor_name = actor.name().to_string();
        let target_desc = target.to_string();

        if let Err(denied) = actor.permission.authorize(&self.policy, action) {
            warn!(actor = %actor_name, action = %action.token(), level = %denied.level, "action denied");
            self.audit.log_action(
                &actor_name,
                action.token(),
                &target_desc,
                AuditEventType::ActionDenied,
                Some(&denied.to_string()),
            );
            return Ok(ActionReport {
                actor: actor_name,
                action,
                target: target_desc,
                outcome: Outcome::Denied(denied),
            });
        }

        let dispatched = resolve(&mut self.house, &mut self.modes, &target)
            .and_then(|manipulable| do_action(action, manipulable));

        let outcome = match dispatched {
            Ok(outcome) => outcome,
            Err(err) => {
                self.audit.log_action(
                    &actor_name,
                    action.token(),
                    &target_desc,
                    AuditEventType::ActionFailed,
                    Some(&err.to_string()),
                );
                return Err(err);
            }
        };

        match &outcome {
            Outcome::Blocked(reason) => {
                warn!(actor = %actor_name, action = %action.token(), target = %target_desc, %reason, "action blocked");
                self.audit.log_action(
                    &actor_name,
                    action.token(),
                    &target_desc,
                    AuditEventType::ActionBlocked,
                    Some(reason.message()),
                );
            }
            _ => {
                self.audit.log_action(
                    &actor_name,
                    action.token(),
                    &target_desc,
                    AuditEventType::ActionApplied,
                    None,
                );
            }
        }

        Ok(ActionReport {
            actor: actor_name,
            action,
            target: target_desc,
            outcome,
        })
    }

    /// Actions the current actor may attempt, grouped by module
    pub fn menu(&self) -> Result<Vec<MenuEntry>> {
        let actor = self.actor.as_ref().ok_or(HomeError::NoActor)?;
        Ok(self.catalog.menu_for(&actor.permission, &self.policy))
    }

    // ========== Policy ==========

    /// Allow an action for every holder of `permission`
    pub fn allow(&mut self, permission: &Permission, action: Action) -> bool {
        let changed = permission.allow(&mut self.policy, action);
        if changed {
            self.log_policy_change(permission, action, true);
        }
        changed
    }

    /// Disallow an action for every holder of `permission`
    pub fn disallow(&mut self, permission: &Permission, action: Action) -> bool {
        let changed = permission.disallow(&mut self.policy, action);
        if changed {
            self.log_policy_change(permission, action, false);
        }
        changed
    }

    fn log_policy_change(&mut self, permission: &Permission, action: Action, allowed: bool) {
        let by = self
            .actor
            .as_ref()
            .map(|a| a.name().to_string())
            .unwrap_or_else(|| "none".to_string());
        self.audit
            .log_policy_change(&by, permission.level().name(), action.token(), allowed);
    }

    // ========== Accessors ==========

    pub fn house(&self) -> &House {
        &self.house
    }

    pub fn house_mut(&mut self) -> &mut House {
        &mut self.house
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut PolicyTable {
        &mut self.policy
    }

    pub fn modes(&self) -> &ModeSettings {
        &self.modes
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn missing_fixture(room: &str, fixture: String) -> HomeError {
    HomeError::NoSuchFixture {
        location: room.to_string(),
        fixture,
    }
}

fn room_mut<'a>(house: &'a mut House, room: &str) -> Result<&'a mut Room> {
    house
        .get_room_mut(room)
        .ok_or_else(|| HomeError::NoSuchLocation(room.to_string()))
}

/// Borrow the concrete target out of the house or the mode settings
fn resolve<'a>(
    house: &'a mut House,
    modes: &'a mut ModeSettings,
    target: &'a Target,
) -> Result<Manipulable<'a>> {
    Ok(match target {
        Target::Door { room, slot } => Manipulable::Door(
            room_mut(house, room)?
                .door_mut(*slot)
                .ok_or_else(|| missing_fixture(room, format!("{} door", slot)))?,
        ),
        Target::Window { room, slot } => Manipulable::Window(
            room_mut(house, room)?
                .window_mut(*slot)
                .ok_or_else(|| missing_fixture(room, format!("{} window", slot)))?,
        ),
        Target::Light { room, index } => Manipulable::Light(
            room_mut(house, room)?
                .light_mut(*index)
                .ok_or_else(|| missing_fixture(room, format!("light {}", index)))?,
        ),
        Target::YardLight => Manipulable::Light(house.yard_mut().light_mut()),
        Target::Thermostat { room, degrees } => Manipulable::Thermostat {
            room: room_mut(house, room)?,
            degrees: *degrees,
        },
        Target::AwayMode { enable } => Manipulable::AwayMode {
            house,
            away: &mut modes.away,
            enable: *enable,
        },
        Target::AwayLights { rooms, window } => Manipulable::AwayLights {
            house,
            away: &mut modes.away,
            rooms,
            window: *window,
        },
        Target::AwayDelay(delay) => Manipulable::AwayDelay {
            away: &mut modes.away,
            delay: *delay,
        },
        Target::AutoLight => Manipulable::AutoLight(&mut modes.auto_light),
    })
}
