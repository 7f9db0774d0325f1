//! Parsing of action targets typed at the prompt

use anyhow::{bail, Context};
use chrono::NaiveTime;
use home::{AwayDelay, LightWindow, Target, WallSlot, YARD_LOCATION};
use rbac::Action;

/// Usage hint for an action's arguments
pub fn usage(action: Action) -> &'static str {
    match action {
        Action::ToggleDoorOpen | Action::ToggleDoorLock => "<room> <north|east|south|west>",
        Action::ToggleWindowOpen | Action::ToggleWindowObstruct => "<room> <north|east|south|west>",
        Action::ToggleLight => "<room> [index] | yard",
        Action::ToggleAutoLight => "",
        Action::SetAwayMode => "<on|off>",
        Action::SetAwayModeLights => "<HH:MM> <HH:MM> <room>...",
        Action::SetAwayModeDelay => "<millis>",
        Action::ChangeTemperature => "<room> <degrees>",
    }
}

/// Build the target for `action` from whitespace-separated arguments
pub fn parse_target(action: Action, args: &[&str]) -> anyhow::Result<Target> {
    let missing = || anyhow::anyhow!("usage: {} {}", action.token(), usage(action));

    let target = match action {
        Action::ToggleDoorOpen | Action::ToggleDoorLock => {
            let (room, slot) = room_and_slot(args).ok_or_else(missing)?;
            Target::Door { room, slot: slot? }
        }
        Action::ToggleWindowOpen | Action::ToggleWindowObstruct => {
            let (room, slot) = room_and_slot(args).ok_or_else(missing)?;
            Target::Window { room, slot: slot? }
        }
        Action::ToggleLight => match args {
            [location] if *location == YARD_LOCATION => Target::YardLight,
            [room] => Target::Light {
                room: room.to_string(),
                index: 0,
            },
            [room, index] => Target::Light {
                room: room.to_string(),
                index: index
                    .parse()
                    .with_context(|| format!("invalid light index '{}'", index))?,
            },
            _ => return Err(missing()),
        },
        Action::ToggleAutoLight => Target::AutoLight,
        Action::SetAwayMode => match args {
            ["on"] => Target::AwayMode { enable: true },
            ["off"] => Target::AwayMode { enable: false },
            _ => return Err(missing()),
        },
        Action::SetAwayModeLights => match args {
            [start, end, rooms @ ..] if !rooms.is_empty() => Target::AwayLights {
                rooms: rooms.iter().map(|r| r.to_string()).collect(),
                window: LightWindow::new(parse_time(start)?, parse_time(end)?),
            },
            _ => return Err(missing()),
        },
        Action::SetAwayModeDelay => match args {
            [millis] => {
                let millis: i64 = millis
                    .parse()
                    .with_context(|| format!("invalid delay '{}'", millis))?;
                Target::AwayDelay(AwayDelay::new(millis)?)
            }
            _ => return Err(missing()),
        },
        Action::ChangeTemperature => match args {
            [room, degrees] => {
                let value: f64 = degrees
                    .parse()
                    .with_context(|| format!("invalid temperature '{}'", degrees))?;
                if !value.is_finite() {
                    bail!("invalid temperature '{}': must be a finite number", degrees);
                }
                Target::Thermostat {
                    room: room.to_string(),
                    degrees: value,
                }
            }
            _ => return Err(missing()),
        },
    };
    Ok(target)
}

fn room_and_slot(args: &[&str]) -> Option<(String, anyhow::Result<WallSlot>)> {
    match args {
        [room, slot] => Some((
            room.to_string(),
            slot.parse::<WallSlot>()
                .map_err(|_| anyhow::anyhow!("invalid wall slot '{}'", slot)),
        )),
        _ => None,
    }
}

fn parse_time(s: &str) -> anyhow::Result<NaiveTime> {
    match NaiveTime::parse_from_str(s, "%H:%M") {
        Ok(time) => Ok(time),
        Err(_) => bail!("invalid time '{}', expected HH:MM", s),
    }
}
