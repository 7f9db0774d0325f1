//! Interactive REPL mode

use crate::commands::resolve_permission;
use crate::target::{parse_target, usage};
use anyhow::{anyhow, bail};
use console::style;
use home::{Outcome, Session};
use rbac::Action;
use shared::{LayoutSpec, ProfileDocument};
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Interactive CLI driving one session
pub struct InteractiveCli {
    session: Session,
}

impl InteractiveCli {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
        }
    }

    /// Start from an existing session, e.g. one with a layout already loaded
    pub fn with_session(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the interactive REPL
    pub fn run(&mut self) -> anyhow::Result<()> {
        println!("{}", style("Smart Home Interactive Mode").bold());
        println!("Type /help for commands, /quit to exit");
        println!();

        loop {
            let prompt = match (self.session.actor(), self.session.actor_location()) {
                (Some(actor), Some(location)) => format!("{}@{}", actor.name(), location),
                (Some(actor), None) => actor.name().to_string(),
                (None, _) => "no actor".to_string(),
            };
            print!("[{}] > ", prompt);
            io::stdout().flush()?;

            let mut input = String::new();
            if io::stdin().read_line(&mut input)? == 0 {
                break;
            }
            let input = input.trim();

            if input.is_empty() {
                continue;
            }

            if !input.starts_with('/') {
                println!("Commands start with '/'. Type /help for a list.");
                continue;
            }

            match self.handle_command(input) {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => println!("{} {}", style("Error:").red(), e),
            }
        }

        Ok(())
    }

    fn handle_command(&mut self, input: &str) -> anyhow::Result<bool> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");
        let args = parts.get(1..).unwrap_or(&[]);
        debug!(command = cmd, args = args.len(), "repl command");

        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Goodbye!");
                return Ok(true);
            }
            "/help" | "/h" => {
                println!("Commands:");
                println!("  /layout <file>                 - Load a house layout (JSON)");
                println!("  /profiles <file>               - Load person profiles (YAML)");
                println!("  /actor <name> <level> <place>  - Act as a person at a room or the yard");
                println!("  /login <name> <place>          - Act as a loaded profile");
                println!("  /move <place>                  - Move the actor");
                println!("  /add <name> <level> <place>    - Place someone else at a room or the yard");
                println!("  /remove <name>                 - Take someone out of the house and yard");
                println!("  /rooms                         - Show every room");
                println!("  /tour                          - Rooms in tour order");
                println!("  /menu                          - Actions the actor may attempt");
                println!("  /act <action> [args]           - Attempt an action");
                println!("  /allow <level> <action>        - Allow an action for a level");
                println!("  /disallow <level> <action>     - Disallow an action for a level");
                println!("  /audit [refused] [n]           - Recent attempts, optionally only refused ones");
                println!("  /export <file>                 - Write the audit trail as JSON");
                println!("  /status                        - Show current status");
                println!("  /quit                          - Exit");
            }
            "/layout" => {
                let [path] = args else { bail!("usage: /layout <file>") };
                let layout = LayoutSpec::from_file(Path::new(path))?;
                self.session.load_layout(&layout)?;
                println!(
                    "{} Loaded {} rooms",
                    style("✓").green(),
                    self.session.house().room_count()
                );
            }
            "/profiles" => {
                let [path] = args else { bail!("usage: /profiles <file>") };
                let document = ProfileDocument::from_file(Path::new(path))?;
                let count = self.session.load_profiles(&document)?;
                println!("{} Loaded {} profiles", style("✓").green(), count);
            }
            "/actor" => {
                let [name, level, location] = args else {
                    bail!("usage: /actor <name> <level> <place>")
                };
                let permission = resolve_permission(self.session.policy(), level)?;
                self.session.set_actor(name, permission, location)?;
                println!("Acting as {} ({}) at {}", name, level, location);
            }
            "/login" => {
                let [name, location] = args else { bail!("usage: /login <name> <place>") };
                self.session.set_actor_from_profile(name, location)?;
                println!("Acting as {} at {}", name, location);
            }
            "/move" => {
                let [location] = args else { bail!("usage: /move <place>") };
                self.session.move_actor(location)?;
                println!("Moved to {}", location);
            }
            "/add" => {
                let [name, level, location] = args else {
                    bail!("usage: /add <name> <level> <place>")
                };
                let permission = resolve_permission(self.session.policy(), level)?;
                self.session.add_person(name, permission, location)?;
                println!("Placed {} ({}) at {}", name, level, location);
            }
            "/remove" => {
                let [name] = args else { bail!("usage: /remove <name>") };
                if !self.session.remove_person(name) {
                    bail!("{} is not in the house or the yard", name);
                }
                println!("Removed {}", name);
            }
            "/rooms" => {
                let house = self.session.house();
                if house.room_count() == 0 {
                    println!("  (no rooms - load a layout with /layout)");
                }
                for (location, room) in house.rooms() {
                    let summary = room.summary(location);
                    println!(
                        "  {:<14} doors {} open {} locked, windows {} open {} obstructed, lights {}/{} on, {:.1}°C, people: {}",
                        location,
                        summary.open_doors,
                        summary.locked_doors,
                        summary.open_windows,
                        summary.obstructed_windows,
                        summary.lights_on,
                        summary.light_count,
                        summary.temperature,
                        if summary.occupants.is_empty() {
                            "-".to_string()
                        } else {
                            summary.occupants.join(", ")
                        }
                    );
                }
                let yard = house.yard();
                println!(
                    "  {:<14} light {}, people: {}",
                    "yard",
                    if yard.light().is_on() { "on" } else { "off" },
                    yard.occupants().join(", ")
                );
            }
            "/tour" => {
                for (step, location) in self.session.house().tour_order()?.iter().enumerate() {
                    println!("  {:>3}. {}", step + 1, location);
                }
            }
            "/menu" => {
                let menu = self.session.menu()?;
                if menu.is_empty() {
                    println!("  (no actions available)");
                }
                for entry in menu {
                    println!("{}", style(entry.module.display_name()).cyan());
                    for action in entry.actions {
                        println!("  {:<22} {}", action.token(), usage(action));
                    }
                }
            }
            "/act" => {
                let Some((token, rest)) = args.split_first() else {
                    bail!("usage: /act <action> [args]")
                };
                let action = Action::from_token(token)?;
                let target = parse_target(action, rest)?;
                let report = self.session.attempt(action, target)?;
                match &report.outcome {
                    Outcome::Applied(text) => println!("{} {}", style("✓").green(), text),
                    Outcome::Blocked(reason) => println!("{} blocked: {}", style("✗").yellow(), reason),
                    Outcome::Denied(err) => println!("{} {}", style("✗").red(), err),
                }
            }
            "/allow" | "/disallow" => {
                let [level, token] = args else { bail!("usage: {} <level> <action>", cmd) };
                let permission = resolve_permission(self.session.policy(), level)?;
                let action = Action::from_token(token)?;
                let changed = if cmd == "/allow" {
                    self.session.allow(&permission, action)
                } else {
                    self.session.disallow(&permission, action)
                };
                if changed {
                    println!("{} updated for {}", action.token(), level);
                } else {
                    println!("No change for {}", level);
                }
            }
            "/audit" => {
                let (refused_only, rest) = match args.split_first() {
                    Some((&"refused", rest)) => (true, rest),
                    _ => (false, args),
                };
                let limit = match rest {
                    [] => 10,
                    [n] => n.parse().map_err(|_| anyhow!("invalid count '{}'", n))?,
                    _ => bail!("usage: /audit [refused] [n]"),
                };
                let audit = self.session.audit();
                let entries = if refused_only {
                    audit.get_recent_refusals(limit)
                } else {
                    audit.get_recent(limit)
                };
                for entry in entries {
                    println!(
                        "  {} {:<10} {:<22} {} {}",
                        entry.timestamp,
                        entry.actor,
                        entry.action.as_deref().unwrap_or("-"),
                        if entry.success { "ok" } else { "refused" },
                        entry.reason.as_deref().unwrap_or("")
                    );
                }
            }
            "/export" => {
                let [path] = args else { bail!("usage: /export <file>") };
                let json = serde_json::to_string_pretty(&self.session.audit().export_json())?;
                std::fs::write(path, json)?;
                println!(
                    "{} Wrote {} audit entries to {}",
                    style("✓").green(),
                    self.session.audit().get_stats().total_entries,
                    path
                );
            }
            "/status" => {
                let house = self.session.house();
                let modes = self.session.modes();
                println!("Status:");
                match self.session.actor() {
                    Some(actor) => println!(
                        "  Actor: {} ({}) at {}",
                        actor.name(),
                        actor.permission(),
                        self.session.actor_location().unwrap_or("(nowhere)")
                    ),
                    None => println!("  Actor: none"),
                }
                println!("  Rooms: {}", house.room_count());
                println!("  People: {}", house.number_of_people());
                println!("  Away mode: {}", if modes.away.enabled { "on" } else { "off" });
                println!("  Auto light: {}", if modes.auto_light { "on" } else { "off" });
            }
            _ => {
                println!("Unknown command: {}", cmd);
            }
        }

        Ok(false)
    }
}

impl Default for InteractiveCli {
    fn default() -> Self {
        Self::new()
    }
}
