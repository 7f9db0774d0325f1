//! smarthome policy command

use anyhow::Context;
use clap::{Args, Subcommand};
use console::style;
use rbac::{ModuleCatalog, Permission, PermissionLevel, PolicyTable, ProfileSet};
use shared::{HomeError, ProfileDocument};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct PolicyCommand {
    #[command(subcommand)]
    pub command: PolicySubcommand,
}

#[derive(Debug, Subcommand)]
pub enum PolicySubcommand {
    /// List permission levels and their allowed actions
    Roles {
        /// Profile YAML file adding custom levels
        #[arg(short, long)]
        profiles: Option<PathBuf>,
    },
    /// Show the action menu for a level
    Menu {
        /// Level name (Parent, Child, Guest, Stranger or a custom level)
        #[arg(short, long)]
        level: String,

        /// Profile YAML file adding custom levels
        #[arg(short, long)]
        profiles: Option<PathBuf>,
    },
    /// List the people in a profile file
    Profiles {
        /// Profile YAML file
        path: PathBuf,
    },
}

impl PolicyCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.command {
            PolicySubcommand::Roles { profiles } => {
                let table = table_with(profiles.as_deref())?;
                let custom = table.custom_levels().into_iter().cloned();
                for level in PermissionLevel::FIXED.into_iter().chain(custom) {
                    let actions = table.allowed_actions(&level);
                    println!("{} ({})", style(level.name()).bold(), actions.len());
                    for action in actions {
                        println!("  - {}", action.token());
                    }
                }
            }
            PolicySubcommand::Menu { level, profiles } => {
                let table = table_with(profiles.as_deref())?;
                let permission = resolve_permission(&table, level)?;
                let menu = ModuleCatalog::new().menu_for(&permission, &table);
                if menu.is_empty() {
                    println!("{} has no available actions", style(level).bold());
                }
                for entry in menu {
                    println!("{}", style(entry.module.display_name()).cyan());
                    for action in entry.actions {
                        println!("  {:<22} {}", action.token(), action.label());
                    }
                }
            }
            PolicySubcommand::Profiles { path } => {
                let mut table = PolicyTable::new();
                let profiles = load_profiles(path, &mut table)?;
                for (name, permission) in profiles.iter() {
                    println!("{:<16} {}", name, permission);
                }
            }
        }
        Ok(())
    }
}

fn table_with(profiles: Option<&Path>) -> anyhow::Result<PolicyTable> {
    let mut table = PolicyTable::new();
    if let Some(path) = profiles {
        load_profiles(path, &mut table)?;
    }
    Ok(table)
}

fn load_profiles(path: &Path, table: &mut PolicyTable) -> anyhow::Result<ProfileSet> {
    let document = ProfileDocument::from_file(path)
        .with_context(|| format!("failed to read profiles from {}", path.display()))?;
    Ok(ProfileSet::from_document(&document, table)?)
}

/// Resolve a level name to a permission: a built-in level, or a custom level
/// registered in `table`
pub fn resolve_permission(table: &PolicyTable, name: &str) -> anyhow::Result<Permission> {
    if let Ok(level) = PermissionLevel::from_fixed_token(name) {
        return Ok(Permission::new(level));
    }
    table
        .custom_levels()
        .into_iter()
        .find(|level| level.name() == name)
        .map(|level| Permission::new(level.clone()))
        .ok_or_else(|| HomeError::UnknownPermissionLevel(name.to_string()).into())
}
