//! smarthome layout command

use clap::{Args, Subcommand};
use console::style;
use home::House;
use shared::LayoutSpec;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct LayoutCommand {
    #[command(subcommand)]
    pub command: LayoutSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum LayoutSubcommand {
    /// Validate a layout file
    Check {
        /// Layout JSON file
        path: PathBuf,
    },
    /// Print rooms in tour order from the root
    Tour {
        /// Layout JSON file
        path: PathBuf,
    },
    /// Print the state of every room as JSON
    Snapshot {
        /// Layout JSON file
        path: PathBuf,
    },
}

impl LayoutCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.command {
            LayoutSubcommand::Check { path } => {
                let house = load(path)?;
                println!(
                    "{} {} rooms, {} connections, root: {}",
                    style("✓").green(),
                    house.room_count(),
                    house.connection_count(),
                    house.root().unwrap_or("(none)")
                );
            }
            LayoutSubcommand::Tour { path } => {
                let house = load(path)?;
                for (step, location) in house.tour_order()?.iter().enumerate() {
                    println!("{:>3}. {}", step + 1, location);
                }
            }
            LayoutSubcommand::Snapshot { path } => {
                let house = load(path)?;
                println!("{}", serde_json::to_string_pretty(&house.snapshot()?)?);
            }
        }
        Ok(())
    }
}

/// Read a layout file and build its house
pub fn load(path: &Path) -> anyhow::Result<House> {
    let layout = LayoutSpec::from_file(path)?;
    Ok(House::from_layout(&layout)?)
}
