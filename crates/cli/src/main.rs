//! smarthome - Command-line interface for the smart home simulation
//!
//! Usage:
//!   smarthome                                 - Start interactive mode
//!   smarthome --layout house.json             - Start interactive mode with a layout
//!   smarthome layout check <file>             - Validate a layout
//!   smarthome layout tour <file>              - Print rooms in tour order
//!   smarthome layout snapshot <file>          - Print room state as JSON
//!   smarthome policy roles                    - List permission levels
//!   smarthome policy menu --level <level>     - Show the action menu for a level

use clap::{Parser, Subcommand};
use cli::commands::{LayoutCommand, PolicyCommand};
use cli::interactive::InteractiveCli;
use home::Session;
use shared::{LayoutSpec, ProfileDocument};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "smarthome")]
#[command(about = "Smart home simulation - rooms, fixtures and permissions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Layout to load before starting interactive mode
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Profiles to load before starting interactive mode
    #[arg(short, long)]
    profiles: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect house layouts
    Layout(LayoutCommand),
    /// Inspect permission levels
    Policy(PolicyCommand),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Layout(cmd)) => cmd.run(),
        Some(Commands::Policy(cmd)) => cmd.run(),
        None => {
            let mut session = Session::new();
            if let Some(path) = &cli.layout {
                session.load_layout(&LayoutSpec::from_file(path)?)?;
            }
            if let Some(path) = &cli.profiles {
                session.load_profiles(&ProfileDocument::from_file(path)?)?;
            }
            let mut interactive = InteractiveCli::with_session(session);
            interactive.run()
        }
    }
}
