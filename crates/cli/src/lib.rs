//! # Smart Home CLI
//!
//! Sub-commands for inspecting layouts and policies, and an interactive
//! session for acting as a person inside a house.

pub mod commands;
pub mod interactive;
pub mod target;
