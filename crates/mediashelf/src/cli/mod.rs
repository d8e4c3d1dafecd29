//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the mediashelf binary.

mod commands;
mod handlers;

pub use commands::{Cli, Commands, OutputFormat};
pub use handlers::handle_command;
