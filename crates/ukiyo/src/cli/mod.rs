//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the ukiyo binary.

mod commands;
mod generate;
mod illustrate;
mod render;
mod stories;

pub use commands::{Cli, Commands, OutputFormat};
pub use generate::generate;
pub use illustrate::illustrate;
pub use stories::{list, migrate, show};
