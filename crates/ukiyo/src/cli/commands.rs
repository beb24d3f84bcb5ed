//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// ukiyo - manga story generation with provider fallback
#[derive(Parser, Debug)]
#[command(name = "ukiyo")]
#[command(about = "Generate, store and illustrate manga stories", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra configuration file, applied above ./ukiyo.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a story from a prompt
    Generate {
        /// What the story should be about
        prompt: String,

        /// Also illustrate the story into this directory
        #[arg(long, value_name = "DIR")]
        illustrate: Option<PathBuf>,

        /// Output format for the finished story
        #[arg(long, default_value = "human")]
        format: OutputFormat,

        /// Keep the story in memory instead of PostgreSQL; it is gone when the command exits
        #[arg(long)]
        memory: bool,
    },

    /// Show a stored story page by page
    Show {
        /// Story id
        id: i32,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// List recent stories
    List {
        /// Maximum number of stories to display
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Illustrate every block of a stored story
    Illustrate {
        /// Story id
        id: i32,

        /// Directory for the panel PNG files
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },

    /// Apply pending database migrations
    Migrate,
}

/// Output format for story data
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// JSON
    Json,
}
