//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use mediashelf_storage::MediaKind;
use std::path::PathBuf;

/// mediashelf - filesystem media collections
#[derive(Parser, Debug)]
#[command(name = "mediashelf")]
#[command(about = "Browse, create and delete filesystem media collections", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults: bundled, ~/.config/mediashelf, ./mediashelf.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List collections
    List {
        /// Media kind to list (image or video); all kinds when omitted
        kind: Option<MediaKind>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Show one collection in detail
    Show {
        /// Media kind (image or video)
        kind: MediaKind,

        /// Collection id
        id: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Create a collection from local files
    Create {
        /// Media kind of the uploaded files
        #[arg(long, default_value = "image")]
        kind: MediaKind,

        /// Collection title; the id is derived from it
        #[arg(long)]
        title: String,

        /// Artist credit
        #[arg(long, default_value = "")]
        artist: String,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Description
        #[arg(long, default_value = "")]
        description: String,

        /// Dedicated thumbnail image
        #[arg(long)]
        thumbnail: Option<PathBuf>,

        /// Asset files, in presentation order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Delete a collection and everything in it
    Delete {
        /// Media kind (image or video)
        kind: MediaKind,

        /// Collection id
        id: String,
    },
}

/// Output format for read commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
