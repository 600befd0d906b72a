//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scrivano - unattended multi-stage script generation with a persistent job queue
#[derive(Parser, Debug)]
#[command(name = "scrivano")]
#[command(about = "Queue and run multi-stage script-generation jobs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use a specific configuration file instead of the search path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drain the job queue in the foreground (Ctrl-C stops cooperatively)
    Run,

    /// Job queue management
    #[command(subcommand)]
    Queue(QueueCommands),

    /// API credential management
    #[command(subcommand)]
    Keys(KeyCommands),

    /// Thumbnail generation for finished jobs
    #[command(subcommand)]
    Thumbnail(ThumbnailCommands),
}

/// Queue management subcommands
#[derive(Subcommand, Debug)]
pub enum QueueCommands {
    /// Enqueue a new job
    Add {
        /// Working title for the story
        #[arg(long)]
        title: String,

        /// Free-text story concept
        #[arg(long)]
        concept: String,

        /// Target narration length in minutes
        #[arg(long, default_value = "30")]
        duration: u32,
    },

    /// List jobs, most recent first
    List,

    /// Show one job in full: outline, hook, and chapter progress
    Show {
        /// Job id
        id: String,
    },

    /// Force a failed job back to pending; it resumes where it stopped
    Retry {
        /// Job id
        id: String,
    },

    /// Delete a job regardless of status
    Delete {
        /// Job id
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Credential management subcommands
#[derive(Subcommand, Debug)]
pub enum KeyCommands {
    /// Append an API key to the ring
    Add {
        /// The API key value
        key: String,
    },

    /// List stored keys (masked) and the current cursor
    List,

    /// Remove the key at the given position
    Remove {
        /// Zero-based key position
        index: usize,
    },
}

/// Thumbnail subcommands
#[derive(Subcommand, Debug)]
pub enum ThumbnailCommands {
    /// Generate an image prompt and overlay text for a job
    Ideas {
        /// Job id
        id: String,
    },

    /// Generate a thumbnail image for a job
    Image {
        /// Job id
        id: String,

        /// Skip rendering the overlay text onto the image
        #[arg(long)]
        no_overlay: bool,

        /// Write the decoded image here instead of printing the data URI
        #[arg(long)]
        out: Option<PathBuf>,
    },
}
