//! CLI surface.

mod commands;
mod run;

pub use commands::{Cli, Commands, KeyCommands, QueueCommands, ThumbnailCommands};
pub use run::{handle_keys, handle_queue, handle_run, handle_thumbnail};
