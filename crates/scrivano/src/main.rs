//! Scrivano CLI binary.
//!
//! Command-line surface standing in for the UI collaborator:
//! - enqueue, list, retry, and delete jobs
//! - run the scheduler in the foreground (Ctrl-C stops cooperatively)
//! - manage API credentials
//! - generate thumbnails for finished jobs

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, handle_keys, handle_queue, handle_run, handle_thumbnail};

    // Load .env before anything reads the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    scrivano::telemetry::init_console_telemetry(cli.verbose)?;

    let settings = match &cli.config {
        Some(path) => scrivano::ScrivanoSettings::from_file(path)?,
        None => scrivano::ScrivanoSettings::load()?,
    };

    match cli.command {
        Commands::Run => {
            handle_run(&settings).await?;
        }

        Commands::Queue(queue_cmd) => {
            handle_queue(&settings, queue_cmd)?;
        }

        Commands::Keys(key_cmd) => {
            handle_keys(&settings, key_cmd)?;
        }

        Commands::Thumbnail(thumbnail_cmd) => {
            handle_thumbnail(&settings, thumbnail_cmd).await?;
        }
    }

    Ok(())
}
