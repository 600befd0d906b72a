//! Command handlers.

use crate::cli::{KeyCommands, QueueCommands, ThumbnailCommands};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use scrivano::{
    Engine, Gateway, GeminiProvider, Job, KeyRing, ScriptClient, ScriptGenerator,
    ScrivanoSettings, SnapshotStore,
};
use std::io::Write as _;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Assemble the full stack from settings.
fn build_engine(
    settings: &ScrivanoSettings,
) -> Result<Engine<ScriptClient<GeminiProvider>>, Box<dyn std::error::Error>> {
    let store = SnapshotStore::new(&settings.storage.data_dir)?;
    let ring = KeyRing::with_store(store.clone());
    let gateway = Gateway::new(settings.gemini_provider(), ring, settings.pacing_gate());
    let client = ScriptClient::new(gateway);
    Ok(Engine::new(client, store, settings.engine_config()))
}

/// Drain the queue in the foreground.
///
/// Ctrl-C issues a cooperative stop: the in-flight call finishes, the job
/// fails with the stopped message, and the run-state returns to idle.
pub async fn handle_run(settings: &ScrivanoSettings) -> CliResult {
    let engine = Arc::new(build_engine(settings)?);

    {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received; stopping after the in-flight call");
                engine.stop();
            }
        });
    }

    engine.run().await;

    for job in engine.jobs() {
        print_job(&job);
    }
    Ok(())
}

/// Queue management.
pub fn handle_queue(settings: &ScrivanoSettings, command: QueueCommands) -> CliResult {
    let engine = build_engine(settings)?;

    match command {
        QueueCommands::Add {
            title,
            concept,
            duration,
        } => {
            let id = engine.enqueue(title, concept, duration);
            println!("Enqueued job {id}");
        }

        QueueCommands::List => {
            let jobs = engine.jobs();
            if jobs.is_empty() {
                println!("No jobs in the queue.");
            }
            for job in jobs {
                print_job(&job);
            }
        }

        QueueCommands::Show { id } => {
            let id = parse_id(&id)?;
            let job = engine
                .job(id)
                .ok_or_else(|| format!("no job with id {id}"))?;
            print_job(&job);

            if !job.outlines().is_empty() {
                let outline = scrivano::ParsedOutline {
                    refined_title: job
                        .refined_title()
                        .clone()
                        .unwrap_or_else(|| scrivano::DEFAULT_TITLE.to_string()),
                    outlines: job.outlines().clone(),
                };
                println!("\n{}", scrivano::render(&outline));
            }
            if let Some(hook) = job.hook() {
                println!("Hook:\n{hook}\n");
            }
            for chapter_id in job.missing_chapter_ids() {
                println!("Chapter {chapter_id}: not written yet");
            }
        }

        QueueCommands::Retry { id } => {
            let id = parse_id(&id)?;
            engine.retry(id)?;
            println!("Job {id} is pending again and will resume where it stopped.");
        }

        QueueCommands::Delete { id, yes } => {
            let id = parse_id(&id)?;
            if !yes && !confirm(&format!("Delete job {id}? [y/N] "))? {
                println!("Aborted.");
                return Ok(());
            }
            engine.delete(id)?;
            println!("Deleted job {id}.");
        }
    }
    Ok(())
}

/// Credential management.
pub fn handle_keys(settings: &ScrivanoSettings, command: KeyCommands) -> CliResult {
    let engine = build_engine(settings)?;
    let gateway = engine.generator().gateway();

    match command {
        KeyCommands::Add { key } => {
            gateway.with_ring(|ring| ring.add_key(key));
            let count = gateway.with_ring(|ring| ring.len());
            println!("Stored key; the ring now holds {count} key(s).");
        }

        KeyCommands::List => {
            let (keys, current) =
                gateway.with_ring(|ring| (ring.list().to_vec(), ring.current_index()));
            if keys.is_empty() {
                println!("No keys stored.");
            }
            for (index, key) in keys.iter().enumerate() {
                let marker = if index == current { "*" } else { " " };
                println!("{marker} [{index}] {}", mask(key));
            }
        }

        KeyCommands::Remove { index } => {
            match gateway.with_ring(|ring| ring.remove_key(index)) {
                Some(removed) => println!("Removed key {}", mask(&removed)),
                None => println!("No key at index {index}."),
            }
        }
    }
    Ok(())
}

/// Thumbnail generation for finished jobs.
pub async fn handle_thumbnail(settings: &ScrivanoSettings, command: ThumbnailCommands) -> CliResult {
    let engine = build_engine(settings)?;

    match command {
        ThumbnailCommands::Ideas { id } => {
            let (title, hook) = thumbnail_inputs(&engine, &id)?;
            let ideas = engine
                .generator()
                .generate_thumbnail_ideas(&title, &hook)
                .await?;
            println!("Image prompt: {}", ideas.image_prompt);
            println!("Overlay text: {}", ideas.overlay_text);
        }

        ThumbnailCommands::Image {
            id,
            no_overlay,
            out,
        } => {
            let (title, hook) = thumbnail_inputs(&engine, &id)?;
            let client = engine.generator();
            let ideas = client.generate_thumbnail_ideas(&title, &hook).await?;
            let uri = client
                .generate_thumbnail_image(
                    &ideas.image_prompt,
                    &ideas.overlay_text,
                    !no_overlay,
                    None,
                )
                .await?;

            match out {
                Some(path) => {
                    std::fs::write(&path, decode_data_uri(&uri)?)?;
                    println!("Wrote thumbnail to {}", path.display());
                }
                None => println!("{uri}"),
            }
        }
    }
    Ok(())
}

/// Refined title and hook of a job that has produced them.
fn thumbnail_inputs(
    engine: &Engine<ScriptClient<GeminiProvider>>,
    id: &str,
) -> Result<(String, String), Box<dyn std::error::Error>> {
    let id = parse_id(id)?;
    let job = engine
        .job(id)
        .ok_or_else(|| format!("no job with id {id}"))?;
    let title = job
        .refined_title()
        .clone()
        .unwrap_or_else(|| job.title().clone());
    let hook = job
        .hook()
        .clone()
        .ok_or_else(|| format!("job {id} has no hook yet; run the queue first"))?;
    Ok((title, hook))
}

fn print_job(job: &Job) {
    let progress = if *job.total_words() > 0 {
        format!("{}/{} words", job.words_written(), job.total_words())
    } else {
        "-".to_string()
    };
    let detail = match (job.current_task(), job.error()) {
        (Some(task), _) => task.clone(),
        (None, Some(error)) => format!("error: {error}"),
        _ => String::new(),
    };
    println!(
        "{}  {:7}  {:30}  {:>18}  {}",
        job.id(),
        job.status().to_string(),
        job.refined_title().as_deref().unwrap_or(job.title()),
        progress,
        detail
    );
}

fn parse_id(raw: &str) -> Result<Uuid, Box<dyn std::error::Error>> {
    Ok(Uuid::parse_str(raw).map_err(|e| format!("invalid job id '{raw}': {e}"))?)
}

/// Confirmation prompt; deletion is destructive and the confirmation step
/// belongs to the UI surface.
fn confirm(prompt: &str) -> Result<bool, Box<dyn std::error::Error>> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Show enough of a key to recognize it, never the whole secret.
fn mask(key: &str) -> String {
    if key.len() <= 8 {
        "********".to_string()
    } else {
        format!("{}…{}", &key[..4], &key[key.len() - 4..])
    }
}

/// Decode a `data:<mime>;base64,<payload>` URI to raw bytes.
fn decode_data_uri(uri: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let payload = uri
        .split_once(";base64,")
        .map(|(_, payload)| payload)
        .ok_or("unexpected data URI shape")?;
    Ok(BASE64.decode(payload)?)
}
