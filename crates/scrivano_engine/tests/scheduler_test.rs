//! Scheduler behavior over a scripted generator.

use async_trait::async_trait;
use scrivano_client::{ReferenceImage, ScriptGenerator, ThumbnailIdeas};
use scrivano_core::ChapterOutline;
use scrivano_engine::{Engine, EngineConfig, HOOK_WORD_ESTIMATE, Job, JobStatus, RunState};
use scrivano_error::{GatewayError, STOPPED_BY_USER, ScrivanoResult};
use scrivano_storage::{SnapshotKey, SnapshotStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Generator that replays canned outlines by working title, records every
/// call with its issue time, and can gate each call on an external signal.
struct MockGenerator {
    outlines: HashMap<String, String>,
    fail_batches: Mutex<bool>,
    calls: Mutex<Vec<(String, Instant)>>,
    gate: Option<Gate>,
}

struct Gate {
    started: mpsc::UnboundedSender<String>,
    proceed: tokio::sync::Mutex<mpsc::UnboundedReceiver<()>>,
}

impl MockGenerator {
    fn new() -> Self {
        Self {
            outlines: HashMap::new(),
            fail_batches: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    fn with_outline(mut self, title: &str, outline: String) -> Self {
        self.outlines.insert(title.to_string(), outline);
        self
    }

    fn gated(mut self) -> (Self, mpsc::UnboundedReceiver<String>, mpsc::UnboundedSender<()>) {
        let (started_tx, started_rx) = mpsc::unbounded_channel();
        let (proceed_tx, proceed_rx) = mpsc::unbounded_channel();
        self.gate = Some(Gate {
            started: started_tx,
            proceed: tokio::sync::Mutex::new(proceed_rx),
        });
        (self, started_rx, proceed_tx)
    }

    fn labels(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(l, _)| l.clone()).collect()
    }

    fn call_times(&self) -> Vec<(String, Instant)> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, label: String) {
        self.calls.lock().unwrap().push((label.clone(), Instant::now()));
        if let Some(gate) = &self.gate {
            let _ = gate.started.send(label);
            let _ = gate.proceed.lock().await.recv().await;
        }
    }
}

/// Canonical wire-format outline with `chapters` 100-word chapters.
fn outline_text(chapters: u32) -> String {
    let mut text = "Title: Refined\nChapter 0: The Hook\nhook concept\n".to_string();
    for id in 1..=chapters {
        text.push_str(&format!(
            "Chapter {id}: Part {id}\n(Word Count: 100 words)\nConcept: concept {id}\n"
        ));
    }
    text
}

#[async_trait]
impl ScriptGenerator for MockGenerator {
    async fn generate_outline(
        &self,
        title: &str,
        _concept: &str,
        _duration_minutes: u32,
    ) -> ScrivanoResult<String> {
        self.record(format!("outline:{title}")).await;
        Ok(self
            .outlines
            .get(title)
            .cloned()
            .unwrap_or_else(|| outline_text(2)))
    }

    async fn generate_hook(&self, _outline_text: &str) -> ScrivanoResult<String> {
        self.record("hook".to_string()).await;
        Ok("hook words here".to_string())
    }

    async fn generate_chapter_batch(
        &self,
        _outline_text: &str,
        chapters: &[ChapterOutline],
    ) -> ScrivanoResult<Vec<String>> {
        let ids: Vec<u32> = chapters.iter().map(|c| *c.id()).collect();
        self.record(format!("batch:{ids:?}")).await;

        if *self.fail_batches.lock().unwrap() {
            return Err(GatewayError::all_failed("boom").into());
        }
        Ok(ids
            .iter()
            .map(|id| format!("content for chapter {id}"))
            .collect())
    }

    async fn generate_thumbnail_ideas(
        &self,
        _title: &str,
        _hook: &str,
    ) -> ScrivanoResult<ThumbnailIdeas> {
        unreachable!("thumbnails are not scheduler stages");
    }

    async fn generate_thumbnail_image(
        &self,
        _prompt: &str,
        _overlay_text: &str,
        _add_overlay: bool,
        _base_image: Option<&ReferenceImage>,
    ) -> ScrivanoResult<String> {
        unreachable!("thumbnails are not scheduler stages");
    }
}

fn fresh_store() -> (tempfile::TempDir, SnapshotStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path()).unwrap();
    (dir, store)
}

fn quick_config() -> EngineConfig {
    EngineConfig::default().with_job_cooldown(Duration::ZERO)
}

#[tokio::test]
async fn drives_a_job_through_all_stages() {
    let (_dir, store) = fresh_store();
    let generator = MockGenerator::new().with_outline("My Story", outline_text(4));
    let engine = Engine::new(generator, store.clone(), quick_config());

    let id = engine.enqueue("My Story", "a tale of tides", 30);
    engine.run().await;

    let job = engine.job(id).unwrap();
    assert_eq!(*job.status(), JobStatus::Done);
    assert_eq!(job.refined_title().as_deref(), Some("Refined"));
    assert_eq!(job.hook().as_deref(), Some("hook words here"));
    for chapter_id in 1..=4u32 {
        assert!(!job.chapters_content()[chapter_id as usize].is_empty());
    }
    assert!(job.current_task().is_none());
    assert!(job.error().is_none());

    // 4 chapters at 100 words plus the fixed hook estimate.
    assert_eq!(*job.total_words(), 400 + HOOK_WORD_ESTIMATE);
    // "hook words here" = 3; each chapter text = 4 words.
    assert_eq!(*job.words_written(), 3 + 4 * 4);

    assert_eq!(
        engine.generator().labels(),
        vec![
            "outline:My Story".to_string(),
            "hook".to_string(),
            "batch:[1, 2, 3]".to_string(),
            "batch:[4]".to_string(),
        ]
    );
    assert_eq!(engine.run_state(), RunState::Idle);

    // The DONE state survived to the snapshot.
    let persisted: Vec<Job> = store.load(SnapshotKey::Jobs);
    assert_eq!(*persisted[0].status(), JobStatus::Done);
}

#[tokio::test]
async fn empty_outline_fails_the_job_but_not_the_queue() {
    let (_dir, store) = fresh_store();
    let generator = MockGenerator::new()
        .with_outline("Bad", "garbage text with no markers".to_string())
        .with_outline("Good", outline_text(2));
    let engine = Engine::new(generator, store, quick_config());

    let bad = engine.enqueue("Bad", "c", 10);
    let good = engine.enqueue("Good", "c", 10);
    engine.run().await;

    let bad_job = engine.job(bad).unwrap();
    assert_eq!(*bad_job.status(), JobStatus::Failed);
    assert_eq!(
        bad_job.error().as_deref(),
        Some("Outline response produced no chapters")
    );
    // Nothing was persisted for the failed stage, so retry re-requests it.
    assert!(bad_job.raw_outline().is_none());

    let good_job = engine.job(good).unwrap();
    assert_eq!(*good_job.status(), JobStatus::Done);
}

#[tokio::test]
async fn resume_requests_only_missing_chapters() {
    let (_dir, store) = fresh_store();

    // A job interrupted after outline, hook, and chapters 1 and 3.
    let mut job = Job::new("My Story", "c", 30);
    let raw = outline_text(3);
    job.apply_outline(raw.clone(), scrivano_outline::parse(&raw));
    job.set_hook("already written hook".to_string());
    job.set_chapter_content(1, "chapter one stands".to_string());
    job.set_chapter_content(3, "chapter three stands".to_string());
    let id = *job.id();
    store.save(SnapshotKey::Jobs, &vec![job]).unwrap();

    let engine = Engine::new(MockGenerator::new(), store, quick_config());
    engine.run().await;

    // Outline and hook were never recomputed; only chapter 2 was requested.
    assert_eq!(engine.generator().labels(), vec!["batch:[2]".to_string()]);

    let job = engine.job(id).unwrap();
    assert_eq!(*job.status(), JobStatus::Done);
    assert_eq!(job.hook().as_deref(), Some("already written hook"));
    assert_eq!(job.chapters_content()[1], "chapter one stands");
    assert_eq!(job.chapters_content()[2], "content for chapter 2");
    assert_eq!(job.chapters_content()[3], "chapter three stands");
}

#[tokio::test]
async fn stop_mid_batch_keeps_written_chapters_and_fails_the_job() {
    let (_dir, store) = fresh_store();
    let (generator, mut started, proceed) =
        MockGenerator::new().with_outline("T", outline_text(6)).gated();
    let engine = Arc::new(Engine::new(generator, store, quick_config()));
    let id = engine.enqueue("T", "c", 60);

    let runner = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.run().await })
    };

    // Let outline, hook, and the first batch start.
    assert_eq!(started.recv().await.unwrap(), "outline:T");
    proceed.send(()).unwrap();
    assert_eq!(started.recv().await.unwrap(), "hook");
    proceed.send(()).unwrap();
    assert_eq!(started.recv().await.unwrap(), "batch:[1, 2, 3]");

    // Stop lands while the batch call is in flight; the call is not
    // interrupted, the next suspension-point check aborts the job.
    engine.stop();
    proceed.send(()).unwrap();
    runner.await.unwrap();

    let job = engine.job(id).unwrap();
    assert_eq!(*job.status(), JobStatus::Failed);
    assert_eq!(job.error().as_deref(), Some(STOPPED_BY_USER));

    // The in-flight batch's contents were spliced before the abort.
    assert_eq!(job.chapters_content()[1], "content for chapter 1");
    assert_eq!(job.chapters_content()[3], "content for chapter 3");
    assert!(job.chapters_content()[4].is_empty());
    assert!(job.hook().is_some());
    assert_eq!(engine.run_state(), RunState::Idle);
}

#[tokio::test]
async fn pause_suspends_before_the_next_stage() {
    let (_dir, store) = fresh_store();
    let (generator, mut started, proceed) =
        MockGenerator::new().with_outline("T", outline_text(2)).gated();
    let engine = Arc::new(Engine::new(generator, store, quick_config()));
    engine.enqueue("T", "c", 20);

    let runner = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.run().await })
    };

    assert_eq!(started.recv().await.unwrap(), "outline:T");
    engine.pause();
    proceed.send(()).unwrap();

    // The hook stage must not start while paused.
    let waited = tokio::time::timeout(Duration::from_millis(100), started.recv()).await;
    assert!(waited.is_err(), "stage started while paused");
    assert_eq!(engine.run_state(), RunState::Paused);

    // Resume wakes the scheduler through the watch channel, no polling.
    engine.resume();
    assert_eq!(started.recv().await.unwrap(), "hook");

    // Let the rest of the job drain.
    proceed.send(()).unwrap();
    assert_eq!(started.recv().await.unwrap(), "batch:[1, 2]");
    proceed.send(()).unwrap();
    runner.await.unwrap();

    let jobs = engine.jobs();
    assert_eq!(*jobs[0].status(), JobStatus::Done);
}

#[tokio::test(start_paused = true)]
async fn cooldown_separates_consecutive_jobs() {
    let (_dir, store) = fresh_store();
    let generator = MockGenerator::new()
        .with_outline("First", outline_text(1))
        .with_outline("Second", outline_text(1));
    let config = EngineConfig::default().with_job_cooldown(Duration::from_secs(300));
    let engine = Engine::new(generator, store, config);

    engine.enqueue("First", "c", 10);
    engine.enqueue("Second", "c", 10);
    engine.run().await;

    let times = engine.generator().call_times();
    let first_done = times
        .iter()
        .find(|(l, _)| l == "batch:[1]")
        .map(|(_, t)| *t)
        .unwrap();
    let second_start = times
        .iter()
        .find(|(l, _)| l == "outline:Second")
        .map(|(_, t)| *t)
        .unwrap();

    assert!(second_start - first_done >= Duration::from_secs(300));

    // FIFO: the older job ran first.
    let labels = engine.generator().labels();
    assert_eq!(labels[0], "outline:First");
}

#[tokio::test]
async fn retry_resumes_from_retained_artifacts() {
    let (_dir, store) = fresh_store();
    let generator = MockGenerator::new().with_outline("T", outline_text(2));
    *generator.fail_batches.lock().unwrap() = true;
    let engine = Engine::new(generator, store, quick_config());

    let id = engine.enqueue("T", "c", 20);
    engine.run().await;

    let job = engine.job(id).unwrap();
    assert_eq!(*job.status(), JobStatus::Failed);
    assert_eq!(
        job.error().as_deref(),
        Some("All API credentials failed; last error: boom")
    );
    // Artifacts from completed stages survived the failure.
    assert!(job.raw_outline().is_some());
    assert!(job.hook().is_some());

    // Retry flips FAILED back to PENDING and resumes at the failed stage.
    *engine.generator().fail_batches.lock().unwrap() = false;
    engine.retry(id).unwrap();
    assert_eq!(*engine.job(id).unwrap().status(), JobStatus::Pending);
    engine.run().await;

    let job = engine.job(id).unwrap();
    assert_eq!(*job.status(), JobStatus::Done);

    let labels = engine.generator().labels();
    // One outline, one hook, then the failed batch and its retry.
    assert_eq!(
        labels,
        vec![
            "outline:T".to_string(),
            "hook".to_string(),
            "batch:[1, 2]".to_string(),
            "batch:[1, 2]".to_string(),
        ]
    );
}

#[tokio::test]
async fn delete_removes_any_status_and_listing_is_recent_first() {
    let (_dir, store) = fresh_store();
    let engine = Engine::new(MockGenerator::new(), store, quick_config());

    let first = engine.enqueue("First", "c", 10);
    let second = engine.enqueue("Second", "c", 10);

    let listed = engine.jobs();
    assert_eq!(listed[0].title(), "Second");
    assert_eq!(listed[1].title(), "First");

    // Retry only applies to FAILED jobs.
    assert!(engine.retry(second).is_err());

    engine.delete(first).unwrap();
    assert!(engine.job(first).is_none());
    assert!(engine.delete(first).is_err());
}

#[tokio::test]
async fn interrupted_running_jobs_are_swept_on_load() {
    let (_dir, store) = fresh_store();

    let mut job = Job::new("T", "c", 10);
    job.mark_running();
    let id = *job.id();
    store.save(SnapshotKey::Jobs, &vec![job]).unwrap();

    let engine = Engine::new(MockGenerator::new(), store, quick_config());
    let job = engine.job(id).unwrap();
    assert_eq!(*job.status(), JobStatus::Failed);
    assert_eq!(job.error().as_deref(), Some(STOPPED_BY_USER));
}
