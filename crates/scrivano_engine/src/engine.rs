//! The single-worker scheduler.

use crate::{EngineConfig, Job, JobStatus, RunState};
use scrivano_client::ScriptGenerator;
use scrivano_error::{
    EngineError, EngineErrorKind, STOPPED_BY_USER, ScrivanoError, ScrivanoErrorKind,
    ScrivanoResult,
};
use scrivano_outline::parse;
use scrivano_storage::{SnapshotKey, SnapshotStore};
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Persistent job queue with a cooperative single-worker scheduler.
///
/// Exactly one job is in flight at a time; batches within a job are
/// sequential and jobs are sequential across the queue. The queue-wide
/// run-state and the access layer's pacing stamp are the only state shared
/// across logical tasks, and both are re-read at every suspension point.
///
/// The whole job collection is snapshotted after every mutation.
pub struct Engine<G> {
    generator: G,
    jobs: Mutex<Vec<Job>>,
    store: SnapshotStore,
    run_state: watch::Sender<RunState>,
    config: EngineConfig,
}

impl<G> std::fmt::Debug for Engine<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let jobs = self.jobs.lock().map(|j| j.len()).unwrap_or(0);
        f.debug_struct("Engine")
            .field("jobs", &jobs)
            .field("run_state", &*self.run_state.borrow())
            .finish_non_exhaustive()
    }
}

impl<G: ScriptGenerator> Engine<G> {
    /// Creates an engine over the generator, loading the persisted job
    /// collection.
    ///
    /// Jobs left RUNNING by a previous process (crash, kill) are swept to
    /// FAILED with the stopped message so their state is explicit and
    /// retryable.
    pub fn new(generator: G, store: SnapshotStore, config: EngineConfig) -> Self {
        let mut jobs: Vec<Job> = store.load(SnapshotKey::Jobs);

        let mut swept = 0;
        for job in jobs.iter_mut() {
            if *job.status() == JobStatus::Running {
                job.mark_failed(STOPPED_BY_USER);
                swept += 1;
            }
        }
        if swept > 0 {
            warn!(swept, "Swept interrupted RUNNING jobs to FAILED");
            persist(&store, &jobs);
        }

        let (run_state, _) = watch::channel(RunState::Idle);
        Self {
            generator,
            jobs: Mutex::new(jobs),
            store,
            run_state,
            config,
        }
    }

    /// Get a reference to the underlying generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    // ─── Queue surface (UI collaborator) ────────────────────────────────

    /// Enqueue a new PENDING job and return its id.
    #[instrument(skip(self, concept))]
    pub fn enqueue(
        &self,
        title: impl Into<String> + std::fmt::Debug,
        concept: impl Into<String>,
        duration_minutes: u32,
    ) -> Uuid {
        let job = Job::new(title, concept, duration_minutes);
        let id = *job.id();
        let mut jobs = self.jobs.lock().unwrap();
        jobs.push(job);
        persist(&self.store, &jobs);
        info!(job = %id, "Enqueued job");
        id
    }

    /// All jobs, most recently created first.
    pub fn jobs(&self) -> Vec<Job> {
        let mut jobs = self.jobs.lock().unwrap().clone();
        jobs.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        jobs
    }

    /// One job by id.
    pub fn job(&self, id: Uuid) -> Option<Job> {
        self.jobs.lock().unwrap().iter().find(|j| *j.id() == id).cloned()
    }

    /// Force a FAILED job back to PENDING; it resumes from whichever
    /// artifacts it already holds.
    pub fn retry(&self, id: Uuid) -> ScrivanoResult<()> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .iter_mut()
            .find(|j| *j.id() == id)
            .ok_or_else(|| EngineError::new(EngineErrorKind::JobNotFound(id.to_string())))?;

        if *job.status() != JobStatus::Failed {
            return Err(EngineError::new(EngineErrorKind::NotRetryable(id.to_string())).into());
        }

        job.mark_pending();
        persist(&self.store, &jobs);
        info!(job = %id, "Retrying job");
        Ok(())
    }

    /// Remove a job regardless of status. Confirmation is the caller's
    /// responsibility.
    pub fn delete(&self, id: Uuid) -> ScrivanoResult<()> {
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|j| *j.id() != id);
        if jobs.len() == before {
            return Err(EngineError::new(EngineErrorKind::JobNotFound(id.to_string())).into());
        }
        persist(&self.store, &jobs);
        info!(job = %id, "Deleted job");
        Ok(())
    }

    // ─── Run-state controls ─────────────────────────────────────────────

    /// The current queue-wide run-state.
    pub fn run_state(&self) -> RunState {
        *self.run_state.borrow()
    }

    /// Watch run-state changes.
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.run_state.subscribe()
    }

    /// Suspend the scheduler at its next check; the in-flight job stays
    /// RUNNING.
    pub fn pause(&self) {
        if self.run_state() == RunState::Running {
            info!("Automation paused");
            self.run_state.send_replace(RunState::Paused);
        }
    }

    /// Resume a paused scheduler.
    pub fn resume(&self) {
        if self.run_state() == RunState::Paused {
            info!("Automation resumed");
            self.run_state.send_replace(RunState::Running);
        }
    }

    /// Stop the queue: every currently-RUNNING job goes straight to FAILED
    /// with the fixed stopped message, and the run-state returns to IDLE.
    ///
    /// Cooperative: an in-flight provider call is not interrupted, but the
    /// next suspension-point check observes the new state and aborts.
    pub fn stop(&self) {
        info!("Automation stopped");
        self.run_state.send_replace(RunState::Idle);

        let mut jobs = self.jobs.lock().unwrap();
        let mut swept = false;
        for job in jobs.iter_mut() {
            if *job.status() == JobStatus::Running {
                job.mark_failed(STOPPED_BY_USER);
                swept = true;
            }
        }
        if swept {
            persist(&self.store, &jobs);
        }
    }

    // ─── Scheduler ──────────────────────────────────────────────────────

    /// Drain the queue until no PENDING job remains or a stop lands.
    ///
    /// A plain loop, one job at a time, oldest first. A failing job is
    /// isolated (FAILED with its message, queue continues immediately)
    /// while a finished job imposes the inter-job cooldown when more work
    /// remains. Returns with the run-state back at IDLE.
    #[instrument(skip(self))]
    pub async fn run(&self) {
        if self.run_state() == RunState::Running {
            warn!("Scheduler already running");
            return;
        }
        self.run_state.send_replace(RunState::Running);
        info!("Automation started");

        loop {
            if self.checkpoint().await.is_err() {
                break;
            }
            let Some(id) = self.pick_next() else {
                debug!("No pending jobs remain");
                break;
            };

            match self.drive(id).await {
                Ok(()) => {
                    self.with_job(id, |job| job.mark_done());
                    info!(job = %id, "Job complete");
                    if self.has_pending() {
                        self.cooldown().await;
                    }
                }
                Err(e) => {
                    let message = stage_error_message(&e);
                    warn!(job = %id, error = %message, "Job failed");
                    self.with_job(id, |job| job.mark_failed(message));
                }
            }
        }

        self.run_state.send_replace(RunState::Idle);
        info!("Automation idle");
    }

    /// Drive one job through its missing stages.
    ///
    /// Every stage consults the run-state first, so pause suspends here and
    /// stop aborts through the stopped failure path. Completed artifacts
    /// are never recomputed.
    async fn drive(&self, id: Uuid) -> ScrivanoResult<()> {
        // Outline stage.
        self.checkpoint().await?;
        if self.job_field(id, |j| j.raw_outline().is_none())? {
            let (title, concept, duration) = {
                let job = self.require_job(id)?;
                (
                    job.title().clone(),
                    job.concept().clone(),
                    *job.duration_minutes(),
                )
            };
            self.with_job(id, |job| job.set_task("Generating outline"));

            let raw = self
                .generator
                .generate_outline(&title, &concept, duration)
                .await?;
            let parsed = parse(&raw);
            if parsed.outlines.is_empty() {
                return Err(EngineError::new(EngineErrorKind::EmptyOutline).into());
            }
            debug!(job = %id, chapters = parsed.outlines.len(), "Outline parsed");
            self.with_job(id, |job| job.apply_outline(raw, parsed));
        }

        // Hook stage.
        self.checkpoint().await?;
        if self.job_field(id, |j| j.hook().is_none())? {
            let outline_text = self.job_field(id, |j| j.raw_outline().clone())?.unwrap_or_default();
            self.with_job(id, |job| job.set_task("Writing the hook"));

            let hook = self.generator.generate_hook(&outline_text).await?;
            self.with_job(id, |job| job.set_hook(hook));
        }

        // Chapter batches: plan once over the missing set, ascending ids,
        // then execute sequentially with a state check between batches.
        let missing = self.job_field(id, |j| j.missing_chapter_ids())?;
        let batches: Vec<Vec<u32>> = missing
            .chunks(self.config.batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();

        for batch_ids in batches {
            self.checkpoint().await?;
            let outline_text = self.job_field(id, |j| j.raw_outline().clone())?.unwrap_or_default();
            let chapters = self.job_field(id, |j| j.chapters_by_ids(&batch_ids))?;
            self.with_job(id, |job| job.set_task(batch_label(&batch_ids)));

            let segments = self
                .generator
                .generate_chapter_batch(&outline_text, &chapters)
                .await?;
            self.with_job(id, |job| {
                for (chapter, content) in chapters.iter().zip(segments) {
                    job.set_chapter_content(*chapter.id(), content);
                }
                job.recount_words();
            });
        }

        // A lenient under-delivering batch leaves its tail chapters empty;
        // surface that instead of declaring DONE, so retry re-requests
        // exactly the gaps.
        let still_missing = self.job_field(id, |j| j.missing_chapter_ids())?;
        if !still_missing.is_empty() {
            return Err(
                EngineError::new(EngineErrorKind::ChaptersMissing(still_missing.len())).into(),
            );
        }

        Ok(())
    }

    /// Block until the run-state allows work.
    ///
    /// Running returns immediately; Paused suspends on state-change
    /// notifications; Idle means a stop landed and surfaces as the
    /// stopped error.
    async fn checkpoint(&self) -> Result<(), EngineError> {
        let mut rx = self.run_state.subscribe();
        loop {
            let state = *rx.borrow_and_update();
            match state {
                RunState::Running => return Ok(()),
                RunState::Idle => {
                    return Err(EngineError::new(EngineErrorKind::StoppedByUser));
                }
                RunState::Paused => {
                    debug!("Paused; suspending until state changes");
                    if rx.changed().await.is_err() {
                        return Err(EngineError::new(EngineErrorKind::StoppedByUser));
                    }
                }
            }
        }
    }

    /// Sleep out the inter-job cooldown, waking early on a stop.
    async fn cooldown(&self) {
        info!(
            secs = self.config.job_cooldown.as_secs(),
            "Cooling down before the next job"
        );
        let mut rx = self.run_state.subscribe();
        let sleep = tokio::time::sleep(self.config.job_cooldown);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => break,
                changed = rx.changed() => {
                    if changed.is_err() || *rx.borrow() == RunState::Idle {
                        break;
                    }
                }
            }
        }
    }

    /// Oldest PENDING job, marked RUNNING under the lock.
    fn pick_next(&self) -> Option<Uuid> {
        let mut jobs = self.jobs.lock().unwrap();
        let id = jobs
            .iter()
            .filter(|j| *j.status() == JobStatus::Pending)
            .min_by_key(|j| *j.created_at())
            .map(|j| *j.id())?;

        if let Some(job) = jobs.iter_mut().find(|j| *j.id() == id) {
            job.mark_running();
        }
        persist(&self.store, &jobs);
        Some(id)
    }

    fn has_pending(&self) -> bool {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .any(|j| *j.status() == JobStatus::Pending)
    }

    /// Mutate one job and snapshot the collection.
    ///
    /// A missing id means the UI deleted the job mid-run; the mutation is
    /// dropped silently.
    fn with_job(&self, id: Uuid, f: impl FnOnce(&mut Job)) {
        let mut jobs = self.jobs.lock().unwrap();
        match jobs.iter_mut().find(|j| *j.id() == id) {
            Some(job) => f(job),
            None => {
                warn!(job = %id, "Job vanished mid-run; dropping update");
                return;
            }
        }
        persist(&self.store, &jobs);
    }

    /// Read one field of a job under the lock.
    fn job_field<T>(&self, id: Uuid, f: impl FnOnce(&Job) -> T) -> ScrivanoResult<T> {
        let jobs = self.jobs.lock().unwrap();
        jobs.iter()
            .find(|j| *j.id() == id)
            .map(f)
            .ok_or_else(|| EngineError::new(EngineErrorKind::JobNotFound(id.to_string())).into())
    }

    fn require_job(&self, id: Uuid) -> ScrivanoResult<Job> {
        self.job(id)
            .ok_or_else(|| EngineError::new(EngineErrorKind::JobNotFound(id.to_string())).into())
    }
}

/// Human-readable batch task label.
fn batch_label(ids: &[u32]) -> String {
    match (ids.first(), ids.last()) {
        (Some(first), Some(last)) if first != last => {
            format!("Writing chapters {first}-{last}")
        }
        (Some(only), _) => format!("Writing chapter {only}"),
        _ => "Writing chapters".to_string(),
    }
}

/// The message stored on a FAILED job: the inner error's own description,
/// without wrapper or location noise.
fn stage_error_message(err: &ScrivanoError) -> String {
    match err.kind() {
        ScrivanoErrorKind::Gateway(e) => e.kind.to_string(),
        ScrivanoErrorKind::Gemini(e) => e.kind.to_string(),
        ScrivanoErrorKind::Client(e) => e.kind.to_string(),
        ScrivanoErrorKind::Engine(e) => e.kind.to_string(),
        ScrivanoErrorKind::Storage(e) => e.kind.to_string(),
        ScrivanoErrorKind::Http(e) => e.message.clone(),
        ScrivanoErrorKind::Json(e) => e.message.clone(),
        ScrivanoErrorKind::Config(e) => e.message.clone(),
    }
}

/// Snapshot the collection, warning on failure; a lost snapshot costs
/// durability, not correctness of the in-memory run.
fn persist(store: &SnapshotStore, jobs: &[Job]) {
    if let Err(e) = store.save(SnapshotKey::Jobs, &jobs) {
        warn!(error = %e, "Failed to persist job collection");
    }
}
