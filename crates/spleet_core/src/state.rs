use std::path::PathBuf;

use crate::view_model::{AppViewModel, JobRowView};
use crate::{Job, JobId, JobQueue, QueueError, RunConfig, RunSummary, StemCount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    queue: JobQueue,
    stem_count: Option<StemCount>,
    output_dir: String,
    session: SessionState,
    completed_in_run: usize,
    cancel_requested: bool,
    progress_label: String,
    last_error: Option<QueueError>,
    last_summary: Option<RunSummary>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            jobs: self
                .queue
                .all()
                .iter()
                .map(|job| JobRowView {
                    job_id: job.id,
                    name: job.display_name(),
                    status: job.status.clone(),
                })
                .collect(),
            stem_count: self.stem_count,
            output_dir: self.output_dir.clone(),
            can_start: self.can_start(),
            completed: self.completed_in_run,
            progress_label: self.progress_label.clone(),
            last_error: self.last_error.as_ref().map(ToString::to_string),
            last_summary: self.last_summary.clone(),
            dirty: self.dirty,
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    pub fn stem_count(&self) -> Option<StemCount> {
        self.stem_count
    }

    pub fn last_error(&self) -> Option<&QueueError> {
        self.last_error.as_ref()
    }

    /// Mirrors the Spleet button: files queued, stems chosen, nothing running.
    pub fn can_start(&self) -> bool {
        self.session == SessionState::Idle && !self.queue.is_empty() && self.stem_count.is_some()
    }

    /// Returns true once if the state changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn record_error(&mut self, err: QueueError) {
        self.last_error = Some(err);
        self.mark_dirty();
    }

    fn ensure_idle(&self) -> Result<(), QueueError> {
        match self.session {
            SessionState::Idle => Ok(()),
            SessionState::Running => Err(QueueError::RunInProgress),
        }
    }

    pub(crate) fn add_files(&mut self, paths: Vec<PathBuf>) -> Result<Vec<JobId>, QueueError> {
        self.ensure_idle()?;
        let ids = paths.into_iter().map(|p| self.queue.add(p)).collect();
        self.last_error = None;
        self.mark_dirty();
        Ok(ids)
    }

    pub(crate) fn remove_job(&mut self, id: JobId) -> Result<Job, QueueError> {
        self.ensure_idle()?;
        let job = self.queue.remove(id)?;
        self.last_error = None;
        self.mark_dirty();
        Ok(job)
    }

    pub(crate) fn remove_row(&mut self, index: usize) -> Result<Job, QueueError> {
        self.ensure_idle()?;
        let job = self.queue.remove_at(index)?;
        self.last_error = None;
        self.mark_dirty();
        Ok(job)
    }

    pub(crate) fn select_stem_count(&mut self, stems: StemCount) -> Result<(), QueueError> {
        self.ensure_idle()?;
        self.stem_count = Some(stems);
        self.last_error = None;
        self.mark_dirty();
        Ok(())
    }

    pub(crate) fn set_output_dir(&mut self, dir: String) -> Result<(), QueueError> {
        self.ensure_idle()?;
        self.output_dir = dir;
        self.last_error = None;
        self.mark_dirty();
        Ok(())
    }

    /// Validates the configuration and moves to `Running`, returning the
    /// snapshot and config the worker should use.
    pub(crate) fn prepare_run(&mut self) -> Result<(Vec<Job>, RunConfig), QueueError> {
        self.ensure_idle()?;
        let config = RunConfig::new(self.stem_count, &self.output_dir)?;
        if self.queue.is_empty() {
            return Err(QueueError::InvalidConfig("job queue is empty".into()));
        }
        self.session = SessionState::Running;
        self.completed_in_run = 0;
        self.cancel_requested = false;
        self.progress_label = "Progress...".to_string();
        self.last_error = None;
        self.last_summary = None;
        self.mark_dirty();
        Ok((self.queue.snapshot(), config))
    }

    /// Returns true if a cancel should be sent to the worker.
    pub(crate) fn request_cancel(&mut self) -> bool {
        if self.session != SessionState::Running || self.cancel_requested {
            return false;
        }
        self.cancel_requested = true;
        self.progress_label = "Cancelling...".to_string();
        self.mark_dirty();
        true
    }

    pub(crate) fn apply_finished(&mut self, job_id: JobId, completed: usize) {
        if !self.queue.mark_finished(job_id) {
            log::warn!("finished job {job_id} is no longer queued");
        }
        self.completed_in_run = completed;
        self.progress_label = format!("Progress: {completed} files spleeted...");
        self.mark_dirty();
    }

    pub(crate) fn apply_failed(&mut self, job_id: JobId, reason: String) {
        if !self.queue.mark_failed(job_id, reason) {
            log::warn!("failed job {job_id} is no longer queued");
        }
        self.mark_dirty();
    }

    pub(crate) fn apply_completed(&mut self, summary: RunSummary) {
        self.session = SessionState::Idle;
        self.completed_in_run = summary.completed;
        self.cancel_requested = false;
        let mut label = format!("Finished: {} files spleeted.", summary.completed);
        if !summary.failures.is_empty() {
            label.push_str(&format!(" {} failed.", summary.failures.len()));
        }
        if summary.cancelled {
            label.push_str(" Cancelled.");
        }
        self.progress_label = label;
        self.last_summary = Some(summary);
        self.mark_dirty();
    }
}
