use std::path::PathBuf;

use crate::{Job, JobId, JobStatus, QueueError};

/// Ordered list of jobs. Insertion order is both display and processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQueue {
    jobs: Vec<Job>,
    next_id: JobId,
}

impl Default for JobQueue {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            next_id: 1,
        }
    }
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pending job. Duplicate paths become independent jobs.
    pub fn add(&mut self, source: impl Into<PathBuf>) -> JobId {
        let id = self.next_id;
        self.next_id += 1;
        self.jobs.push(Job::new(id, source));
        id
    }

    /// Removes the job at `index`, shifting later jobs down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<Job, QueueError> {
        if index >= self.jobs.len() {
            return Err(QueueError::IndexOutOfRange {
                index,
                len: self.jobs.len(),
            });
        }
        Ok(self.jobs.remove(index))
    }

    pub fn remove(&mut self, id: JobId) -> Result<Job, QueueError> {
        let index = self.position(id).ok_or(QueueError::UnknownJob(id))?;
        Ok(self.jobs.remove(index))
    }

    pub fn all(&self) -> &[Job] {
        &self.jobs
    }

    /// Owned copy handed to a run, so later queue edits never reach the worker.
    pub fn snapshot(&self) -> Vec<Job> {
        self.jobs.clone()
    }

    pub fn has_pending(&self) -> bool {
        self.jobs.iter().any(|job| job.status.is_pending())
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn position(&self, id: JobId) -> Option<usize> {
        self.jobs.iter().position(|job| job.id == id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Returns false if the job no longer exists.
    pub fn mark_finished(&mut self, id: JobId) -> bool {
        self.set_status(id, JobStatus::Finished)
    }

    pub fn mark_failed(&mut self, id: JobId, reason: impl Into<String>) -> bool {
        self.set_status(
            id,
            JobStatus::Failed {
                reason: reason.into(),
            },
        )
    }

    fn set_status(&mut self, id: JobId, status: JobStatus) -> bool {
        match self.jobs.iter_mut().find(|job| job.id == id) {
            Some(job) => {
                job.status = status;
                true
            }
            None => false,
        }
    }
}
