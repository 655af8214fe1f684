use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::JobId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedJob {
    pub job_id: JobId,
    pub source: PathBuf,
    pub reason: String,
}

/// Outcome of one run, carried by the completion event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub completed: usize,
    pub failures: Vec<FailedJob>,
    /// True if the run stopped early because it was cancelled.
    pub cancelled: bool,
}

impl RunSummary {
    pub fn failed_sources(&self) -> Vec<PathBuf> {
        self.failures.iter().map(|f| f.source.clone()).collect()
    }
}
