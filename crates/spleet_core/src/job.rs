use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Stable identifier assigned by the queue when a job is added.
pub type JobId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Finished,
    Failed { reason: String },
}

impl JobStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::Finished => "Finished",
            JobStatus::Failed { .. } => "Failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Failed { reason } => write!(f, "Failed ({reason})"),
            other => f.write_str(other.label()),
        }
    }
}

/// One queued audio file and where it stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub source: PathBuf,
    pub status: JobStatus,
}

impl Job {
    pub fn new(id: JobId, source: impl Into<PathBuf>) -> Self {
        Self {
            id,
            source: source.into(),
            status: JobStatus::Pending,
        }
    }

    /// Text after the last path separator, used as the row label.
    pub fn display_name(&self) -> String {
        display_name(&self.source)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    let raw = path.to_string_lossy();
    match raw.rfind(['/', '\\']) {
        Some(pos) => raw[pos + 1..].to_string(),
        None => raw.into_owned(),
    }
}
