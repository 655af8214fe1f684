use thiserror::Error;

use crate::JobId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("invalid run configuration: {0}")]
    InvalidConfig(String),
    #[error("index {index} out of range for queue of {len} jobs")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no job with id {0}")]
    UnknownJob(JobId),
    #[error("a run is already in progress")]
    RunInProgress,
}
