use std::io;
use std::path::PathBuf;

use spleet_core::{JobId, RunSummary};
use thiserror::Error;

/// Notifications sent from the worker thread, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A job was separated; `completed` counts successes so far, starting at 1.
    Progress { job_id: JobId, completed: usize },
    /// A job could not be separated; the run carries on.
    JobFailed { job_id: JobId, reason: String },
    /// Always the last event of a run, sent exactly once.
    Completed(RunSummary),
}

#[derive(Debug, Error)]
pub enum SeparationError {
    #[error("source file not found: {}", .0.display())]
    MissingSource(PathBuf),
    #[error("could not start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("engine exited with {}: {stderr}", describe_code(.code))]
    ExitStatus { code: Option<i32>, stderr: String },
    /// Any other engine failure, including a panic inside `separate`.
    #[error("{0}")]
    Other(String),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}
