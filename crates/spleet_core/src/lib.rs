//! Spleet core: job queue model and the pure controller state machine.
mod config;
mod effect;
mod error;
mod job;
mod msg;
mod queue;
mod state;
mod summary;
mod update;
mod view_model;

pub use config::{RunConfig, StemCount, DEFAULT_OUTPUT_DIR};
pub use effect::Effect;
pub use error::QueueError;
pub use job::{Job, JobId, JobStatus};
pub use msg::Msg;
pub use queue::JobQueue;
pub use state::{AppState, SessionState};
pub use summary::{FailedJob, RunSummary};
pub use update::update;
pub use view_model::{AppViewModel, JobRowView};
