//! Spleet engine: separation backend, batch worker and run lifecycle.
mod engine;
mod persist;
mod separate;
mod types;
mod worker;

pub use engine::RunHandle;
pub use persist::{
    ensure_output_dir, write_run_report, AtomicFileWriter, PersistError, REPORT_FILENAME,
};
pub use separate::{SeparationEngine, SpleeterEngine, SpleeterSettings};
pub use types::{EngineEvent, SeparationError};
pub use worker::{BatchWorker, CancelToken, ChannelEventSink, EventSink};
