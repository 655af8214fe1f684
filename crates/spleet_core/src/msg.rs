use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked one or more audio files.
    FilesAdded(Vec<PathBuf>),
    /// User deleted a job by its id.
    RemoveJob(crate::JobId),
    /// User deleted the row at a display position.
    RemoveRow(usize),
    /// User chose 2, 4 or 5 stems.
    StemCountSelected(crate::StemCount),
    /// User picked an output directory; empty means the default.
    OutputDirChosen(String),
    /// User clicked Spleet.
    StartClicked,
    /// User asked the active run to stop before the next file.
    CancelClicked,
    /// Worker finished one job; `completed` counts successes so far in this run.
    JobFinished {
        job_id: crate::JobId,
        completed: usize,
    },
    /// Worker could not separate one job.
    JobFailed {
        job_id: crate::JobId,
        reason: String,
    },
    /// Terminal event of a run.
    RunCompleted(crate::RunSummary),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
