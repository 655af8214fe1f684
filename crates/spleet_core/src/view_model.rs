use crate::{JobId, JobStatus, RunSummary, SessionState, StemCount};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub jobs: Vec<JobRowView>,
    pub stem_count: Option<StemCount>,
    pub output_dir: String,
    pub can_start: bool,
    pub completed: usize,
    pub progress_label: String,
    pub last_error: Option<String>,
    pub last_summary: Option<RunSummary>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub name: String,
    pub status: JobStatus,
}
