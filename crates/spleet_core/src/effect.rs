#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a background run over a snapshot of the queue.
    StartRun {
        jobs: Vec<crate::Job>,
        config: crate::RunConfig,
    },
    /// Stop the active run before its next job.
    CancelRun,
}
