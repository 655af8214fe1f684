use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use engine_logging::{engine_error, engine_info};
use spleet_core::{Job, QueueError, RunConfig};

use crate::persist::ensure_output_dir;
use crate::worker::{BatchWorker, CancelToken, ChannelEventSink};
use crate::{EngineEvent, SeparationEngine};

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// One live background run. The controller owns at most one of these.
///
/// The worker thread works on its own copy of the jobs; status changes reach
/// the controller only as [`EngineEvent`]s.
pub struct RunHandle {
    run_id: u64,
    config: RunConfig,
    cancel: CancelToken,
    event_rx: mpsc::Receiver<EngineEvent>,
    thread: Option<JoinHandle<Vec<Job>>>,
}

impl RunHandle {
    /// Spawns the worker thread. An empty job list is refused with
    /// `InvalidConfig` before anything starts.
    pub fn start(
        engine: Arc<dyn SeparationEngine>,
        jobs: Vec<Job>,
        config: RunConfig,
    ) -> Result<Self, QueueError> {
        if jobs.is_empty() {
            return Err(QueueError::InvalidConfig("job queue is empty".into()));
        }

        let run_id = NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed);
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancelToken::new();

        let worker_cancel = cancel.clone();
        let worker_config = config.clone();
        let thread = thread::Builder::new()
            .name("spleet-worker".to_string())
            .spawn(move || {
                engine_logging::set_run_id(run_id);
                run_worker(engine, jobs, &worker_config, event_tx, &worker_cancel)
            })
            .map_err(|err| QueueError::InvalidConfig(format!("could not spawn worker: {err}")))?;

        engine_info!("started run {} on worker thread", run_id);
        Ok(Self {
            run_id,
            config,
            cancel,
            event_rx,
            thread: Some(thread),
        })
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Asks the worker to stop before its next job.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Non-blocking drain, for callers that must stay responsive.
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event; `None` once the worker is gone and every
    /// event has been delivered.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Waits for the worker and returns its final copy of the jobs.
    /// `None` if the worker panicked.
    pub fn join(mut self) -> Option<Vec<Job>> {
        let thread = self.thread.take()?;
        match thread.join() {
            Ok(jobs) => Some(jobs),
            Err(_) => {
                engine_error!("worker thread for run {} panicked", self.run_id);
                None
            }
        }
    }
}

fn run_worker(
    engine: Arc<dyn SeparationEngine>,
    mut jobs: Vec<Job>,
    config: &RunConfig,
    event_tx: mpsc::Sender<EngineEvent>,
    cancel: &CancelToken,
) -> Vec<Job> {
    let sink = ChannelEventSink::new(event_tx);
    let worker = BatchWorker::new(engine);
    match ensure_output_dir(&config.output_dir) {
        Ok(()) => {
            worker.run(&mut jobs, config, &sink, cancel);
        }
        Err(err) => {
            engine_error!("cannot prepare {}: {}", config.output_dir.display(), err);
            worker.reject_all(&mut jobs, &err.to_string(), &sink);
        }
    }
    jobs
}
