use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use engine_logging::{engine_info, engine_warn};
use spleet_core::{FailedJob, Job, JobStatus, RunConfig, RunSummary};

use crate::{EngineEvent, SeparationEngine, SeparationError};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Fire-and-forget sink: a dropped receiver is not the worker's problem.
pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Shared flag checked by the worker before each engine call.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives a job snapshot through the engine, one job at a time.
pub struct BatchWorker {
    engine: Arc<dyn SeparationEngine>,
}

impl BatchWorker {
    pub fn new(engine: Arc<dyn SeparationEngine>) -> Self {
        Self { engine }
    }

    /// Processes every `Pending` job in order and flips its status in place.
    ///
    /// Finished and failed jobs are skipped. A failing job is marked `Failed`
    /// and the run continues; a panicking engine counts as a failure. Emits
    /// one `Progress` per success, one `JobFailed` per failure, then exactly
    /// one `Completed`.
    pub fn run(
        &self,
        jobs: &mut [Job],
        config: &RunConfig,
        sink: &dyn EventSink,
        cancel: &CancelToken,
    ) -> RunSummary {
        let mut summary = RunSummary::default();
        let pending = jobs.iter().filter(|job| job.status.is_pending()).count();
        engine_info!(
            "run started: {} pending of {} jobs, {} stems, output {}",
            pending,
            jobs.len(),
            config.stem_count,
            config.output_dir.display()
        );

        for job in jobs.iter_mut().filter(|job| job.status.is_pending()) {
            if cancel.is_cancelled() {
                engine_info!("run cancelled before job {}", job.id);
                summary.cancelled = true;
                break;
            }

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                self.engine
                    .separate(&job.source, &config.output_dir, config.stem_count)
            }))
            .unwrap_or_else(|payload| {
                Err(SeparationError::Other(panic_reason(&*payload)))
            });

            match outcome {
                Ok(()) => {
                    job.status = JobStatus::Finished;
                    summary.completed += 1;
                    sink.emit(EngineEvent::Progress {
                        job_id: job.id,
                        completed: summary.completed,
                    });
                }
                Err(err) => {
                    let reason = err.to_string();
                    engine_warn!("job {} ({}) failed: {}", job.id, job.source.display(), reason);
                    job.status = JobStatus::Failed {
                        reason: reason.clone(),
                    };
                    summary.failures.push(FailedJob {
                        job_id: job.id,
                        source: job.source.clone(),
                        reason: reason.clone(),
                    });
                    sink.emit(EngineEvent::JobFailed {
                        job_id: job.id,
                        reason,
                    });
                }
            }
        }

        engine_info!(
            "run finished: {} completed, {} failed{}",
            summary.completed,
            summary.failures.len(),
            if summary.cancelled { ", cancelled" } else { "" }
        );
        sink.emit(EngineEvent::Completed(summary.clone()));
        summary
    }

    /// Fails every pending job with the same reason without touching the
    /// engine, e.g. when the output directory cannot be created.
    pub fn reject_all(&self, jobs: &mut [Job], reason: &str, sink: &dyn EventSink) -> RunSummary {
        let mut summary = RunSummary::default();
        for job in jobs.iter_mut().filter(|job| job.status.is_pending()) {
            job.status = JobStatus::Failed {
                reason: reason.to_string(),
            };
            summary.failures.push(FailedJob {
                job_id: job.id,
                source: job.source.clone(),
                reason: reason.to_string(),
            });
            sink.emit(EngineEvent::JobFailed {
                job_id: job.id,
                reason: reason.to_string(),
            });
        }
        engine_warn!("run rejected for {} jobs: {}", summary.failures.len(), reason);
        sink.emit(EngineEvent::Completed(summary.clone()));
        summary
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "no message".to_string());
    format!("engine panicked: {detail}")
}
