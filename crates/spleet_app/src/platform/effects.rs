use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use engine_logging::{engine_error, engine_info, engine_warn};
use spleet_core::{Effect, FailedJob, Job, JobId, JobStatus, Msg, RunConfig, RunSummary};
use spleet_engine::{write_run_report, EngineEvent, RunHandle, SeparationEngine};

/// Executes effects from the state machine and turns engine events back
/// into messages. Owns the single live [`RunHandle`].
pub struct EffectRunner {
    engine: Arc<dyn SeparationEngine>,
    active: Option<ActiveRun>,
    write_report: bool,
}

impl EffectRunner {
    pub fn new(engine: Arc<dyn SeparationEngine>, write_report: bool) -> Self {
        Self {
            engine,
            active: None,
            write_report,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Runs effects; returns messages that must be dispatched right away.
    pub fn enqueue(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_ups = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartRun { jobs, config } => {
                    if self.active.is_some() {
                        engine_warn!("StartRun ignored: a run is already active");
                        continue;
                    }
                    engine_info!(
                        "StartRun jobs={} stems={} output={}",
                        jobs.len(),
                        config.stem_count,
                        config.output_dir.display()
                    );
                    let pending: Vec<Job> = jobs
                        .iter()
                        .filter(|job| job.status.is_pending())
                        .cloned()
                        .collect();
                    match RunHandle::start(self.engine.clone(), jobs, config) {
                        Ok(handle) => self.active = Some(ActiveRun::new(handle, pending)),
                        Err(err) => {
                            engine_error!("could not start run: {}", err);
                            let summary = rejected(&pending, &err.to_string());
                            follow_ups.extend(summary.failures.iter().map(|failed| {
                                Msg::JobFailed {
                                    job_id: failed.job_id,
                                    reason: failed.reason.clone(),
                                }
                            }));
                            follow_ups.push(Msg::RunCompleted(summary));
                        }
                    }
                }
                Effect::CancelRun => match &self.active {
                    Some(run) => run.handle.cancel(),
                    None => engine_warn!("CancelRun ignored: no active run"),
                },
            }
        }
        follow_ups
    }

    /// Drains pending engine events without blocking.
    pub fn poll(&mut self) -> Vec<Msg> {
        let Some(run) = self.active.as_mut() else {
            return Vec::new();
        };

        let mut msgs = Vec::new();
        let mut summary = run.drain_into(&mut msgs);
        if summary.is_none() {
            if !run.handle.is_finished() {
                return msgs;
            }
            // Events sent just before the thread ended may still be queued.
            summary = run.drain_into(&mut msgs);
            if summary.is_none() {
                engine_error!("worker ended without a completion event");
            }
        }

        let Some(run) = self.active.take() else {
            return msgs;
        };
        let config = run.handle.config().clone();
        let summary = match summary {
            Some(summary) => {
                if let Some(jobs) = run.handle.join() {
                    let finished = jobs
                        .iter()
                        .filter(|job| job.status == JobStatus::Finished)
                        .count();
                    engine_info!("worker returned {} jobs, {} finished", jobs.len(), finished);
                }
                summary
            }
            None => run.salvage(&mut msgs),
        };
        self.finish_run(&config, &summary);
        msgs
    }

    fn finish_run(&self, config: &RunConfig, summary: &RunSummary) {
        if !self.write_report {
            return;
        }
        let finished_at = Utc::now().to_rfc3339();
        match write_run_report(&config.output_dir, config.stem_count, &finished_at, summary) {
            Ok(path) => engine_info!("wrote run report {}", path.display()),
            Err(err) => engine_warn!("could not write run report: {}", err),
        }
    }
}

/// The live run plus what its events have told us so far.
struct ActiveRun {
    handle: RunHandle,
    pending: Vec<Job>,
    completed: usize,
    failures: Vec<FailedJob>,
    reported: HashSet<JobId>,
}

impl ActiveRun {
    fn new(handle: RunHandle, pending: Vec<Job>) -> Self {
        Self {
            handle,
            pending,
            completed: 0,
            failures: Vec::new(),
            reported: HashSet::new(),
        }
    }

    /// Maps events to messages; returns the summary once `Completed` is seen.
    fn drain_into(&mut self, msgs: &mut Vec<Msg>) -> Option<RunSummary> {
        while let Some(event) = self.handle.try_recv() {
            match event {
                EngineEvent::Progress { job_id, completed } => {
                    self.completed = completed;
                    self.reported.insert(job_id);
                    msgs.push(Msg::JobFinished { job_id, completed });
                }
                EngineEvent::JobFailed { job_id, reason } => {
                    engine_warn!("Job {} failed: {}", job_id, reason);
                    if let Some(job) = self.pending.iter().find(|job| job.id == job_id) {
                        self.failures.push(FailedJob {
                            job_id,
                            source: job.source.clone(),
                            reason: reason.clone(),
                        });
                    }
                    self.reported.insert(job_id);
                    msgs.push(Msg::JobFailed { job_id, reason });
                }
                EngineEvent::Completed(summary) => {
                    msgs.push(Msg::RunCompleted(summary.clone()));
                    return Some(summary);
                }
            }
        }
        None
    }

    /// Closes a run whose worker stopped without `Completed`.
    fn salvage(self, msgs: &mut Vec<Msg>) -> RunSummary {
        let final_jobs = self.handle.join();
        let summary = salvaged_summary(
            &self.pending,
            &self.reported,
            self.completed,
            self.failures,
            final_jobs.as_deref(),
        );
        msgs.extend(
            summary
                .failures
                .iter()
                .filter(|failed| !self.reported.contains(&failed.job_id))
                .map(|failed| Msg::JobFailed {
                    job_id: failed.job_id,
                    reason: failed.reason.clone(),
                }),
        );
        msgs.push(Msg::RunCompleted(summary.clone()));
        summary
    }
}

/// Every pending job without an event is failed. `final_jobs` is the
/// worker's returned snapshot, `None` if it panicked.
fn salvaged_summary(
    pending: &[Job],
    reported: &HashSet<JobId>,
    completed: usize,
    mut failures: Vec<FailedJob>,
    final_jobs: Option<&[Job]>,
) -> RunSummary {
    let fallback = if final_jobs.is_some() {
        "worker stopped before this job"
    } else {
        "worker thread panicked"
    };
    for job in pending.iter().filter(|job| !reported.contains(&job.id)) {
        let reason = final_jobs
            .and_then(|jobs| jobs.iter().find(|j| j.id == job.id))
            .and_then(|j| match &j.status {
                JobStatus::Failed { reason } => Some(reason.clone()),
                _ => None,
            })
            .unwrap_or_else(|| fallback.to_string());
        failures.push(FailedJob {
            job_id: job.id,
            source: job.source.clone(),
            reason,
        });
    }
    RunSummary {
        completed,
        failures,
        cancelled: false,
    }
}

fn rejected(pending: &[Job], reason: &str) -> RunSummary {
    RunSummary {
        completed: 0,
        failures: pending
            .iter()
            .map(|job| FailedJob {
                job_id: job.id,
                source: job.source.clone(),
                reason: reason.to_string(),
            })
            .collect(),
        cancelled: false,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn jobs(files: &[&str]) -> Vec<Job> {
        files
            .iter()
            .enumerate()
            .map(|(i, file)| Job::new(i as JobId + 1, *file))
            .collect()
    }

    #[test]
    fn panicked_worker_keeps_progress_and_fails_unreported_jobs() {
        let pending = jobs(&["a.mp3", "b.mp3", "c.mp3"]);
        let reported: HashSet<JobId> = [1].into_iter().collect();

        let summary = salvaged_summary(&pending, &reported, 1, Vec::new(), None);

        assert_eq!(summary.completed, 1);
        assert!(!summary.cancelled);
        assert_eq!(
            summary.failed_sources(),
            vec![PathBuf::from("b.mp3"), PathBuf::from("c.mp3")]
        );
        assert!(summary
            .failures
            .iter()
            .all(|f| f.reason == "worker thread panicked"));
    }

    #[test]
    fn returned_snapshot_supplies_failure_reasons() {
        let pending = jobs(&["a.mp3", "b.mp3"]);
        let earlier = FailedJob {
            job_id: 1,
            source: PathBuf::from("a.mp3"),
            reason: "corrupt".into(),
        };
        let reported: HashSet<JobId> = [1].into_iter().collect();
        let mut final_jobs = pending.clone();
        final_jobs[1].status = JobStatus::Failed {
            reason: "disk full".into(),
        };

        let summary = salvaged_summary(
            &pending,
            &reported,
            0,
            vec![earlier.clone()],
            Some(&final_jobs),
        );

        assert_eq!(summary.completed, 0);
        assert_eq!(summary.failures.len(), 2);
        assert_eq!(summary.failures[0], earlier);
        assert_eq!(summary.failures[1].reason, "disk full");
    }
}
