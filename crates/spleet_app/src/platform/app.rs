use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use engine_logging::engine_info;
use spleet_core::{update, AppState, AppViewModel, Msg, SessionState};
use spleet_engine::{SeparationEngine, SpleeterEngine};

use super::effects::EffectRunner;
use super::settings::Settings;
use super::ui::render;

const TICK_INTERVAL: Duration = Duration::from_millis(75);

/// How a session ended, reported through the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    AllSeparated,
    SomeFailed,
    Rejected,
}

pub fn run_app(settings: Settings) -> Outcome {
    let engine: Arc<dyn SeparationEngine> = Arc::new(SpleeterEngine::new(settings.engine.clone()));
    let mut controller =
        Controller::new(engine, settings.write_report, |line: &str| println!("{line}"));
    controller.run(initial_messages(&settings))
}

fn initial_messages(settings: &Settings) -> Vec<Msg> {
    let mut msgs = vec![Msg::FilesAdded(settings.files.clone())];
    if let Some(stems) = settings.stems {
        msgs.push(Msg::StemCountSelected(stems));
    }
    msgs.push(Msg::OutputDirChosen(settings.output_dir.clone()));
    msgs.push(Msg::StartClicked);
    msgs
}

/// Owns the state machine and the effect runner, and prints the view.
pub struct Controller<F: FnMut(&str)> {
    state: AppState,
    runner: EffectRunner,
    msg_tx: mpsc::Sender<Msg>,
    msg_rx: mpsc::Receiver<Msg>,
    output: F,
}

impl<F: FnMut(&str)> Controller<F> {
    pub fn new(engine: Arc<dyn SeparationEngine>, write_report: bool, output: F) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            state: AppState::new(),
            runner: EffectRunner::new(engine, write_report),
            msg_tx,
            msg_rx,
            output,
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Dispatches `initial` and then polls the run until it completes.
    pub fn run(&mut self, initial: Vec<Msg>) -> Outcome {
        for msg in initial {
            let _ = self.msg_tx.send(msg);
        }
        self.process_pending_messages();

        if self.state.session() == SessionState::Idle && !self.runner.is_active() {
            return Outcome::Rejected;
        }

        while self.runner.is_active() || self.state.session() == SessionState::Running {
            for msg in self.runner.poll() {
                let _ = self.msg_tx.send(msg);
            }
            let _ = self.msg_tx.send(Msg::Tick);
            self.process_pending_messages();
            if self.runner.is_active() {
                thread::sleep(TICK_INTERVAL);
            }
        }

        let view = self.view();
        self.finish(&view)
    }

    fn finish(&mut self, view: &AppViewModel) -> Outcome {
        for line in render::render_table(view) {
            (self.output)(&line);
        }
        match &view.last_summary {
            Some(summary) if summary.failures.is_empty() => Outcome::AllSeparated,
            Some(summary) => {
                for failed in &summary.failures {
                    (self.output)(&format!(
                        "failed: {} ({})",
                        failed.source.display(),
                        failed.reason
                    ));
                }
                Outcome::SomeFailed
            }
            None => Outcome::Rejected,
        }
    }

    fn process_pending_messages(&mut self) {
        let mut inbox = Vec::new();
        while let Ok(msg) = self.msg_rx.try_recv() {
            inbox.push(msg);
        }
        for msg in inbox {
            self.dispatch_msg(msg);
        }
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        if was_dirty {
            let view = self.state.view();
            (self.output)(&render::render_status(&view));
        }
        if !effects.is_empty() {
            engine_info!("dispatching {} effects", effects.len());
            for follow_up in self.runner.enqueue(effects) {
                let _ = self.msg_tx.send(follow_up);
            }
        }
    }
}
