#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex, Once};

use spleet_core::StemCount;
use spleet_engine::{EngineEvent, EventSink, SeparationEngine, SeparationError};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

pub type Call = (PathBuf, PathBuf, StemCount);

/// Records every call and fails for the configured source paths.
#[derive(Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<Call>>,
    failing: HashSet<PathBuf>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(paths: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: paths.iter().map(PathBuf::from).collect(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl SeparationEngine for RecordingEngine {
    fn separate(
        &self,
        source: &Path,
        output_dir: &Path,
        stems: StemCount,
    ) -> Result<(), SeparationError> {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_path_buf(), output_dir.to_path_buf(), stems));
        if self.failing.contains(source) {
            return Err(SeparationError::Other(format!(
                "cannot decode {}",
                source.display()
            )));
        }
        Ok(())
    }
}

/// Panics when asked to separate `panic_on`, succeeds otherwise.
pub struct PanickingEngine {
    pub panic_on: PathBuf,
}

impl SeparationEngine for PanickingEngine {
    fn separate(
        &self,
        source: &Path,
        _output_dir: &Path,
        _stems: StemCount,
    ) -> Result<(), SeparationError> {
        if source == self.panic_on {
            panic!("decoder blew up on {}", source.display());
        }
        Ok(())
    }
}

/// Blocks inside every call until the test releases it.
pub struct GatedEngine {
    entered_tx: Mutex<mpsc::Sender<PathBuf>>,
    release_rx: Mutex<mpsc::Receiver<()>>,
}

impl GatedEngine {
    pub fn new() -> (Self, mpsc::Receiver<PathBuf>, mpsc::Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let engine = Self {
            entered_tx: Mutex::new(entered_tx),
            release_rx: Mutex::new(release_rx),
        };
        (engine, entered_rx, release_tx)
    }
}

impl SeparationEngine for GatedEngine {
    fn separate(
        &self,
        source: &Path,
        _output_dir: &Path,
        _stems: StemCount,
    ) -> Result<(), SeparationError> {
        let _ = self.entered_tx.lock().unwrap().send(source.to_path_buf());
        self.release_rx
            .lock()
            .unwrap()
            .recv()
            .map_err(|_| SeparationError::Other("gate dropped".into()))
    }
}

#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl CollectingSink {
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
