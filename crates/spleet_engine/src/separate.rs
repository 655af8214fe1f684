use std::path::Path;
use std::process::{Command, Stdio};

use engine_logging::{engine_debug, engine_info};
use spleet_core::StemCount;

use crate::SeparationError;

/// Number of trailing stderr lines kept in an `ExitStatus` error.
const STDERR_TAIL_LINES: usize = 8;

/// Splits one audio file into stems written below `output_dir`.
///
/// Calls are blocking and may take minutes per file; the worker only ever
/// runs one at a time.
pub trait SeparationEngine: Send + Sync {
    fn separate(
        &self,
        source: &Path,
        output_dir: &Path,
        stems: StemCount,
    ) -> Result<(), SeparationError>;
}

#[derive(Debug, Clone)]
pub struct SpleeterSettings {
    /// Executable to run, looked up on `PATH` when not absolute.
    pub program: String,
    /// Extra arguments placed before the source file.
    pub extra_args: Vec<String>,
}

impl Default for SpleeterSettings {
    fn default() -> Self {
        Self {
            program: "spleeter".to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// Runs the spleeter command line tool as a child process.
#[derive(Debug, Clone)]
pub struct SpleeterEngine {
    settings: SpleeterSettings,
}

impl SpleeterEngine {
    pub fn new(settings: SpleeterSettings) -> Self {
        Self { settings }
    }

    fn build_command(&self, source: &Path, output_dir: &Path, stems: StemCount) -> Command {
        let mut cmd = Command::new(&self.settings.program);
        cmd.arg("separate")
            .arg("-p")
            .arg(stems.model_name())
            .arg("-o")
            .arg(output_dir)
            .args(&self.settings.extra_args)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl SeparationEngine for SpleeterEngine {
    fn separate(
        &self,
        source: &Path,
        output_dir: &Path,
        stems: StemCount,
    ) -> Result<(), SeparationError> {
        if !source.is_file() {
            return Err(SeparationError::MissingSource(source.to_path_buf()));
        }

        let mut cmd = self.build_command(source, output_dir, stems);
        engine_debug!("spawning {:?}", cmd);
        let output = cmd.output().map_err(|source| SeparationError::Spawn {
            program: self.settings.program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(SeparationError::ExitStatus {
                code: output.status.code(),
                stderr: stderr_tail(&output.stderr),
            });
        }

        engine_info!(
            "separated {} into {} stems under {}",
            source.display(),
            stems,
            output_dir.display()
        );
        Ok(())
    }
}

fn stderr_tail(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
