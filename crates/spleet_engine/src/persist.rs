use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use spleet_core::{RunSummary, StemCount};
use tempfile::NamedTempFile;
use thiserror::Error;

/// File name of the JSON report written next to the stems.
pub const REPORT_FILENAME: &str = "spleet_report.json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("could not serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Creates `dir` if needed and checks that files can be created inside it.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir)
                .map_err(|e| PersistError::OutputDir(format!("{}: {e}", dir.display())))?;
        }
        Err(err) => {
            return Err(PersistError::OutputDir(format!("{}: {err}", dir.display())));
        }
    }
    NamedTempFile::new_in(dir)
        .map_err(|e| PersistError::OutputDir(format!("{}: {e}", dir.display())))?;
    Ok(())
}

/// Writes files into one directory through a temp file and a rename, so
/// readers never see a half-written file.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    finished_at: &'a str,
    stems: StemCount,
    output_dir: &'a Path,
    #[serde(flatten)]
    summary: &'a RunSummary,
}

/// Serializes `summary` as pretty JSON into `{output_dir}/spleet_report.json`.
pub fn write_run_report(
    output_dir: &Path,
    stems: StemCount,
    finished_at: &str,
    summary: &RunSummary,
) -> Result<PathBuf, PersistError> {
    let report = RunReport {
        finished_at,
        stems,
        output_dir,
        summary,
    };
    let json = serde_json::to_vec_pretty(&report)?;
    AtomicFileWriter::new(output_dir.to_path_buf()).write(REPORT_FILENAME, &json)
}
