//! Command line arguments and the optional RON settings file.
//!
//! Values given on the command line (or through `SPLEET_*` environment
//! variables) win over the settings file, which wins over built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use engine_logging::engine_info;
use serde::Deserialize;
use spleet_core::StemCount;
use spleet_engine::SpleeterSettings;

use super::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "spleet")]
#[command(about = "Queue audio files and split each one into stems with spleeter")]
#[command(version)]
pub struct Args {
    /// Audio files to separate, processed in the order given
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Number of stems to produce (2, 4 or 5)
    #[arg(short, long, env = "SPLEET_STEMS", value_parser = parse_stems)]
    pub stems: Option<StemCount>,

    /// Output directory; empty means `output`
    #[arg(short, long, env = "SPLEET_OUTPUT")]
    pub output: Option<String>,

    /// Separation program to run
    #[arg(long, env = "SPLEET_ENGINE")]
    pub engine: Option<String>,

    /// RON settings file with defaults for the options above
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Where log messages go
    #[arg(long, value_enum, default_value_t = LogArg::Terminal)]
    pub log: LogArg,

    /// Do not write spleet_report.json after the run
    #[arg(long)]
    pub no_report: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(value: LogArg) -> Self {
        match value {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}

fn parse_stems(raw: &str) -> Result<StemCount, String> {
    let value: u8 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    StemCount::try_from(value).map_err(|err| err.to_string())
}

/// Contents of the settings file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub stems: Option<StemCount>,
    pub output: Option<String>,
    pub engine: Option<String>,
    pub engine_args: Vec<String>,
}

pub fn load_file_settings(path: &Path) -> Result<FileSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading settings file {}", path.display()))?;
    let settings = ron::from_str(&text)
        .with_context(|| format!("parsing settings file {}", path.display()))?;
    engine_info!("loaded settings from {}", path.display());
    Ok(settings)
}

/// Everything the controller needs to start, after merging all sources.
#[derive(Debug, Clone)]
pub struct Settings {
    pub files: Vec<PathBuf>,
    pub stems: Option<StemCount>,
    pub output_dir: String,
    pub engine: SpleeterSettings,
    pub write_report: bool,
}

impl Settings {
    pub fn resolve(args: Args, file: FileSettings) -> Self {
        let defaults = SpleeterSettings::default();
        Self {
            files: args.files,
            stems: args.stems.or(file.stems),
            output_dir: args.output.or(file.output).unwrap_or_default(),
            engine: SpleeterSettings {
                program: args.engine.or(file.engine).unwrap_or(defaults.program),
                extra_args: file.engine_args,
            },
            write_report: !args.no_report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["spleet"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn stems_outside_two_four_five_are_rejected() {
        assert!(Args::try_parse_from(["spleet", "-s", "3", "a.mp3"]).is_err());
        assert!(Args::try_parse_from(["spleet", "-s", "x", "a.mp3"]).is_err());
        assert_eq!(args(&["-s", "5", "a.mp3"]).stems, Some(StemCount::Five));
    }

    #[test]
    fn files_are_required() {
        assert!(Args::try_parse_from(["spleet", "-s", "2"]).is_err());
    }

    #[test]
    fn command_line_overrides_settings_file() {
        let file: FileSettings = ron::from_str(
            r#"(stems: Some(2), output: Some("from_file"), engine: Some("/opt/spleeter"), engine_args: ["--mwf"])"#,
        )
        .unwrap();
        let settings = Settings::resolve(args(&["-s", "4", "a.mp3", "b.mp3"]), file);

        assert_eq!(settings.stems, Some(StemCount::Four));
        assert_eq!(settings.output_dir, "from_file");
        assert_eq!(settings.engine.program, "/opt/spleeter");
        assert_eq!(settings.engine.extra_args, vec!["--mwf".to_string()]);
        assert_eq!(settings.files.len(), 2);
        assert!(settings.write_report);
    }

    #[test]
    fn defaults_apply_without_file() {
        let settings = Settings::resolve(args(&["--no-report", "a.mp3"]), FileSettings::default());
        assert_eq!(settings.stems, None);
        assert_eq!(settings.output_dir, "");
        assert_eq!(settings.engine.program, "spleeter");
        assert!(!settings.write_report);
    }

    #[test]
    fn settings_file_with_bad_stem_count_fails_to_parse() {
        let result: Result<FileSettings, _> = ron::from_str("(stems: Some(3))");
        assert!(result.is_err());
    }
}
