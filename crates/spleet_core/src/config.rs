use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::QueueError;

/// Used when the user leaves the output directory empty.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Number of stems the separation engine should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StemCount {
    Two,
    Four,
    Five,
}

impl StemCount {
    pub fn count(self) -> u8 {
        match self {
            StemCount::Two => 2,
            StemCount::Four => 4,
            StemCount::Five => 5,
        }
    }

    /// Pretrained model name understood by spleeter, e.g. `spleeter:4stems`.
    pub fn model_name(self) -> String {
        format!("spleeter:{}stems", self.count())
    }
}

impl TryFrom<u8> for StemCount {
    type Error = QueueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(StemCount::Two),
            4 => Ok(StemCount::Four),
            5 => Ok(StemCount::Five),
            0 => Err(QueueError::InvalidConfig("no stem count selected".into())),
            other => Err(QueueError::InvalidConfig(format!(
                "unsupported stem count {other}, expected 2, 4 or 5"
            ))),
        }
    }
}

impl From<StemCount> for u8 {
    fn from(value: StemCount) -> Self {
        value.count()
    }
}

impl fmt::Display for StemCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}

/// Settings fixed for the duration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub stem_count: StemCount,
    pub output_dir: PathBuf,
}

impl RunConfig {
    /// Fails with `InvalidConfig` when no stem count was chosen. An empty
    /// output directory falls back to [`DEFAULT_OUTPUT_DIR`].
    pub fn new(stem_count: Option<StemCount>, output_dir: &str) -> Result<Self, QueueError> {
        let stem_count =
            stem_count.ok_or_else(|| QueueError::InvalidConfig("no stem count selected".into()))?;
        let trimmed = output_dir.trim();
        let output_dir = if trimmed.is_empty() {
            PathBuf::from(DEFAULT_OUTPUT_DIR)
        } else {
            PathBuf::from(trimmed)
        };
        Ok(Self {
            stem_count,
            output_dir,
        })
    }
}
