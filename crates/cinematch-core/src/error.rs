use std::path::PathBuf;

use thiserror::Error;

use crate::models::RecordKey;

/// All errors that can occur in cinematch-core.
#[derive(Debug, Error)]
pub enum CinematchError {
    #[error("Malformed title, main title is empty: {0:?}")]
    MalformedTitle(String),

    #[error("Invalid input record at line {line}: {message}")]
    InvalidRecord { line: u64, message: String },

    #[error("Duplicate movie entry during incremental merge: {0}")]
    MergeCollision(RecordKey),

    #[error("Prior dataset not found for incremental run: {}", .0.display())]
    PriorDatasetMissing(PathBuf),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Exit codes used by the CLI.
#[repr(i32)]
pub enum ExitCode {
    GeneralError = 1,
    NotFound = 2,
    InvalidInput = 3,
    FileSystemError = 4,
    Conflict = 7,
}

impl CinematchError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::MalformedTitle(_) | Self::InvalidRecord { .. } | Self::Csv(_) => {
                ExitCode::InvalidInput
            }
            Self::MergeCollision(_) => ExitCode::Conflict,
            Self::PriorDatasetMissing(_) => ExitCode::NotFound,
            Self::Io(_) => ExitCode::FileSystemError,
            _ => ExitCode::GeneralError,
        }
    }
}

pub type Result<T> = std::result::Result<T, CinematchError>;
