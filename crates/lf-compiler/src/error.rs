use std::io;
use std::path::PathBuf;

/// Failures that stop a run or a single target.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("failed to read '{}': {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("rule validation failed with {} error(s)", errors.len())]
    ValidationFailed { errors: Vec<String> },
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GeneratorError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Stable identifier used in reports and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
            Self::ValidationFailed { .. } => "VALIDATION_FAILED",
            Self::Write { .. } => "WRITE_FAILED",
        }
    }

    /// Whether the error aborts the whole run rather than one target.
    pub fn aborts_run(&self) -> bool {
        !matches!(self, Self::Write { .. })
    }
}
