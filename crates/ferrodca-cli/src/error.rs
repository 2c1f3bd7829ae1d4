use ferrodca_core::AdvisorError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ferrodca_core::ValidationError),

    #[error(transparent)]
    Advisor(#[from] AdvisorError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Advisor(AdvisorError::InvalidThreshold { .. }) => 2,
            Self::Advisor(AdvisorError::DataUnavailable { .. } | AdvisorError::Metrics(_)) => 3,
            Self::Serialization(_) => 4,
            Self::Logging(_) => 10,
            Self::Io(_) => 10,
        }
    }
}
