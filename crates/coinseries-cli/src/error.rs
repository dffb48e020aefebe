use coinseries_core::{ServiceError, ServiceErrorKind, WarehouseError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("store unavailable: {0}")]
    Store(#[from] WarehouseError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Service(error) => match error.kind() {
                ServiceErrorKind::InvalidArgument => 2,
                ServiceErrorKind::NotFound => 3,
                ServiceErrorKind::ExecutionFailure => 10,
            },
            Self::Store(_) => 10,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Service(error) => error.code(),
            Self::Store(_) => "store.unavailable",
            Self::Serialization(_) => "output.serialization",
            Self::Io(_) => "output.io",
        }
    }
}
