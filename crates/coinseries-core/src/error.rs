use std::fmt::{Display, Formatter};

use coinseries_warehouse::WarehouseError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure category reported to callers of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorKind {
    InvalidArgument,
    NotFound,
    ExecutionFailure,
}

impl ServiceErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::ExecutionFailure => "execution_failure",
        }
    }
}

impl Display for ServiceErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every [`TimeseriesService`](crate::TimeseriesService) operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed validation; the store was never consulted.
    #[error("{0}")]
    InvalidArgument(String),

    /// The query ran but matched nothing, and the caller treats that as absence.
    #[error("{0}")]
    NotFound(String),

    /// The store failed while executing a query.
    #[error("{operation} failed for {}: {cause}", .asset_id.as_deref().unwrap_or("all assets"))]
    ExecutionFailure {
        asset_id: Option<String>,
        operation: &'static str,
        #[source]
        cause: WarehouseError,
    },
}

impl ServiceError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn execution_failure(
        asset_id: Option<&str>,
        operation: &'static str,
        cause: WarehouseError,
    ) -> Self {
        Self::ExecutionFailure {
            asset_id: asset_id.map(str::to_owned),
            operation,
            cause,
        }
    }

    pub const fn kind(&self) -> ServiceErrorKind {
        match self {
            Self::InvalidArgument(_) => ServiceErrorKind::InvalidArgument,
            Self::NotFound(_) => ServiceErrorKind::NotFound,
            Self::ExecutionFailure { .. } => ServiceErrorKind::ExecutionFailure,
        }
    }

    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self.kind() {
            ServiceErrorKind::InvalidArgument => "request.invalid_argument",
            ServiceErrorKind::NotFound => "data.not_found",
            ServiceErrorKind::ExecutionFailure => "store.execution_failure",
        }
    }

    /// HTTP-style status class for callers fronting the service over the web.
    pub const fn status_hint(&self) -> u16 {
        match self.kind() {
            ServiceErrorKind::InvalidArgument => 400,
            ServiceErrorKind::NotFound => 404,
            ServiceErrorKind::ExecutionFailure => 500,
        }
    }
}
