use std::time::Duration;

use aws_sdk_rds::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_smithy_runtime_api::client::waiters::error::WaiterError;
use serde::Serialize;
use thiserror::Error;

const WAIT_OPERATION: &str = "WaitUntilDBClusterSnapshotAvailable";

/// Everything that can go wrong while starting an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("missing required environment variable {0}")]
    MissingConfig(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidConfig { name: &'static str, reason: String },

    #[error("{operation} rejected by RDS: {message}")]
    Rejected {
        operation: &'static str,
        code: Option<String>,
        message: String,
    },

    #[error("snapshot {snapshot_identifier} was not available after {}s", .waited.as_secs())]
    Timeout {
        snapshot_identifier: String,
        waited: Duration,
    },

    #[error("{operation} failed to reach RDS: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },
}

/// The closed set of failure kinds reported to callers.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Configuration,
    Rejected,
    Timeout,
    Transport,
}

/// Serializable form of an [`ExportError`], placed in failure bodies.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ExportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingConfig(_) | Self::InvalidConfig { .. } => ErrorKind::Configuration,
            Self::Rejected { .. } => ErrorKind::Rejected,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Transport { .. } => ErrorKind::Transport,
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        let code = match self {
            Self::Rejected { code, .. } => code.clone(),
            _ => None,
        };

        ErrorDetail {
            kind: self.kind(),
            message: self.to_string(),
            code,
        }
    }

    /// Classifies an SDK failure for `operation`.
    pub fn from_sdk<E, R>(operation: &'static str, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        let message = DisplayErrorContext(&err).to_string();

        match &err {
            SdkError::ServiceError(service_err) => Self::Rejected {
                operation,
                code: service_err.err().code().map(str::to_string),
                message,
            },
            SdkError::ConstructionFailure(_) => Self::Rejected {
                operation,
                code: None,
                message,
            },
            _ => Self::Transport { operation, message },
        }
    }

    /// Classifies a waiter failure while polling `snapshot_identifier`.
    ///
    /// Errors from the underlying `DescribeDBClusterSnapshots` polls are
    /// classified like any other SDK error.
    pub fn from_waiter<O, E>(
        snapshot_identifier: &str,
        waited: Duration,
        err: WaiterError<O, E>,
    ) -> Self
    where
        O: std::fmt::Debug,
        E: ProvideErrorMetadata + std::error::Error + std::fmt::Debug + 'static,
    {
        let code = err.code().map(str::to_string);

        match err {
            WaiterError::ExceededMaxWait(_) => Self::Timeout {
                snapshot_identifier: snapshot_identifier.to_string(),
                waited,
            },
            WaiterError::FailureState(_) => Self::Rejected {
                operation: WAIT_OPERATION,
                code,
                message: format!("snapshot {} entered a failure state", snapshot_identifier),
            },
            WaiterError::OperationFailed(failed) => {
                Self::from_sdk(WAIT_OPERATION, failed.into_error())
            }
            other => Self::Transport {
                operation: WAIT_OPERATION,
                message: DisplayErrorContext(&other).to_string(),
            },
        }
    }
}
