use std::time::Duration;

use salvo::http::StatusCode;
use tonic::{Code, Status};

use crate::repo::FacadeError;

/// Errors surfaced to callers, classified by what went wrong.
#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    /// A required field was missing or malformed, the storage layer was never reached
    #[error("{0}")]
    InvalidArgument(String),
    #[error("failed to {op}: {source}")]
    NotFound {
        op: &'static str,
        #[source]
        source: FacadeError,
    },
    #[error("failed to {op}: {source}")]
    Internal {
        op: &'static str,
        #[source]
        source: FacadeError,
    },
    /// The request was aborted before the storage layer completed
    #[error("failed to {op}: cancelled after {}ms", .timeout.as_millis())]
    DeadlineExceeded { op: &'static str, timeout: Duration },

    #[error("grpc transport error :: {0}")]
    Transport(#[from] tonic::transport::Error),
    #[error("http server error :: {0}")]
    Http(#[from] salvo::Error),
    #[error("io error :: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn missing(field: &str) -> Self {
        Self::InvalidArgument(format!("{field} is required"))
    }

    /// Classifies a storage failure of operation `op`.
    pub fn from_facade(op: &'static str, source: FacadeError) -> Self {
        if source.is_not_found() {
            Self::NotFound { op, source }
        } else {
            Self::Internal { op, source }
        }
    }

    pub fn code(&self) -> Code {
        match self {
            Self::InvalidArgument(_) => Code::InvalidArgument,
            Self::NotFound { .. } => Code::NotFound,
            Self::DeadlineExceeded { .. } => Code::DeadlineExceeded,
            Self::Internal { .. } | Self::Transport(_) | Self::Http(_) | Self::Io(_) => {
                Code::Internal
            }
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self.code() {
            Code::InvalidArgument => StatusCode::BAD_REQUEST,
            Code::NotFound => StatusCode::NOT_FOUND,
            Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServerError> for Status {
    fn from(value: ServerError) -> Self {
        Status::new(value.code(), value.to_string())
    }
}
