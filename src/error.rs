use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;
use tracing::error;
use crate::ErrorResponse;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Invalid school type or dataset not found for school type: {0}")]
    InvalidSchoolType(String),

    #[error("Metric '{0}' not found")]
    MetricNotFound(String),

    #[error("Missing required query parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Arrow error: {0}")]
    Arrow(String),

    #[error("Parquet error: {0}")]
    Parquet(String),

    #[error("IO error: {0}")]
    IO(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("General error: {0}")]
    Other(String),
}

impl Error {
    /// Request errors are the caller's fault and are reported back verbatim.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidSchoolType(_) | Error::MetricNotFound(_) | Error::MissingParameter(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_request_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if self.is_request_error() {
            self.to_string()
        } else {
            error!("Internal error while handling request: {}", self);
            "Internal server error".to_string()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<ArrowError> for Error {
    fn from(err: ArrowError) -> Self {
        Error::Arrow(err.to_string())
    }
}

impl From<ParquetError> for Error {
    fn from(err: ParquetError) -> Self {
        Error::Parquet(err.to_string())
    }
}

impl From<object_store::Error> for Error {
    fn from(err: object_store::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IO(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}
