use std::sync::Arc;

use async_graphql::{Error, ErrorExtensions};
use thiserror::Error;

/// Shared GraphQL result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("invalid stage `{candidate}`; use one of: {}", .valid.join(", "))]
    InvalidStage {
        candidate: String,
        valid: Vec<String>,
    },
    #[error("{0}")]
    Referential(String),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidInput(_) => "VALIDATION",
            ApiError::InvalidStage { .. } => "INVALID_STAGE",
            ApiError::Referential(_) => "REFERENTIAL",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        if let ApiError::Internal(source) = self {
            tracing::error!(error = %source, "internal error");
        }
        let err = Error::new(self.to_string()).extend_with(|_err, e| {
            e.set("code", self.code());
        });
        match self {
            ApiError::InvalidStage { valid, .. } => {
                let valid = valid.clone();
                err.extend_with(move |_err, e| e.set("validStages", valid.clone()))
            }
            _ => err,
        }
    }
}

/// Convert any error into a GraphQL error payload while hiding internals.
pub fn internal_error(err: impl Into<anyhow::Error>) -> Error {
    ApiError::internal(err.into()).extend()
}
