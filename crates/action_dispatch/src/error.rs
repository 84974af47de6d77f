use std::fmt;

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::error::{ApiError, ErrorCode};
use thiserror::Error;
use tracing::{error, warn};

/// Where a piece of JSON text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadLocation {
    QueryData,
    RequestBody,
}

impl fmt::Display for PayloadLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueryData => f.write_str("`data` query parameter"),
            Self::RequestBody => f.write_str("request body"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("malformed JSON in {location}: {source}")]
    MalformedJson {
        location: PayloadLocation,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed query string: {0}")]
    MalformedQuery(#[source] QueryRejection),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("invalid data for action `{action}`: {source}")]
    InvalidPayload {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no handler registered for action `{0}`")]
    ActionNotFound(String),

    #[error("failed to render page: {0}")]
    Render(#[source] anyhow::Error),
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedJson { .. }
            | Self::MalformedQuery(_)
            | Self::MissingField(_)
            | Self::InvalidField { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidPayload { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ActionNotFound(_) => StatusCode::NOT_FOUND,
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedJson { .. }
            | Self::MalformedQuery(_)
            | Self::MissingField(_)
            | Self::InvalidField { .. } => ErrorCode::BadRequest,
            Self::InvalidPayload { .. } => ErrorCode::Validation,
            Self::ActionNotFound(_) => ErrorCode::NotFound,
            Self::Render(_) => ErrorCode::Internal,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "action view failed");
        } else {
            warn!(error = %self, %status, "rejected action request");
        }
        (status, Json(ApiError::new(self.code(), self.to_string()))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("handler for action '{0}' is already registered")]
    AlreadyRegistered(String),
}
