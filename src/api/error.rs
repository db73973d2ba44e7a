//--------------------------------------------------------------------------------------------------
// ENUMS
//--------------------------------------------------------------------------------------------------
// | Name            | Description                                      | Key Methods         |
// |-----------------|--------------------------------------------------|---------------------|
// | ApiError        | Error types for the API                          | from, into_response |
//--------------------------------------------------------------------------------------------------

use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use super::ErrorResponse;
use crate::story::StoryError;

/// Type alias for Result with ApiError
pub type ApiResult<T> = Result<T, ApiError>;

/// API-specific error types. Every variant is reported the same way: a 500
/// with `success: false` and the error message.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request body could not be read (too large, aborted, ...)
    #[error("{0}")]
    UnreadableBody(String),

    /// The request body is not valid JSON for a story request
    #[error("Invalid JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// The story flow failed
    #[error(transparent)]
    Story(#[from] StoryError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::UnreadableBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!(error = %self, "error generating story");

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
