use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use snafu::Snafu;

use super::validation::ValidationError;
use crate::database::StoreError;
use crate::model::VideoId;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    #[snafu(display("{source}"))]
    InvalidArguments { source: ValidationError },

    #[snafu(display("could not find video with that id"))]
    VideoNotFound { id: VideoId },

    /// Update or delete aimed at a record that does not exist
    #[snafu(display("Video not found"))]
    NoSuchVideo { id: VideoId },

    /// The path segment is not an integer, so it can never address a video
    #[snafu(display("could not find video with that id"))]
    InvalidVideoId { text: String },

    #[snafu(display("video id taken"))]
    VideoIdTaken { id: VideoId },

    #[snafu(display("internal server error"))]
    Storage { source: StoreError },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidArguments { .. } => StatusCode::BAD_REQUEST,
            ApiError::VideoNotFound { .. }
            | ApiError::NoSuchVideo { .. }
            | ApiError::InvalidVideoId { .. } => StatusCode::NOT_FOUND,
            ApiError::VideoIdTaken { .. } => StatusCode::CONFLICT,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Conflict { id } => ApiError::VideoIdTaken { id },
            StoreError::NotFound { id } => ApiError::NoSuchVideo { id },
            source => ApiError::Storage { source },
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Storage { source } => tracing::error!(error = %source, "storage failure"),
            other => tracing::debug!(error = %other, %status, "request rejected"),
        }

        let field = match &self {
            ApiError::InvalidArguments { source } => source.field(),
            _ => None,
        };

        let content = ErrorResponse {
            message: self.to_string(),
            field,
        };

        (status, Json(content)).into_response()
    }
}
