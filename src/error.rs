use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    /// Captioning or story call errored, or answered without the expected field
    #[error("Request failed: {0}")]
    RequestFailure(String),

    /// PDF renderer errored
    #[error("Render failed: {0}")]
    RenderFailure(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("You can only upload up to {max} images (got {count})")]
    TooManyImages { count: usize, max: usize },

    #[error("Upload too large: image batches are limited to {limit} bytes")]
    UploadTooLarge { limit: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    #[error("Story {0} not found")]
    StoryNotFound(usize),

    #[error("No PDF available for story {0}")]
    PdfNotAvailable(usize),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::RequestFailure(_) | AppError::RenderFailure(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidImage(_)
            | AppError::TooManyImages { .. }
            | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::SessionNotFound(_)
            | AppError::StoryNotFound(_)
            | AppError::PdfNotAvailable(_) => StatusCode::NOT_FOUND,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("{}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
