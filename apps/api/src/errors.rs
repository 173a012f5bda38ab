use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Failure bodies are plain text: the render endpoint returns binary image
/// bytes on success, so clients get a bare reason string rather than a JSON
/// envelope. A request either fully succeeds with an image or fails with one
/// of these statuses — there are no partial responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Requested canvas width or height exceeds the 2000 px ceiling.
    #[error("Image dimensions too large")]
    DimensionsTooLarge,

    /// Body text was not a string or exceeds 800 characters.
    #[error("Text too long or invalid")]
    TextTooLong,

    /// Rasterization failed or an unexpected internal error occurred.
    /// Details are logged server-side only.
    #[error("Render failure: {0}")]
    Render(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::DimensionsTooLarge => {
                (StatusCode::BAD_REQUEST, "Image dimensions too large")
            }
            AppError::TextTooLong => (StatusCode::BAD_REQUEST, "Text too long or invalid"),
            AppError::Render(e) => {
                tracing::error!("Render failure: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}
