use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Catalog is empty; upload a watchlist with resolvable titles first")]
    EmptyCatalog,

    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("No metadata found for {0}")]
    MetadataNotFound(String),

    #[error("No watchlist has been uploaded")]
    NoWatchlist,

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NoWatchlist | AppError::MetadataNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::EmptyCatalog => (StatusCode::CONFLICT, self.to_string()),
            AppError::EmbeddingUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (AppError::EmptyCatalog, StatusCode::CONFLICT),
            (
                AppError::EmbeddingUnavailable("model offline".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::MetadataNotFound("Heat".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (AppError::NoWatchlist, StatusCode::NOT_FOUND),
            (
                AppError::InvalidInput("bad year".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::ExternalApi("OMDb returned 500".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Internal("join error".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_metadata_not_found_message_names_title() {
        let error = AppError::MetadataNotFound("Alien (1979)".to_string());
        assert_eq!(error.to_string(), "No metadata found for Alien (1979)");
    }
}
