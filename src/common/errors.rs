use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failures raised while talking to a streaming platform.
///
/// "Not found" is never an error: clients return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("{0} rejected the access token")]
    Unauthorized(String),
    #[error("access token unavailable: {0}")]
    Token(#[from] TokenError),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Steps of the Apple Music web player scrape, one variant per failure point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("failed to fetch web player page {url}: {reason}")]
    RootPage { url: String, reason: String },
    #[error("web player page does not reference an index bundle")]
    BundlePathNotFound,
    #[error("failed to fetch web player bundle {url}: {reason}")]
    Bundle { url: String, reason: String },
    #[error("bundle does not template a variable into the Authorization header")]
    AuthVariableNotFound,
    #[error("bundle does not assign a string literal to `{0}`")]
    TokenLiteralNotFound(String),
}

/// JSON error body returned by the HTTP API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
    pub status: u16,
    /// Reason phrase, e.g. "Bad Request".
    pub error: String,
    pub message: String,
    pub path: String,
}

impl ApiError {
    fn with_status(status: StatusCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            timestamp: crate::common::types::now_ms(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").into(),
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, message, path)
    }

    pub fn unauthorized(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, message, path)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_reason_phrase() {
        let err = ApiError::bad_request("missing text", "/v1/events");
        assert_eq!(err.status, 400);
        assert_eq!(err.error, "Bad Request");
        assert_eq!(err.path, "/v1/events");
    }

    #[test]
    fn test_token_error_names_failed_step() {
        let err = TokenError::TokenLiteralNotFound("Xt".to_string());
        assert_eq!(
            err.to_string(),
            "bundle does not assign a string literal to `Xt`"
        );
    }
}
