use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedClientError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("server unavailable, retry later")]
    Unavailable,
    #[error("server error ({status}): {message}")]
    Server { status: StatusCode, message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl FeedClientError {
    pub(crate) async fn from_http_response(resp: Response) -> Self {
        let status = resp.status();
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        };
        Self::from_status(status, message)
    }

    fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::BAD_REQUEST => Self::InvalidRequest(message),
            StatusCode::SERVICE_UNAVAILABLE => Self::Unavailable,
            status => Self::Server { status, message },
        }
    }
}
