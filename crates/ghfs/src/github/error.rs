use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("API URL cannot carry path segments: {0}")]
    InvalidUrl(String),
    #[error("access token is not a valid header value")]
    InvalidToken,
}

impl ApiError {
    /// True when the remote answered with 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::HttpStatus(status, _) if *status == StatusCode::NOT_FOUND)
    }
}
