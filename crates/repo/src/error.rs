use thiserror::Error;

/// Failures while fetching a repository manifest.
///
/// Registration collapses all of these into an invalid url outcome; the
/// variants exist for logging.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid manifest url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP response error: {status}")]
    ResponseError { status: u16 },

    #[error("Invalid repository manifest: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;
