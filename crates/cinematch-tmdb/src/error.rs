use cinematch_core::CinematchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    ApiError(String, String),

    #[error("rate limit from {0}, retry after {1}s")]
    RateLimit(String, u64),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("TMDB API key not set (expected in ${0})")]
    MissingApiKey(String),

    #[error(transparent)]
    Core(#[from] CinematchError),
}

pub type Result<T> = std::result::Result<T, TmdbError>;
