use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("Fetch error: {0}")]
    Fetch(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("'{0}' was not found. Try entering the 6-digit ticker code directly.")]
    NotFound(String),
    #[error("Invalid ticker code: {0}")]
    InvalidTickerCode(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Fetch(error.to_string())
    }
}

#[cfg(feature = "http")]
impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        Error::Config(format!("invalid url: {error}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
