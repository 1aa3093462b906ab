use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HttpStatusError: response is {0}, expected 200")]
    HttpStatusError(u16),
    #[error("EmptyBodyError: response body is empty")]
    EmptyBodyError,
    #[error("MalformedJsonError: {0}")]
    MalformedJsonError(String),
    #[error("NetworkError: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::MalformedJsonError(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("MalformedRecordError: {0}")]
    MalformedRecordError(String),
}
