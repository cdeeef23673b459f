use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Errors surfaced while decoding a field out of an upstream payload.
#[derive(Debug)]
pub enum ApiError {
    Parsing(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Parsing(msg) => write!(f, "parsing error: {msg}"),
        }
    }
}

impl Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;
