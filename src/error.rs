use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("only POST request accepted")]
    BadMethod(String),

    #[error("{0}")]
    MalformedInput(#[from] serde_json::Error),

    #[error("text does not contain upto 10 unique words")]
    InsufficientVocabulary { found: usize },

    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("request header line exceeds {limit} bytes")]
    HeaderTooLarge { limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("worker pool: {0}")]
    Pool(String),
}

impl Error {
    /// HTTP status reported to the client for this failure.
    pub fn status(&self) -> u16 {
        match self {
            Error::BadMethod(_)
            | Error::MalformedInput(_)
            | Error::InsufficientVocabulary { .. }
            | Error::BadRequest(_) => 400,
            Error::PayloadTooLarge { .. } => 413,
            Error::HeaderTooLarge { .. } => 431,
            Error::Io(_) | Error::Pool(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
