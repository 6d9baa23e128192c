use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing report file parameter")]
    MissingParameter,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Highlight error: {0}")]
    Highlight(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid state transition: {0}")]
    InvalidState(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

/// Failures while loading the index or a report file.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {status}: unable to load {resource}")]
    Status { status: u16, resource: String },

    #[error("unable to load {resource}: {message}")]
    Transport { resource: String, message: String },

    #[error("unable to decode {resource}: {message}")]
    Decode { resource: String, message: String },
}

impl Error {
    /// HTTP status a page adapter should answer with when this error ends a load.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::MissingParameter | Error::InvalidPath(_) | Error::InvalidUrl(_) => 400,
            Error::Fetch(FetchError::Status { status: 404, .. }) => 404,
            Error::Fetch(_) => 502,
            _ => 500,
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, Error::Fetch(_))
    }
}
