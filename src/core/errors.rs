use thiserror::Error;

use super::models::EntityId;

#[derive(Error, Debug)]
pub enum HortasError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("HortasError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for HortasError {
    fn from(error: std::io::Error) -> Self {
        HortasError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for HortasError {
    fn from(error: reqwest::Error) -> Self {
        HortasError::Reqwest(Box::new(error))
    }
}

/// Failure of a single remote call, after the response has been classified.
///
/// Carries strings rather than the `reqwest` error so results can cross
/// task boundaries and be compared in tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("not authorized (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("HTTP error {status} from {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ApiError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("failed to load {resource}: {source}")]
    Fetch {
        resource: String,
        #[source]
        source: ApiError,
    },

    #[error("failed to update {label}: {source}")]
    Update {
        label: String,
        #[source]
        source: ApiError,
    },

    #[error("no entity with id {0}")]
    UnknownEntity(EntityId),

    #[error("an update for {0} is still pending")]
    MutationPending(EntityId),
}

impl ListError {
    pub fn is_auth(&self) -> bool {
        match self {
            ListError::Fetch { source, .. } | ListError::Update { source, .. } => source.is_auth(),
            _ => false,
        }
    }
}
