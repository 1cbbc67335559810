use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a route from being folded into the graph.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad rating, malformed coordinate or a self-loop. Raised before any mutation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("db returned error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint rejected an insert because a concurrent writer got there first.
    #[error("{0} already exists")]
    Conflict(&'static str),

    #[error("edge {0} -> {1} does not exist")]
    MissingEdge(i64, i64),

    #[error("node for ({0}, {1}) vanished after a conflicting insert")]
    MissingNode(f64, f64),
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("map service returned error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{0} is not a valid url: {1}")]
    InvalidUrl(String, String),

    #[error("map service returned an empty route")]
    EmptyRoute,

    #[error("no directions provider configured")]
    NotConfigured,
}
