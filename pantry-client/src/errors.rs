pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type LocalResult<T> = std::result::Result<T, LocalError>;

/// Failures talking to the remote recipe sheet.
///
/// A record that does not exist is not an error; the store returns `None` for it.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{url} answered {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Failures reading or writing the client's local state.
#[derive(thiserror::Error, Debug)]
pub enum LocalError {
    #[error("Local storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Local storage encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
