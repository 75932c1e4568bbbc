use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Batch size must be a positive number, got {0}")]
    InvalidBatchSize(usize),

    #[error("Couldn't build the selector: {0}")]
    ParseSelector(String),
    #[error("Quote block on {url} is missing `{field}`")]
    MissingField { url: String, field: &'static str },

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Sqlite Error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
