use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write events: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Failed to write events: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid engine configuration: {0}")]
    Config(#[from] gclog::ConfigError),

    #[error("Scan task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Scan cancelled")]
    Cancelled,
}

pub type ScanResult<T> = Result<T, ScanError>;
