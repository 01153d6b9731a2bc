//! Engine configuration model and loading.

pub mod load;
pub mod model;

use thiserror::Error;

use crate::codec::CodecError;

pub use model::{EngineConfig, MergeConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid jvm_start: {0}")]
    JvmStart(#[source] CodecError),
}
