//! Load: engine config from TOML text or file, plus validation.

use std::path::Path;

use super::model::EngineConfig;
use super::ConfigError;
use crate::codec::{parse_datestamp, Instant};

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded engine configuration");
        Self::from_toml_str(&contents)
    }

    /// Parsed `jvm_start`, if one is configured.
    pub fn jvm_start_instant(&self) -> Result<Option<Instant>, ConfigError> {
        self.jvm_start
            .as_deref()
            .map(|literal| parse_datestamp(literal).map_err(ConfigError::JvmStart))
            .transpose()
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Err(e) = self.jvm_start_instant() {
            return Err(e.to_string());
        }
        self.merge.validate()?;
        Ok(())
    }
}
