//! Model: EngineConfig and MergeConfig.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Absolute JVM start (`2010-02-26T07:07:31.838-0600`). When unset the
    /// first datestamp in the input anchors relative time.
    pub jvm_start: Option<String>,
    pub rewrite_datestamps: bool,
    pub drop_application_logging: bool,
    pub merge: MergeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub enabled: bool,
    /// Tenuring-distribution lines tolerated between a split header and its
    /// closer before the header is released unmerged.
    pub max_interstitial_lines: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            jvm_start: None,
            rewrite_datestamps: true,
            drop_application_logging: true,
            merge: MergeConfig::default(),
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_interstitial_lines: 32,
        }
    }
}

impl MergeConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.max_interstitial_lines == 0 {
            return Err("merge.max_interstitial_lines must be > 0 when merging is enabled".to_string());
        }
        Ok(())
    }
}
