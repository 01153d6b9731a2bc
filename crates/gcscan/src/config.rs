use anyhow::{Context, Result};
use gclog::EngineConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    pub logging: LoggingConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Files scanned at the same time, each on its own blocking thread.
    pub max_parallel_files: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Where diagnostics go. Events are always written to stdout, so logs
/// default to stderr.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stderr,
    Stdout,
    File { path: String },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Emit `unknown` events as well as recognized ones.
    pub include_unknown: bool,
    /// Log the aggregated metrics snapshot when the scan finishes.
    pub summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            include_unknown: true,
            summary: true,
        }
    }
}

impl ScanConfig {
    /// Load configuration from gcscan.toml and environment variables
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        // Try these locations in order:
        // 1. /etc/gcscan/gcscan.toml (system-wide)
        // 2. config/gcscan.toml (working directory)
        Self::load_from(&["/etc/gcscan/gcscan", "config/gcscan"])
    }

    /// Layer compile-time defaults, then each file (optional, later wins),
    /// then `GCSCAN_*` environment variables.
    pub fn load_from(config_paths: &[&str]) -> Result<Self> {
        let defaults = config::Config::try_from(&ScanConfig::default())
            .context("Failed to serialize default configuration")?;

        let mut builder = config::Config::builder().add_source(defaults);

        for path in config_paths {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Use double underscore for nested keys: GCSCAN_ENGINE__MERGE__ENABLED
        builder = builder.add_source(
            config::Environment::with_prefix("GCSCAN")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_parallel_files == 0 {
            anyhow::bail!("max_parallel_files must be > 0");
        }
        if self.logging.level.trim().is_empty() {
            anyhow::bail!("logging.level must not be empty");
        }
        self.engine
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid engine configuration")?;
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info,gcscan=debug".to_string(),
                format: LogFormat::Pretty,
                output: LogOutput::Stderr,
            },
            engine: EngineConfig::default(),
            output: OutputConfig::default(),
            max_parallel_files: 4,
        }
    }
}
