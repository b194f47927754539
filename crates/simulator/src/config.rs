use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lockcurve_core::ProtocolConfig;
use serde::{Deserialize, Serialize};

/// Simulator configuration loaded from a TOML file
///
/// Every section is optional; missing values fall back to protocol defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SimulatorConfig {
    /// Protocol parameters handed to the core
    #[serde(default)]
    pub protocol: ProtocolConfig,

    /// Result formatting
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Pretty-print JSON results
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl SimulatorConfig {
    /// Load configuration from TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to load config file {}", path.display()))
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: SimulatorConfig = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.protocol.validate()?;
        Ok(())
    }
}

/// Create example configuration file
pub fn create_example_config(path: &Path) -> Result<()> {
    SimulatorConfig::default().save(path)
}
