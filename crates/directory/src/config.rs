//! Directory configuration file.
//!
//! The file lists one `[[servers]]` table per directory server. Servers are
//! tried in file order for lookups.

use std::path::{Path, PathBuf};

use domain::models::DirectoryServerConfig;
use serde::Deserialize;

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum DirectoryConfigError {
    #[error("Failed to read directory configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid directory configuration: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub servers: Vec<DirectoryServerConfig>,
}

impl DirectoryConfig {
    /// Load and validate the configuration file at `path`.
    ///
    /// The format is inferred from the extension; `.toml` is expected.
    pub fn load(path: &Path) -> Result<Self, DirectoryConfigError> {
        let source = config::Config::builder()
            .add_source(config::File::from(PathBuf::from(path)))
            .build()?;

        let cfg: Self = source.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self, DirectoryConfigError> {
        let source = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?;

        let cfg: Self = source.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), DirectoryConfigError> {
        if self.servers.is_empty() {
            return Err(DirectoryConfigError::InvalidValue(
                "at least one [[servers]] entry is required".to_string(),
            ));
        }

        for (index, server) in self.servers.iter().enumerate() {
            if server.host.trim().is_empty() {
                return Err(DirectoryConfigError::InvalidValue(format!(
                    "servers[{}].host cannot be empty",
                    index
                )));
            }
            if server.port == 0 {
                return Err(DirectoryConfigError::InvalidValue(format!(
                    "servers[{}].port cannot be 0",
                    index
                )));
            }
            if server.search_base_dns.is_empty() {
                return Err(DirectoryConfigError::InvalidValue(format!(
                    "servers[{}].search_base_dns must list at least one base DN",
                    index
                )));
            }
            if !server.search_filter.contains("%s") {
                return Err(DirectoryConfigError::InvalidValue(format!(
                    "servers[{}].search_filter must contain %s",
                    index
                )));
            }
            if server.use_ssl && server.start_tls {
                return Err(DirectoryConfigError::InvalidValue(format!(
                    "servers[{}] cannot enable both use_ssl and start_tls",
                    index
                )));
            }
        }

        Ok(())
    }
}
