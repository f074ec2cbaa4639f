//! Configuration loading
//!
//! Reads [`SessionConfig`] from TOML and validates it before handing it out.
//!
//! ```toml
//! keyspace = "blog"
//! hosts = ["10.0.0.1"]
//! page_size = 500
//! consistency = "LOCAL_ONE"
//!
//! [credentials]
//! username = "cassandra"
//! password = "cassandra"
//! ```

use crate::config::SessionConfig;
use crate::error::{ConfigError, ConfigResult};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Loads session configuration from TOML sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> ConfigResult<SessionConfig> {
        let config: SessionConfig = toml::from_str(contents)?;
        config.validate()?;
        debug!(
            keyspace = %config.keyspace,
            page_size = config.page_size,
            consistency = %config.consistency,
            "Parsed session config"
        );
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<SessionConfig> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), keyspace = %config.keyspace, "Loaded session config");
        Ok(config)
    }

    /// Serialize a config back to TOML
    pub fn to_toml_string(config: &SessionConfig) -> ConfigResult<String> {
        toml::to_string_pretty(config).map_err(|e| ConfigError::invalid("config", e.to_string()))
    }
}
