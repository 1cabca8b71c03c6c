//! Configuration file parsing for the stub backend.
//!
//! Loads the bind address and an optional seed file from TOML.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Stub configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Field present but unusable
    #[error("Invalid configuration field: {0}")]
    InvalidField(String),
}

/// Stub backend configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct StubConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// JSON file with content, relationships and suggestions to preload
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

impl StubConfig {
    /// Load configuration from a TOML file
    ///
    /// A relative `seed_file` is resolved against the config file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: StubConfig = toml::from_str(&contents)?;

        if config.bind_address.trim().is_empty() {
            return Err(ConfigError::InvalidField("bind_address".to_string()));
        }

        if let (Some(seed), Some(dir)) = (&config.seed_file, path.parent()) {
            if seed.is_relative() {
                config.seed_file = Some(dir.join(seed));
            }
        }

        Ok(config)
    }

    /// Create a default configuration for local development
    pub fn default_test_config() -> Self {
        StubConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            seed_file: None,
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = StubConfig::default_test_config();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn test_bind_addr() {
        let config = StubConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            seed_file = "seed.json"
        "#;

        let config: StubConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.seed_file, Some(PathBuf::from("seed.json")));
    }

    #[test]
    fn test_seed_path_resolved_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stub.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "bind_port = 9100").unwrap();
        writeln!(file, "seed_file = \"data/seed.json\"").unwrap();

        let config = StubConfig::from_file(&path).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.seed_file, Some(dir.path().join("data/seed.json")));
    }

    #[test]
    fn test_empty_bind_address_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stub.toml");
        std::fs::write(&path, "bind_address = \"  \"\n").unwrap();

        assert!(matches!(
            StubConfig::from_file(&path),
            Err(ConfigError::InvalidField(_))
        ));
    }
}
