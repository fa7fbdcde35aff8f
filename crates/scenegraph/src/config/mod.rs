//! Configuration system

use std::path::PathBuf;

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    ///
    /// The format check comes before any filesystem access, so an
    /// unsupported extension is reported as such whether or not the file
    /// exists.
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Configuration for the scene builder's asset resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Directories searched, in order, when resolving mesh, texture, and
    /// sub-scene paths. The directory of the scene file being parsed is
    /// always tried first.
    pub search_paths: Vec<PathBuf>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from(".")],
        }
    }
}

impl Config for BuilderConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_config_ron_round_trip() {
        let config = BuilderConfig {
            search_paths: vec![PathBuf::from("assets"), PathBuf::from("models")],
        };
        let text = ron::to_string(&config).unwrap();
        let parsed: BuilderConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed.search_paths, config.search_paths);
    }

    #[test]
    fn test_unsupported_format_is_rejected() {
        // rejected on extension alone, whether or not the file exists
        let result = BuilderConfig::load_from_file("config.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = BuilderConfig::load_from_file("no-such-config.ron");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
