//! Engine settings
//!
//! Settings structs derive serde and live next to the binary as `.toml` or
//! `.ron`. The file extension picks the format; a missing or broken file
//! leaves the engine on its defaults.

use std::path::{Path, PathBuf};

pub use serde::{Deserialize, Serialize};

/// On-disk settings format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `*.toml`
    Toml,
    /// `*.ron`
    Ron,
}

impl ConfigFormat {
    /// Format named by the path's extension, ignoring case
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if extension.eq_ignore_ascii_case("ron") {
            Some(Self::Ron)
        } else {
            None
        }
    }

    fn parse<T: for<'de> Deserialize<'de>>(self, contents: &str) -> Result<T, String> {
        match self {
            Self::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
            Self::Ron => ron::from_str(contents).map_err(|e| e.to_string()),
        }
    }
}

/// Settings that can be read from a `.toml` or `.ron` file
pub trait Config: for<'de> Deserialize<'de> + Default {
    /// Read and parse a settings file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        format.parse(&contents).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse settings text in a known format
    fn parse_str(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        format.parse(contents).map_err(|message| ConfigError::Parse {
            path: PathBuf::new(),
            message,
        })
    }

    /// Read a settings file, keeping the defaults when it cannot be used
    fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Keeping default settings: {}", e);
                Self::default()
            }
        }
    }
}

/// Failure to read a settings file
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Settings file
        path: PathBuf,
        /// Underlying failure
        source: std::io::Error,
    },

    /// File contents do not match the settings layout
    #[error("cannot parse {}: {message}", path.display())]
    Parse {
        /// Settings file, empty for in-memory text
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Extension is neither `.toml` nor `.ron`
    #[error("unsupported settings format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Scene behaviour
    pub scene: SceneConfig,
}

impl Config for EngineConfig {}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Scene behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Draw bounding boxes, debug wireframes and bones after each entity
    pub debug_draw: bool,
    /// Skip entities whose cull sphere is outside the camera frustum
    pub frustum_culling: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            debug_draw: false,
            frustum_culling: true,
        }
    }
}

impl Config for SceneConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("engine.toml")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("dir.v2/engine.RON")), Some(ConfigFormat::Ron));
        assert_eq!(ConfigFormat::from_path(Path::new("engine.yaml")), None);
        assert_eq!(ConfigFormat::from_path(Path::new("toml")), None);
    }

    #[test]
    fn test_toml_partial_config_keeps_defaults() {
        let text = "[scene]\ndebug_draw = true\n";
        let config = EngineConfig::parse_str(text, ConfigFormat::Toml).unwrap();
        assert!(config.scene.debug_draw);
        assert!(config.scene.frustum_culling);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_ron_config() {
        let text = "(logging: (level: \"debug\"), scene: (debug_draw: false, frustum_culling: false))";
        let config = EngineConfig::parse_str(text, ConfigFormat::Ron).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(!config.scene.frustum_culling);
    }

    #[test]
    fn test_malformed_text_is_a_parse_error() {
        let result = SceneConfig::parse_str("debug_draw = = true", ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_unsupported_extension_is_rejected_before_reading() {
        let result = EngineConfig::load_from_file("/nonexistent/engine.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(path)) if path.ends_with("engine.yaml")));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let result = EngineConfig::load_from_file("/nonexistent/engine.toml");
        match result {
            Err(ConfigError::Io { path, .. }) => assert_eq!(path, Path::new("/nonexistent/engine.toml")),
            other => panic!("expected io error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = EngineConfig::load_or_default("/nonexistent/engine.toml");
        assert_eq!(config, EngineConfig::default());
    }
}
