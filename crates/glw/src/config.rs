//! Configuration system
//!
//! [`Config`] loads and saves any serde type as TOML or RON, picked by file
//! extension. [`WindowConfig`] describes the window and context to create.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match Format::of(path)? {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load from `path` when given, otherwise use the defaults
    fn load_or_default(path: Option<impl AsRef<Path>>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}

enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
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

    /// A value is out of range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Window and context settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Window width in screen coordinates
    pub width: u32,

    /// Window height in screen coordinates
    pub height: u32,

    /// Requested OpenGL version (major, minor)
    pub gl_version: (u32, u32),

    /// Request a core profile context
    pub core_profile: bool,

    /// Depth buffer bits
    pub depth_bits: u32,

    /// Stencil buffer bits
    pub stencil_bits: u32,

    /// MSAA samples, 0 disables multisampling
    pub samples: u32,

    /// Synchronize buffer swaps with the display refresh
    pub vsync: bool,

    /// Allow the user to resize the window
    pub resizable: bool,

    /// Generate driver objects as soon as wrappers are constructed
    pub auto_instantiate: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "glw".to_string(),
            width: 800,
            height: 600,
            gl_version: (3, 3),
            core_profile: true,
            depth_bits: 24,
            stencil_bits: 8,
            samples: 0,
            vsync: true,
            resizable: true,
            auto_instantiate: false,
        }
    }
}

impl Config for WindowConfig {}

impl WindowConfig {
    /// Check that the settings can describe a real window
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid {
                field: "width/height",
                reason: format!("{}x{} has no area", self.width, self.height),
            });
        }
        if self.gl_version < (3, 3) {
            return Err(ConfigError::Invalid {
                field: "gl_version",
                reason: format!(
                    "{}.{} is below the 3.3 minimum",
                    self.gl_version.0, self.gl_version.1
                ),
            });
        }
        if self.depth_bits > 32 || self.stencil_bits > 8 {
            return Err(ConfigError::Invalid {
                field: "depth_bits/stencil_bits",
                reason: format!("{}/{} exceeds 32/8", self.depth_bits, self.stencil_bits),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("glw_config_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = WindowConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gl_version, (3, 3));
        assert!(config.core_profile);
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_file("window.toml");
        let config = WindowConfig {
            title: "toml".to_string(),
            width: 1024,
            samples: 4,
            ..WindowConfig::default()
        };
        config.save_to_file(&path).unwrap();
        let loaded = WindowConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_partial_file_uses_defaults() {
        let path = temp_file("window.ron");
        std::fs::write(&path, "(title: \"ron\", vsync: false)").unwrap();
        let loaded = WindowConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.title, "ron");
        assert!(!loaded.vsync);
        assert_eq!(loaded.width, 800);
    }

    #[test]
    fn test_unsupported_and_missing() {
        let err = WindowConfig::default().save_to_file(temp_file("window.json")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));

        let err = WindowConfig::load_from_file(temp_file("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));

        let config = WindowConfig::load_or_default(None::<&Path>).unwrap();
        assert_eq!(config, WindowConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = WindowConfig {
            height: 0,
            ..WindowConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "width/height", .. })));

        let config = WindowConfig {
            gl_version: (2, 1),
            ..WindowConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "gl_version", .. })));
    }
}
