//! Configuration system
//!
//! Settings are plain serde structs loaded from `.toml` or `.ron` files and
//! handed to the scene as already-parsed values.

mod settings;

pub use serde::{Serialize, Deserialize};
pub use settings::{CameraSettings, CullingSettings, SceneSettings};

/// Settings file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML document
    Toml,
    /// RON document
    Ron,
}

impl ConfigFormat {
    /// Format chosen by a path's extension
    pub fn from_path(path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            Ok(Self::Toml)
        } else if path.ends_with(".ron") {
            Ok(Self::Ron)
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Toml => f.write_str("TOML"),
            Self::Ron => f.write_str("RON"),
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&contents, format, path)
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let contents = match format {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| e.to_string()),
        }
        .map_err(|message| ConfigError::Serialize { format, message })?;

        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Parse from TOML text
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::parse(contents, ConfigFormat::Toml, "<string>")
    }

    /// Parse from RON text
    fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        Self::parse(contents, ConfigFormat::Ron, "<string>")
    }

    /// Parse `contents` in `format`; `origin` names the source in errors
    fn parse(contents: &str, format: ConfigFormat, origin: &str) -> Result<Self, ConfigError> {
        let parsed = match format {
            ConfigFormat::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
            ConfigFormat::Ron => ron::from_str(contents).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ConfigError::Parse {
            origin: origin.to_string(),
            format,
            message,
        })
    }
}

/// Settings loading errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Reading or writing a settings file failed
    #[error("Cannot access settings file '{path}': {source}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Settings text did not parse
    #[error("Invalid {format} settings in {origin}: {message}")]
    Parse {
        /// File path, or `<string>` for in-memory text
        origin: String,
        /// Format it was parsed as
        format: ConfigFormat,
        /// Parser message
        message: String,
    },

    /// Settings could not be written out
    #[error("Cannot write {format} settings: {message}")]
    Serialize {
        /// Target format
        format: ConfigFormat,
        /// Serializer message
        message: String,
    },

    /// Path has neither a `.toml` nor a `.ron` extension
    #[error("Unsupported settings format '{0}', expected .toml or .ron")]
    UnsupportedFormat(String),
}
