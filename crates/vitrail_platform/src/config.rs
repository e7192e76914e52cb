//! Configuration system
//!
//! Strongly typed configuration with serde support for TOML and RON files,
//! selected by file extension. Window-creation options are expressed as plain
//! fields here and mapped onto [`WindowFlags`] when the window is created.

pub use serde::{Deserialize, Serialize};

use crate::platform::WindowFlags;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
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

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Window width in screen units
    pub width: u32,

    /// Window height in screen units
    pub height: u32,

    /// Whether the window is resizable
    pub resizable: bool,

    /// Whether to start in fullscreen
    pub fullscreen: bool,

    /// Whether the window has a border and title bar
    pub borderless: bool,

    /// Whether the window starts visible
    pub visible: bool,

    /// VSync setting
    pub vsync: bool,
}

impl WindowConfig {
    /// Map this configuration onto window-creation flags
    pub fn flags(&self) -> WindowFlags {
        let mut flags = WindowFlags::empty();
        flags.set(WindowFlags::RESIZABLE, self.resizable);
        flags.set(WindowFlags::FULLSCREEN, self.fullscreen);
        flags.set(WindowFlags::BORDERLESS, self.borderless);
        flags.set(WindowFlags::HIDDEN, !self.visible);
        flags.set(WindowFlags::VSYNC, self.vsync);
        flags
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Vitrail Application".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
            fullscreen: false,
            borderless: false,
            visible: true,
            vsync: true,
        }
    }
}

/// System configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Platform backend to select at startup
    pub backend: String,

    /// Main window configuration
    pub window: WindowConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            backend: "headless".to_string(),
            window: WindowConfig::default(),
        }
    }
}

impl Config for SystemConfig {}
impl Config for WindowConfig {}
