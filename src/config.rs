//! Configuration and color scheme management for mockterm.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.mockterm/config.toml`
//! - Built-in color schemes (default, dracula, nord, solarized-dark)
//! - The window geometry the terminal frame is drawn with
//!
//! # Configuration File
//!
//! ```toml
//! username = "terminal"
//! hostname = "terminal"
//!
//! # Color scheme: default, dracula, nord, solarized-dark
//! color_scheme = "default"
//!
//! # Glyph drawn after the pending input
//! cursor = "|"
//!
//! [window]
//! x = 2
//! y = 1
//! width = 75
//! height = 25
//! min_width = 25
//! min_height = 10
//! title = "bash"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::core::Identity;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config: {0}")]
    Write(#[source] io::Error),

    #[error("Could not determine config path")]
    NoHomeDir,
}

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// User shown in the prompt
    pub username: String,
    /// Host shown in the prompt
    pub hostname: String,
    /// Color scheme name
    pub color_scheme: String,
    /// Cursor glyph
    pub cursor: String,
    /// Window frame settings
    pub window: WindowConfig,
}

impl Default for Config {
    fn default() -> Self {
        let identity = Identity::default();
        Self {
            username: identity.username,
            hostname: identity.hostname,
            color_scheme: "default".to_string(),
            cursor: "|".to_string(),
            window: WindowConfig::default(),
        }
    }
}

/// Window frame configuration, in character cells.
///
/// The defaults correspond to a 600x400 pixel window at 20,20 with a
/// 200x150 minimum, using 8x16 pixel cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub min_width: u16,
    pub min_height: u16,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            x: 2,
            y: 1,
            width: 75,
            height: 25,
            min_width: 25,
            min_height: 10,
            title: "bash".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    pub fn load() -> Self {
        match Self::get_config_path() {
            Some(path) if path.exists() => Self::load_or_default(&path),
            _ => Self::default(),
        }
    }

    /// Load from `path`; a missing or malformed file yields the defaults
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::get_config_path().ok_or(ConfigError::NoHomeDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(ConfigError::Write)
    }

    /// Get config file path
    pub fn get_config_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Identity used for the prompt
    pub fn identity(&self) -> Identity {
        Identity {
            username: self.username.clone(),
            hostname: self.hostname.clone(),
        }
    }

    /// Get the color scheme
    pub fn get_color_scheme(&self) -> ColorScheme {
        ColorScheme::by_name(&self.color_scheme)
    }
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Color scheme definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub name: String,

    // Window body
    pub background: Color,
    pub foreground: Color,
    pub border: Color,

    // Title bar
    pub title_bar_bg: Color,
    pub title_fg: Color,
    pub dot_close: Color,
    pub dot_minimize: Color,
    pub dot_maximize: Color,

    // Cursor and scroll indicator
    pub cursor: Color,
    pub indicator_fg: Color,

    // Alert box
    pub alert_bg: Color,
    pub alert_fg: Color,
    pub alert_border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_scheme()
    }
}

impl ColorScheme {
    /// Default color scheme: green on near-black, gray chrome
    pub fn default_scheme() -> Self {
        Self {
            name: "default".to_string(),

            background: Color::new(17, 24, 39),
            foreground: Color::new(74, 222, 128),
            border: Color::new(55, 65, 81),

            title_bar_bg: Color::new(31, 41, 55),
            title_fg: Color::new(156, 163, 175),
            dot_close: Color::new(239, 68, 68),
            dot_minimize: Color::new(234, 179, 8),
            dot_maximize: Color::new(34, 197, 94),

            cursor: Color::new(74, 222, 128),
            indicator_fg: Color::new(156, 163, 175),

            alert_bg: Color::new(243, 244, 246),
            alert_fg: Color::new(17, 24, 39),
            alert_border: Color::new(239, 68, 68),
        }
    }

    /// Dracula scheme
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),

            background: Color::new(40, 42, 54),
            foreground: Color::new(248, 248, 242),
            border: Color::new(68, 71, 90),

            title_bar_bg: Color::new(68, 71, 90),
            title_fg: Color::new(248, 248, 242),
            dot_close: Color::new(255, 85, 85),
            dot_minimize: Color::new(241, 250, 140),
            dot_maximize: Color::new(80, 250, 123),

            cursor: Color::new(189, 147, 249),
            indicator_fg: Color::new(98, 114, 164),

            alert_bg: Color::new(68, 71, 90),
            alert_fg: Color::new(248, 248, 242),
            alert_border: Color::new(255, 85, 85),
        }
    }

    /// Nord scheme
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),

            background: Color::new(46, 52, 64),
            foreground: Color::new(216, 222, 233),
            border: Color::new(59, 66, 82),

            title_bar_bg: Color::new(59, 66, 82),
            title_fg: Color::new(216, 222, 233),
            dot_close: Color::new(191, 97, 106),
            dot_minimize: Color::new(235, 203, 139),
            dot_maximize: Color::new(163, 190, 140),

            cursor: Color::new(136, 192, 208),
            indicator_fg: Color::new(147, 161, 181),

            alert_bg: Color::new(76, 86, 106),
            alert_fg: Color::new(236, 239, 244),
            alert_border: Color::new(191, 97, 106),
        }
    }

    /// Solarized Dark scheme
    pub fn solarized_dark() -> Self {
        Self {
            name: "solarized-dark".to_string(),

            background: Color::new(0, 43, 54),
            foreground: Color::new(133, 153, 0),
            border: Color::new(7, 54, 66),

            title_bar_bg: Color::new(7, 54, 66),
            title_fg: Color::new(147, 161, 161),
            dot_close: Color::new(220, 50, 47),
            dot_minimize: Color::new(181, 137, 0),
            dot_maximize: Color::new(133, 153, 0),

            cursor: Color::new(38, 139, 210),
            indicator_fg: Color::new(101, 123, 131),

            alert_bg: Color::new(253, 246, 227),
            alert_fg: Color::new(0, 43, 54),
            alert_border: Color::new(220, 50, 47),
        }
    }

    /// Get scheme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dracula" => Self::dracula(),
            "nord" => Self::nord(),
            "solarized-dark" | "solarized_dark" | "solarized" => Self::solarized_dark(),
            _ => Self::default_scheme(),
        }
    }

    /// List available schemes
    pub fn list() -> Vec<&'static str> {
        vec!["default", "dracula", "nord", "solarized-dark"]
    }
}

/// `~/.mockterm`, created on first use
pub fn config_dir() -> Option<PathBuf> {
    let dir = home_dir()?.join(".mockterm");
    if !dir.exists() {
        let _ = fs::create_dir_all(&dir);
    }
    Some(dir)
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.identity(), Identity::default());
        assert_eq!(config.window.title, "bash");
        assert_eq!(config.get_color_scheme().name, "default");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
            username = "alice"
            color_scheme = "Nord"

            [window]
            width = 100
            "#,
        )
        .unwrap();

        assert_eq!(config.username, "alice");
        assert_eq!(config.hostname, "terminal");
        assert_eq!(config.window.width, 100);
        assert_eq!(config.window.height, 25);
        assert_eq!(config.get_color_scheme().name, "nord");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(Config::parse("username = ").is_err());
        assert!(Config::parse("[window]\nwidth = \"wide\"").is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("mockterm-config-{}.toml", std::process::id()));
        let mut config = Config::default();
        config.color_scheme = "dracula".to_string();
        config.window.title = "zsh".to_string();

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("mockterm-no-such-config.toml");
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Read { .. })));
        assert_eq!(Config::load_or_default(&path), Config::default());
    }

    #[test]
    fn test_scheme_lookup() {
        for name in ColorScheme::list() {
            assert_eq!(ColorScheme::by_name(name).name, name);
        }
        assert_eq!(ColorScheme::by_name("unknown").name, "default");
    }
}
