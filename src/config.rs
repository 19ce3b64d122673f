//! Engine configuration.
//!
//! All tunables live in one immutable [`EngineConfig`] value that is handed to
//! the geometry kernel, the annotator and the renderer when they are built.
//! The configuration can be exported to and imported from JSON.

use serde::{Deserialize, Serialize};

use crate::constants::{self, zoom};
use crate::model::Color;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Engine configuration shared by every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Label font size in points
    pub font_size: f64,
    /// Label font family
    pub font_family: String,

    /// Offset of the index label from its point
    pub index_shifting: f64,
    /// Offset of the distance label from the segment midpoint
    pub distance_shifting: f64,
    /// Short offset of the degree label
    pub degree_shifting_base: f64,
    /// Long offset of the degree label (labels extending to the left)
    pub degree_shifting_more: f64,

    /// Dot diameter, also the hit-test radius
    pub point_width: f64,
    /// Stroke width of lines and circles
    pub line_width: f64,
    /// Stroke width of angle arcs
    pub angle_width: f64,

    /// Colour used for new entities until another one is picked
    pub default_color: String,
    /// Palette offered to the user
    pub color_list: Vec<String>,

    /// Indentation of exported JSON
    pub indent: usize,

    /// For ∠ABC the label radius is `min(|BA|, |BC|) * ratio_to_radius`
    pub ratio_to_radius: f64,

    /// Distance floor
    pub eps: f64,
    /// Large constant K for helper points
    pub base: f64,

    /// Smallest zoom level in percent
    pub zoom_min_percent: u32,
    /// Largest zoom level in percent
    pub zoom_max_percent: u32,
    /// Zoom increment in percent
    pub zoom_step_percent: u32,

    /// Log verbosity level
    pub log_level: LogLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            font_size: constants::DEFAULT_FONT_SIZE,
            font_family: "Consolas".to_string(),
            index_shifting: 3.0,
            distance_shifting: 8.0,
            degree_shifting_base: 15.0,
            degree_shifting_more: 30.0,
            point_width: constants::DEFAULT_POINT_WIDTH,
            line_width: constants::DEFAULT_LINE_WIDTH,
            angle_width: constants::DEFAULT_ANGLE_WIDTH,
            default_color: "red".to_string(),
            color_list: ["red", "green", "blue", "cyan", "yellow", "black", "white", "gray"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            indent: 2,
            ratio_to_radius: constants::DEFAULT_RATIO_TO_RADIUS,
            eps: constants::DEFAULT_EPS,
            base: constants::DEFAULT_BASE,
            zoom_min_percent: zoom::MIN_PERCENT,
            zoom_max_percent: zoom::MAX_PERCENT,
            zoom_step_percent: zoom::STEP_PERCENT,
            log_level: LogLevel::default(),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hit-test radius: a click selects a point closer than this.
    pub fn hit_radius(&self) -> f64 {
        self.point_width - self.eps
    }

    /// The default drawing colour.
    ///
    /// Falls back to red when the configured name does not parse; `validate`
    /// rejects such configurations up front.
    pub fn default_color(&self) -> Color {
        Color::parse(&self.default_color).unwrap_or(Color::RED)
    }

    /// Parsed palette, skipping names that do not parse.
    pub fn palette(&self) -> Vec<Color> {
        self.color_list
            .iter()
            .filter_map(|name| Color::parse(name).ok())
            .collect()
    }

    /// Check that the values can drive the engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.eps > 0.0) {
            return Err(ConfigError::invalid("eps must be positive"));
        }
        if !(self.base > 0.0) {
            return Err(ConfigError::invalid("base must be positive"));
        }
        if !(self.point_width > 2.0 * self.eps) {
            return Err(ConfigError::invalid("point_width must exceed 2 * eps"));
        }
        if !(self.ratio_to_radius > 0.0) {
            return Err(ConfigError::invalid("ratio_to_radius must be positive"));
        }
        if self.zoom_min_percent == 0
            || self.zoom_min_percent > self.zoom_max_percent
            || self.zoom_step_percent == 0
        {
            return Err(ConfigError::invalid(format!(
                "zoom range {}..{} step {} is not usable",
                self.zoom_min_percent, self.zoom_max_percent, self.zoom_step_percent
            )));
        }
        if Color::parse(&self.default_color).is_err() {
            return Err(ConfigError::invalid(format!(
                "default_color '{}' is not a colour",
                self.default_color
            )));
        }
        Ok(())
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from an explicit path.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "medmark-config.json"
    }

    /// Get the default config file path for auto-load/save.
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("medmark").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("medmark")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the given path, creating parent directories.
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A value is out of its usable range
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}
