//! Configuration loading and typed config structures for Spikescope.
//!
//! The canonical configuration lives in `spikescope-config.yaml` next to
//! the binary. This module defines strongly-typed structs mirroring the
//! YAML structure and a loader that reads the file. All fields have
//! defaults matching the recording this tool was built around: a 633x633
//! surface, a 0.1 ms clock step, a 1 ms flash, playback starting 38 s
//! into the recording.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level replay configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReplayConfig {
    /// Clock, window, and notification timing.
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Render surface dimensions.
    #[serde(default)]
    pub surface: SurfaceConfig,

    /// Marker and background colors.
    #[serde(default)]
    pub colors: PaletteConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Input data location.
    #[serde(default)]
    pub data: DataConfig,
}

impl ReplayConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// Clock and visibility-window configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaybackConfig {
    /// How long a spike stays visible after firing, in seconds.
    #[serde(default = "default_flash_seconds")]
    pub flash_seconds: f64,

    /// Simulated seconds per clock tick.
    #[serde(default = "default_step_seconds")]
    pub step_seconds: f64,

    /// Simulated time at which playback starts; earlier spikes are
    /// filtered out by the loader.
    #[serde(default = "default_start_time_seconds")]
    pub start_time_seconds: f64,

    /// Simulated seconds between progress notifications.
    #[serde(default = "default_logging_interval_seconds")]
    pub logging_interval_seconds: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            flash_seconds: default_flash_seconds(),
            step_seconds: default_step_seconds(),
            start_time_seconds: default_start_time_seconds(),
            logging_interval_seconds: default_logging_interval_seconds(),
        }
    }
}

/// Render surface dimensions in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SurfaceConfig {
    /// Surface width in pixels.
    #[serde(default = "default_surface_side")]
    pub width: u32,

    /// Surface height in pixels.
    #[serde(default = "default_surface_side")]
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_surface_side(),
            height: default_surface_side(),
        }
    }
}

/// An RGB color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

/// Colors for the background and the two marker categories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaletteConfig {
    /// Surface clear color.
    #[serde(default = "default_background")]
    pub background: Rgb,

    /// Marker color for excitatory neurons.
    #[serde(default = "default_excitatory")]
    pub excitatory: Rgb,

    /// Marker color for inhibitory neurons.
    #[serde(default = "default_inhibitory")]
    pub inhibitory: Rgb,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            excitatory: default_excitatory(),
            inhibitory: default_inhibitory(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Input data location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataConfig {
    /// Directory containing `spikeTrains.csv`, `locations.csv`, and
    /// `neuronInfos.csv`.
    #[serde(default = "default_data_directory")]
    pub directory: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: default_data_directory(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_flash_seconds() -> f64 {
    10e-4
}

const fn default_step_seconds() -> f64 {
    1e-4
}

const fn default_start_time_seconds() -> f64 {
    38.0
}

const fn default_logging_interval_seconds() -> f64 {
    100e-3
}

const fn default_surface_side() -> u32 {
    633
}

const fn default_background() -> Rgb {
    Rgb {
        r: 255,
        g: 255,
        b: 255,
    }
}

const fn default_excitatory() -> Rgb {
    Rgb { r: 255, g: 0, b: 0 }
}

const fn default_inhibitory() -> Rgb {
    Rgb { r: 0, g: 0, b: 255 }
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_data_directory() -> String {
    ".".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_recording() {
        let config = ReplayConfig::default();
        assert!((config.playback.flash_seconds - 10e-4).abs() < f64::EPSILON);
        assert!((config.playback.step_seconds - 1e-4).abs() < f64::EPSILON);
        assert!((config.playback.start_time_seconds - 38.0).abs() < f64::EPSILON);
        assert_eq!(config.surface.width, 633);
        assert_eq!(config.surface.height, 633);
        assert_eq!(config.colors.background, Rgb { r: 255, g: 255, b: 255 });
        assert_eq!(config.colors.excitatory, Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(config.colors.inhibitory, Rgb { r: 0, g: 0, b: 255 });
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
playback:
  flash_seconds: 0.002
  step_seconds: 0.0002
  start_time_seconds: 12.5
  logging_interval_seconds: 0.5

surface:
  width: 800
  height: 600

colors:
  background:
    r: 0
    g: 0
    b: 0
  excitatory:
    r: 255
    g: 128
    b: 0
  inhibitory:
    r: 0
    g: 255
    b: 255

logging:
  level: debug

data:
  directory: /tmp/recording
";
        let config = ReplayConfig::parse(yaml).unwrap();
        assert!((config.playback.flash_seconds - 0.002).abs() < f64::EPSILON);
        assert!((config.playback.start_time_seconds - 12.5).abs() < f64::EPSILON);
        assert_eq!(config.surface.width, 800);
        assert_eq!(config.surface.height, 600);
        assert_eq!(config.colors.background, Rgb { r: 0, g: 0, b: 0 });
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.data.directory, "/tmp/recording");
    }

    #[test]
    fn parse_minimal_yaml_keeps_defaults() {
        let yaml = "surface:\n  width: 900\n";
        let config = ReplayConfig::parse(yaml).unwrap();
        assert_eq!(config.surface.width, 900);
        // Height and playback keep defaults.
        assert_eq!(config.surface.height, 633);
        assert!((config.playback.step_seconds - 1e-4).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(ReplayConfig::parse("").is_ok());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(matches!(
            ReplayConfig::parse("surface: [not, a, map]"),
            Err(ConfigError::Yaml { .. })
        ));
    }
}
