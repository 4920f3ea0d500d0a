// Editor configuration - grid geometry, event timing and device settings
// Stored as RON under the user's config directory; every field has a default.

use crate::sequencer::events::{DEFAULT_TICK_SCALE, DEFAULT_VELOCITY};
use crate::sequencer::{EventConverter, Tempo};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "pianoroll";
const CONFIG_FILE_NAME: &str = "config.ron";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Config write error: {0}")]
    Write(#[from] ron::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// User-tunable editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Width of a grid cell, also the time snapping unit
    pub cell_width: i64,
    /// Height of a pitch row
    pub row_height: i64,
    pub visible_width: i64,
    pub visible_height: i64,
    /// Distance from a note's end within which a press resizes it
    pub resize_gap: i64,
    /// Width of the first note created in a session
    pub default_note_width: i64,
    /// Duration a collapsed resize snaps back to
    pub min_note_width: i64,
    /// MIDI ticks per grid time unit
    pub tick_scale: i64,
    pub velocity: u8,
    pub tempo_bpm: f64,
    /// MIDI output port to audition and play through (first port when unset)
    pub midi_output_port: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            cell_width: 20,
            row_height: 20,
            visible_width: 800,
            visible_height: 400,
            resize_gap: 8,
            default_note_width: 40,
            min_note_width: 20,
            tick_scale: DEFAULT_TICK_SCALE,
            velocity: DEFAULT_VELOCITY,
            tempo_bpm: Tempo::REFERENCE_BPM,
            midi_output_port: None,
        }
    }
}

impl EditorConfig {
    /// Location of the config file, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: EditorConfig = ron::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default location, falling back to defaults
    ///
    /// The error of a config file that exists but cannot be used is returned
    /// next to the defaults, for the host to show.
    pub fn load_or_default() -> (Self, Option<ConfigError>) {
        match Self::default_path() {
            Some(path) => Self::load_or_default_at(&path),
            None => (Self::default(), None),
        }
    }

    pub fn load_or_default_at(path: &Path) -> (Self, Option<ConfigError>) {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return (Self::default(), None);
        }

        match Self::load(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded editor config");
                (config, None)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                (Self::default(), Some(e))
            }
        }
    }

    /// Write the config as pretty RON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("cell_width", self.cell_width),
            ("row_height", self.row_height),
            ("visible_width", self.visible_width),
            ("visible_height", self.visible_height),
            ("default_note_width", self.default_note_width),
            ("min_note_width", self.min_note_width),
            ("tick_scale", self.tick_scale),
        ];
        for (name, value) in sizes {
            if value <= 0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if self.resize_gap < 0 {
            return Err(ConfigError::Invalid(format!(
                "resize_gap must not be negative, got {}",
                self.resize_gap
            )));
        }

        if self.velocity > 127 {
            return Err(ConfigError::Invalid(format!(
                "velocity must be 0-127, got {}",
                self.velocity
            )));
        }

        if !(Tempo::MIN_BPM..=Tempo::MAX_BPM).contains(&self.tempo_bpm) {
            return Err(ConfigError::Invalid(format!(
                "tempo_bpm must be between {} and {}, got {}",
                Tempo::MIN_BPM,
                Tempo::MAX_BPM,
                self.tempo_bpm
            )));
        }

        Ok(())
    }

    pub fn tempo(&self) -> Tempo {
        Tempo::clamped(self.tempo_bpm)
    }

    pub fn converter(&self) -> EventConverter {
        EventConverter::new(self.tick_scale, self.velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.converter(), EventConverter::default());
        assert_eq!(config.tempo().bpm(), 120.0);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ron");
        std::fs::write(&path, "(cell_width: 10, midi_output_port: Some(\"Synth\"))").unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.cell_width, 10);
        assert_eq!(config.row_height, 20);
        assert_eq!(config.midi_output_port.as_deref(), Some("Synth"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.ron");

        let config = EditorConfig {
            tempo_bpm: 90.0,
            resize_gap: 4,
            ..EditorConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(EditorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = EditorConfig {
            cell_width: 0,
            ..EditorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = EditorConfig {
            tempo_bpm: 500.0,
            ..EditorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_fallback_reports_unusable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ron");

        let (config, error) = EditorConfig::load_or_default_at(&path);
        assert_eq!(config, EditorConfig::default());
        assert!(error.is_none());

        std::fs::write(&path, "(row_height: -3)").unwrap();
        let (config, error) = EditorConfig::load_or_default_at(&path);
        assert_eq!(config, EditorConfig::default());
        assert!(matches!(error, Some(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ron");
        std::fs::write(&path, "(cell_width: \"wide\")").unwrap();

        assert!(matches!(
            EditorConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
