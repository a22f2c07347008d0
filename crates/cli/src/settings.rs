use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use barscan_core::camera::domain::camera_request::CameraRequest;
use barscan_core::detection::infrastructure::decoder_factory::DecoderPreference;
use barscan_core::scanning::scan_session::SessionConfig;
use barscan_core::shared::constants::{DEFAULT_FRAME_INTERVAL, IDEAL_HEIGHT, IDEAL_WIDTH};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed settings {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecoderChoice {
    #[default]
    Auto,
    Bundled,
}

impl From<DecoderChoice> for DecoderPreference {
    fn from(choice: DecoderChoice) -> Self {
        match choice {
            DecoderChoice::Auto => DecoderPreference::Auto,
            DecoderChoice::Bundled => DecoderPreference::Bundled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub device: Option<u32>,
    pub width: u32,
    pub height: u32,
    pub frame_interval_ms: u64,
    pub decoder: DecoderChoice,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device: None,
            width: IDEAL_WIDTH,
            height: IDEAL_HEIGHT,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL.as_millis() as u64,
            decoder: DecoderChoice::Auto,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("barscan").join("settings.json"))
    }

    /// Loads from the user config dir, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::Invalid(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.frame_interval_ms == 0 {
            return Err(SettingsError::Invalid(
                "frame interval must be at least 1 ms".into(),
            ));
        }
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            request: CameraRequest {
                ideal_width: self.width,
                ideal_height: self.height,
                device_index: self.device,
                ..CameraRequest::default()
            },
            frame_interval: Duration::from_millis(self.frame_interval_ms),
            decoder: self.decoder.into(),
        }
    }
}
