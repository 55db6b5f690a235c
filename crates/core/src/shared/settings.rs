use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::audio::domain::whisper_model::WhisperModel;
use crate::shared::constants::{DEFAULT_LANGUAGE, DEFAULT_OUTPUT_ROOT};

/// User defaults applied when the shell does not override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub model: WhisperModel,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_output_root() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_ROOT)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: WhisperModel::default(),
            language: default_language(),
            output_root: default_output_root(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("srtforge").join("settings.json"))
    }

    /// Loads settings from the user config dir. Missing or unreadable
    /// files yield the defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed settings at {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> io::Result<PathBuf> {
        let path = Self::config_path()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no config directory"))?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }
}
