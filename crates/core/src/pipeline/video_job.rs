use std::path::{Path, PathBuf};

use crate::audio::domain::whisper_model::WhisperModel;
use crate::shared::constants::{DEFAULT_LANGUAGE, DEFAULT_OUTPUT_ROOT, VIDEO_EXTENSIONS};
use crate::shared::settings::Settings;

use super::error::ValidationError;

/// One transcription request. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoJob {
    pub source_video: PathBuf,
    pub output_root: PathBuf,
    pub model: WhisperModel,
    pub language: String,
}

impl VideoJob {
    pub fn new(source_video: impl Into<PathBuf>) -> Self {
        Self {
            source_video: source_video.into(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            model: WhisperModel::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Builds a job from shell input.
    ///
    /// Missing or empty values take the defaults from `settings`. An unknown model
    /// identifier falls back to the configured default; the returned
    /// message describes the fallback so the shell can show it.
    pub fn from_input(
        source_video: &Path,
        output_root: Option<&Path>,
        model_identifier: Option<&str>,
        language: Option<&str>,
        settings: &Settings,
    ) -> (Self, Option<String>) {
        let (model, warning) = match non_empty(model_identifier) {
            Some(id) => match WhisperModel::parse_or(id, settings.model) {
                (model, true) => (
                    model,
                    Some(format!(
                        "Unknown model '{id}', using default '{}'",
                        settings.model
                    )),
                ),
                (model, false) => (model, None),
            },
            None => (settings.model, None),
        };

        let job = Self {
            source_video: source_video.to_path_buf(),
            output_root: output_root
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| settings.output_root.clone()),
            model,
            language: non_empty(language)
                .map(str::to_lowercase)
                .unwrap_or_else(|| settings.language.clone()),
        };
        (job, warning)
    }

    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }

    pub fn with_model(mut self, model: WhisperModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Checks the source video and language hint. Touches nothing on disk.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_video_path(&self.source_video)?;
        validate_language(&self.language)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

pub fn is_supported_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn validate_video_path(path: &Path) -> Result<(), ValidationError> {
    if !path.exists() {
        return Err(ValidationError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(ValidationError::NotAFile(path.to_path_buf()));
    }
    if !is_supported_video(path) {
        return Err(ValidationError::UnsupportedExtension {
            path: path.to_path_buf(),
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        });
    }
    Ok(())
}

fn validate_language(language: &str) -> Result<(), ValidationError> {
    let is_code =
        (2..=3).contains(&language.len()) && language.bytes().all(|b| b.is_ascii_lowercase());
    if language == "auto" || is_code {
        Ok(())
    } else {
        Err(ValidationError::InvalidLanguage(language.to_string()))
    }
}
