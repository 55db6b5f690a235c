use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Input problems detected before any collaborator is invoked.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("video file not found: {0}")]
    NotFound(PathBuf),
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),
    #[error("unsupported video format '{extension}' for {path} (expected one of: mp4, mkv, avi, mov, wmv)")]
    UnsupportedExtension { path: PathBuf, extension: String },
    #[error("invalid language hint '{0}' (expected a 2-3 letter code or 'auto')")]
    InvalidLanguage(String),
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Terminal failure of a subtitle run.
#[derive(Error, Debug)]
pub enum SubtitleError {
    #[error("invalid job: {0}")]
    Validation(#[from] ValidationError),
    #[error("audio extraction failed: {0}")]
    Extraction(String),
    #[error("transcription failed: {0}")]
    Transcription(String),
    #[error("failed to write subtitles to {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Non-fatal failure to remove the scratch audio file.
#[derive(Error, Debug)]
#[error("could not delete scratch audio {path}: {source}")]
pub struct CleanupWarning {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}
