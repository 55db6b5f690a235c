use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::shared::constants::{AUDIO_EXTENSION, AUDIO_SUFFIX, SUBTITLE_EXTENSION};

/// Artifact locations for one video.
///
/// Everything lives in `<output_root>/<video stem>/`: the scratch audio as
/// `<stem>_audio.wav` and the subtitles as `<stem>.srt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub job_dir: PathBuf,
    pub audio: PathBuf,
    pub subtitle: PathBuf,
}

impl OutputPaths {
    /// Computes the paths without touching the filesystem.
    pub fn derive(source_video: &Path, output_root: &Path) -> Self {
        let stem = source_video
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());

        let job_dir = output_root.join(&stem);
        Self {
            audio: job_dir.join(format!("{stem}{AUDIO_SUFFIX}.{AUDIO_EXTENSION}")),
            subtitle: job_dir.join(format!("{stem}.{SUBTITLE_EXTENSION}")),
            job_dir,
        }
    }

    /// Derives the paths and creates the job directory. Safe to call
    /// repeatedly for the same job.
    pub fn resolve(source_video: &Path, output_root: &Path) -> io::Result<Self> {
        let paths = Self::derive(source_video, output_root);
        fs::create_dir_all(&paths.job_dir)?;
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_derive_names_from_video_stem() {
        let paths = OutputPaths::derive(Path::new("/videos/My Talk.final.mp4"), Path::new("out"));
        assert_eq!(paths.job_dir, PathBuf::from("out/My Talk.final"));
        assert_eq!(paths.audio, PathBuf::from("out/My Talk.final/My Talk.final_audio.wav"));
        assert_eq!(paths.subtitle, PathBuf::from("out/My Talk.final/My Talk.final.srt"));
        assert_ne!(paths.audio, paths.subtitle);
    }

    #[test]
    fn test_resolve_creates_nested_directory() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("a").join("b");
        let paths = OutputPaths::resolve(Path::new("clip.mkv"), &root).unwrap();
        assert!(paths.job_dir.is_dir());
        assert_eq!(paths.job_dir, root.join("clip"));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let first = OutputPaths::resolve(Path::new("clip.mp4"), tmp.path()).unwrap();
        fs::write(&first.subtitle, "keep").unwrap();
        let second = OutputPaths::resolve(Path::new("clip.mp4"), tmp.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&second.subtitle).unwrap(), "keep");
    }

    #[test]
    fn test_resolve_fails_when_root_is_a_file() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("file");
        fs::write(&root, b"x").unwrap();
        assert!(OutputPaths::resolve(Path::new("clip.mp4"), &root).is_err());
    }
}
