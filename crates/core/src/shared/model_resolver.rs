use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::audio::domain::whisper_model::WhisperModel;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Resolve the ggml weights for a Whisper model, checking local copies before
/// downloading.
///
/// Resolution order:
/// 1. User cache directory (platform-specific)
/// 2. Bundled directory (e.g. `--models-dir`)
/// 3. Download from the whisper.cpp model repository into the cache
pub fn resolve(
    model: WhisperModel,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cache_dir = model_cache_dir()?;
    resolve_in(&cache_dir, model, bundled_dir, progress)
}

fn resolve_in(
    cache_dir: &Path,
    model: WhisperModel,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let name = model.file_name();

    let cached_path = cache_dir.join(&name);
    if cached_path.exists() {
        log::debug!("Using cached model {}", cached_path.display());
        return Ok(cached_path);
    }

    if let Some(dir) = bundled_dir {
        let bundled_path = dir.join(&name);
        if bundled_path.exists() {
            log::debug!("Using bundled model {}", bundled_path.display());
            return Ok(bundled_path);
        }
    }

    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    let url = model.download_url();
    log::info!("Downloading Whisper model '{model}' from {url}");
    download(&url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/srtforge/models/`
/// - Linux: `$XDG_CACHE_HOME/srtforge/models/` or `~/.cache/srtforge/models/`
/// - Windows: `%LOCALAPPDATA%/srtforge/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("srtforge").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("srtforge").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ModelResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    // Written under a .part name and renamed once complete
    let temp_path = dest.with_extension("part");
    let mut file = fs::File::create(&temp_path).map_err(|e| ModelResolveError::Write {
        path: temp_path.clone(),
        source: e,
    })?;

    let bytes = response.bytes().map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ModelResolveError::Download {
            url: url.to_string(),
            source: e,
        }
    })?;

    let chunk_size = 1024 * 1024; // 1MB
    for chunk in bytes.chunks(chunk_size) {
        file.write_all(chunk).map_err(|e| ModelResolveError::Write {
            path: temp_path.clone(),
            source: e,
        })?;
        downloaded += chunk.len() as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(|e| ModelResolveError::Write {
        path: temp_path.clone(),
        source: e,
    })?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_prefers_cached_file() {
        let tmp = TempDir::new().unwrap();
        let cached = tmp.path().join("ggml-tiny.bin");
        fs::write(&cached, b"cached weights").unwrap();

        let path = resolve_in(tmp.path(), WhisperModel::Tiny, None, None).unwrap();
        assert_eq!(path, cached);
    }

    #[test]
    fn test_resolve_falls_back_to_bundled_dir() {
        let tmp = TempDir::new().unwrap();
        let cache_dir = tmp.path().join("cache");
        let bundled_dir = tmp.path().join("bundled");
        fs::create_dir_all(&bundled_dir).unwrap();
        let bundled = bundled_dir.join("ggml-small.bin");
        fs::write(&bundled, b"bundled weights").unwrap();

        let path = resolve_in(&cache_dir, WhisperModel::Small, Some(&bundled_dir), None).unwrap();
        assert_eq!(path, bundled);
        assert!(!cache_dir.exists());
    }

    #[test]
    fn test_model_cache_dir_returns_path() {
        let path = model_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains("srtforge"));
        assert!(path.ends_with("models"));
    }

    #[test]
    fn test_download_invalid_url_returns_error() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("ggml-base.bin");
        let result = download("http://invalid.nonexistent.example.com/model", &dest, None);
        assert!(matches!(result, Err(ModelResolveError::Download { .. })));
    }

    #[test]
    fn test_download_atomic_no_partial_on_failure() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("ggml-base.bin");
        let _ = download("http://invalid.nonexistent.example.com/model", &dest, None);
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }
}
