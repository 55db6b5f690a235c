use std::path::{Path, PathBuf};

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::domain::speech_recognizer::SpeechRecognizer;
use crate::audio::domain::transcript::TranscriptSegment;
use crate::audio::domain::whisper_model::WhisperModel;
use crate::shared::model_resolver;

use super::wav::read_scratch_wav;

/// Where the recognizer finds ggml weights.
#[derive(Debug, Clone)]
enum ModelSource {
    /// Look up the requested model via the resolver (cache, bundled dir, download).
    Resolve {
        bundled_dir: Option<PathBuf>,
        progress: Option<fn(u64, u64)>,
    },
    /// Always use this file, whatever model the job asked for.
    Fixed(PathBuf),
}

/// Speech recognizer using whisper.cpp via whisper-rs.
///
/// Produces segment-level timestamps from the scratch WAV.
#[derive(Debug)]
pub struct WhisperRecognizer {
    source: ModelSource,
}

impl WhisperRecognizer {
    /// Resolve weights per job, preferring `bundled_dir` over downloading.
    pub fn new(bundled_dir: Option<&Path>) -> Self {
        Self {
            source: ModelSource::Resolve {
                bundled_dir: bundled_dir.map(Path::to_path_buf),
                progress: None,
            },
        }
    }

    /// Report `(downloaded, total)` bytes while fetching missing weights.
    /// Has no effect on a recognizer built from a fixed model path.
    pub fn with_download_progress(mut self, callback: fn(u64, u64)) -> Self {
        if let ModelSource::Resolve { progress, .. } = &mut self.source {
            *progress = Some(callback);
        }
        self
    }

    /// Use a specific weights file.
    pub fn with_model_path(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !model_path.exists() {
            return Err(format!("Whisper model not found at: {}", model_path.display()).into());
        }
        Ok(Self {
            source: ModelSource::Fixed(model_path.to_path_buf()),
        })
    }

    fn model_path(&self, model: WhisperModel) -> Result<PathBuf, Box<dyn std::error::Error>> {
        match &self.source {
            ModelSource::Fixed(path) => Ok(path.clone()),
            ModelSource::Resolve {
                bundled_dir,
                progress,
            } => {
                let progress = progress.map(|f| Box::new(f) as model_resolver::ProgressFn);
                Ok(model_resolver::resolve(model, bundled_dir.as_deref(), progress)?)
            }
        }
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(
        &self,
        audio_path: &Path,
        model: WhisperModel,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>, Box<dyn std::error::Error>> {
        let audio = read_scratch_wav(audio_path)?;
        if audio.is_empty() {
            return Ok(Vec::new());
        }

        let model_path = self.model_path(model)?;
        log::info!(
            "Transcribing {:.1}s of audio with {} ({})",
            audio.duration(),
            model,
            model_path.display()
        );

        let ctx = WhisperContext::new_with_params(
            model_path.to_str().ok_or("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| format!("Failed to load Whisper model: {e}"))?;

        let mut state = ctx
            .create_state()
            .map_err(|e| format!("Failed to create Whisper state: {e}"))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(language));
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(num_cpus().min(8) as i32);

        state
            .full(params, audio.samples())
            .map_err(|e| format!("Whisper inference failed: {e}"))?;

        let mut segments = Vec::new();
        let num_segments = state.full_n_segments();

        for seg_idx in 0..num_segments {
            let segment = match state.get_segment(seg_idx) {
                Some(s) => s,
                None => continue,
            };

            let text = segment
                .to_str_lossy()
                .map_err(|e| format!("Failed to read segment {seg_idx} text: {e}"))?;

            // Segment timestamps are in centiseconds (10ms units)
            segments.push(TranscriptSegment::new(
                segment.start_timestamp() as f64 / 100.0,
                segment.end_timestamp() as f64 / 100.0,
                text.into_owned(),
            ));
        }

        Ok(segments)
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::domain::audio_segment::AudioSegment;
    use crate::audio::infrastructure::wav::write_scratch_wav;
    use tempfile::TempDir;

    #[test]
    fn test_with_model_path_nonexistent_returns_error() {
        let result = WhisperRecognizer::with_model_path(Path::new("/nonexistent/model.bin"));
        let err = result.unwrap_err().to_string();
        assert!(
            err.contains("not found"),
            "Expected 'not found' in error, got: {err}"
        );
    }

    #[test]
    fn test_fixed_source_ignores_requested_model() {
        let tmp = TempDir::new().unwrap();
        let weights = tmp.path().join("custom.bin");
        std::fs::write(&weights, b"weights").unwrap();

        let recognizer = WhisperRecognizer::with_model_path(&weights).unwrap();
        assert_eq!(recognizer.model_path(WhisperModel::Large).unwrap(), weights);
    }

    #[test]
    fn test_resolving_source_finds_bundled_weights() {
        let tmp = TempDir::new().unwrap();
        let bundled = tmp.path().join("ggml-tiny.bin");
        std::fs::write(&bundled, b"weights").unwrap();

        let recognizer = WhisperRecognizer::new(Some(tmp.path())).with_download_progress(|_, _| {});
        // A copy in the user cache takes precedence over the bundled one
        let resolved = recognizer.model_path(WhisperModel::Tiny).unwrap();
        assert_eq!(resolved.file_name().unwrap(), "ggml-tiny.bin");
        assert!(resolved.exists());
    }

    #[test]
    fn test_download_progress_ignored_for_fixed_path() {
        let tmp = TempDir::new().unwrap();
        let weights = tmp.path().join("custom.bin");
        std::fs::write(&weights, b"weights").unwrap();

        let recognizer = WhisperRecognizer::with_model_path(&weights)
            .unwrap()
            .with_download_progress(|_, _| {});
        assert!(matches!(recognizer.source, ModelSource::Fixed(_)));
    }

    #[test]
    fn test_missing_audio_file_errors() {
        let recognizer = WhisperRecognizer::new(None);
        let result =
            recognizer.transcribe(Path::new("/nonexistent/a.wav"), WhisperModel::Tiny, "en");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_audio_yields_no_segments() {
        let tmp = TempDir::new().unwrap();
        let wav = tmp.path().join("silence.wav");
        write_scratch_wav(&wav, &AudioSegment::new(Vec::new(), 16000, 1)).unwrap();

        let recognizer = WhisperRecognizer::new(None);
        let segments = recognizer.transcribe(&wav, WhisperModel::Tiny, "en").unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    #[ignore] // Requires whisper model download
    fn test_transcribe_does_not_crash_on_sine_wave() {
        let tmp = TempDir::new().unwrap();
        let wav = tmp.path().join("tone.wav");
        let sample_rate = 16000u32;
        let len = (3.0 * sample_rate as f64) as usize;
        let samples: Vec<f32> = (0..len)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                (2.0 * std::f64::consts::PI * 440.0 * t).sin() as f32 * 0.5
            })
            .collect();
        write_scratch_wav(&wav, &AudioSegment::new(samples, sample_rate, 1)).unwrap();

        let recognizer = WhisperRecognizer::new(None);
        let result = recognizer.transcribe(&wav, WhisperModel::Tiny, "en");
        assert!(result.is_ok(), "Transcription should not error: {result:?}");
    }
}
