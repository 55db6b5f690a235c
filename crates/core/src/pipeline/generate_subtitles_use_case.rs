use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::audio::domain::audio_extractor::AudioExtractor;
use crate::audio::domain::speech_recognizer::SpeechRecognizer;
use crate::subtitle::domain::segment_normalizer::SegmentNormalizer;
use crate::subtitle::domain::srt::write_srt;

use super::error::{CleanupWarning, SubtitleError, ValidationError};
use super::output_paths::OutputPaths;
use super::progress_sink::ProgressSink;
use super::stage::Stage;
use super::video_job::VideoJob;

/// What a successful run produced.
#[derive(Debug)]
pub struct RunReport {
    pub subtitle_path: PathBuf,
    pub cue_count: usize,
    /// Transcript segments skipped as malformed.
    pub dropped: usize,
    pub cleanup_warning: Option<CleanupWarning>,
}

/// Terminal result handed back to the host shell.
#[derive(Debug)]
pub enum Outcome {
    Completed(RunReport),
    Failed(SubtitleError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn subtitle_path(&self) -> Option<&Path> {
        match self {
            Outcome::Completed(report) => Some(&report.subtitle_path),
            Outcome::Failed(_) => None,
        }
    }
}

/// Generates an SRT file for one video.
///
/// Runs extraction, transcription, normalization and serialization in
/// order, stopping at the first failure. The scratch audio is removed
/// whenever extraction succeeded, whatever happens afterwards.
pub struct GenerateSubtitlesUseCase {
    extractor: Box<dyn AudioExtractor>,
    recognizer: Box<dyn SpeechRecognizer>,
}

impl GenerateSubtitlesUseCase {
    pub fn new(extractor: Box<dyn AudioExtractor>, recognizer: Box<dyn SpeechRecognizer>) -> Self {
        Self {
            extractor,
            recognizer,
        }
    }

    /// Host-facing entry point: never returns an error, the failure is
    /// reported to `sink` and carried in the outcome.
    pub fn run_job(&self, job: &VideoJob, sink: &mut dyn ProgressSink) -> Outcome {
        match self.execute(job, sink) {
            Ok(report) => Outcome::Completed(report),
            Err(e) => Outcome::Failed(e),
        }
    }

    pub fn execute(
        &self,
        job: &VideoJob,
        sink: &mut dyn ProgressSink,
    ) -> Result<RunReport, SubtitleError> {
        let mut run = Run::new(sink);
        let result = self.run_stages(job, &mut run);
        if let Err(ref e) = result {
            let failed_in = match run.stage {
                Stage::Idle => "validating".to_string(),
                stage => stage.to_string(),
            };
            run.advance(Stage::Failed, &format!("Failed while {failed_in}: {e}"));
        }
        run.sink.summary();
        result
    }

    fn run_stages(&self, job: &VideoJob, run: &mut Run<'_>) -> Result<RunReport, SubtitleError> {
        // 1. Validate before touching disk or collaborators
        job.validate()?;
        let paths = OutputPaths::resolve(&job.source_video, &job.output_root).map_err(|source| {
            ValidationError::OutputDir {
                path: job.output_root.clone(),
                source,
            }
        })?;

        // 2. Extract scratch audio
        run.advance(
            Stage::Extracting,
            &format!("Extracting audio from {}", job.source_video.display()),
        );
        // A leftover from an earlier run must not pass for fresh output
        remove_stale_scratch(&paths.audio)?;
        self.extractor
            .extract(&job.source_video, &paths.audio)
            .map_err(|e| SubtitleError::Extraction(e.to_string()))?;
        if !paths.audio.exists() {
            return Err(SubtitleError::Extraction(format!(
                "no audio was written to {}",
                paths.audio.display()
            )));
        }

        // 3. Transcribe; from here on the scratch file must be cleaned up
        run.advance(
            Stage::Transcribing,
            &format!(
                "Transcribing with Whisper model '{}' (language: {})",
                job.model, job.language
            ),
        );
        let segments = match self
            .recognizer
            .transcribe(&paths.audio, job.model, &job.language)
        {
            Ok(segments) => segments,
            Err(e) => {
                cleanup_scratch(&paths.audio, run);
                return Err(SubtitleError::Transcription(e.to_string()));
            }
        };

        // 4. Normalize
        run.advance(
            Stage::Normalizing,
            &format!("Normalizing {} transcript segment(s)", segments.len()),
        );
        let normalized = SegmentNormalizer::normalize(&segments);
        if !normalized.dropped.is_empty() {
            run.warning(&format!(
                "Dropped {} malformed transcript segment(s)",
                normalized.dropped.len()
            ));
        }

        // 5. Serialize
        run.advance(
            Stage::Serializing,
            &format!(
                "Writing {} cue(s) to {}",
                normalized.cues.len(),
                paths.subtitle.display()
            ),
        );
        if let Err(source) = write_srt(&paths.subtitle, &normalized.cues) {
            cleanup_scratch(&paths.audio, run);
            return Err(SubtitleError::Serialization {
                path: paths.subtitle.clone(),
                source,
            });
        }

        // 6. Clean up
        run.advance(
            Stage::CleaningUp,
            &format!("Removing scratch audio {}", paths.audio.display()),
        );
        let cleanup_warning = cleanup_scratch(&paths.audio, run);

        run.advance(
            Stage::Done,
            &format!("Subtitles written to {}", paths.subtitle.display()),
        );

        Ok(RunReport {
            subtitle_path: paths.subtitle,
            cue_count: normalized.cues.len(),
            dropped: normalized.dropped.len(),
            cleanup_warning,
        })
    }
}

/// Tracks the current stage and reports transitions to the sink.
struct Run<'a> {
    sink: &'a mut dyn ProgressSink,
    stage: Stage,
    stage_started: Instant,
}

impl<'a> Run<'a> {
    fn new(sink: &'a mut dyn ProgressSink) -> Self {
        Self {
            sink,
            stage: Stage::Idle,
            stage_started: Instant::now(),
        }
    }

    fn advance(&mut self, next: Stage, message: &str) {
        debug_assert!(
            self.stage.can_transition_to(next),
            "illegal transition {} -> {next}",
            self.stage
        );
        if self.stage != Stage::Idle {
            let ms = self.stage_started.elapsed().as_secs_f64() * 1000.0;
            self.sink.timing(self.stage, ms);
        }
        self.stage = next;
        self.stage_started = Instant::now();
        self.sink.stage(next, message);
    }

    fn warning(&mut self, message: &str) {
        self.sink.warning(message);
    }
}

fn remove_stale_scratch(path: &Path) -> Result<(), SubtitleError> {
    match fs::remove_file(path) {
        Ok(()) => {
            log::debug!("Removed stale scratch audio {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SubtitleError::Extraction(format!(
            "stale scratch audio {} could not be removed: {e}",
            path.display()
        ))),
    }
}

/// Best-effort removal of the scratch audio. A file that is already gone
/// counts as removed.
fn cleanup_scratch(path: &Path, run: &mut Run<'_>) -> Option<CleanupWarning> {
    match fs::remove_file(path) {
        Ok(()) => None,
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(source) => {
            let warning = CleanupWarning {
                path: path.to_path_buf(),
                source,
            };
            log::warn!("{warning}");
            run.warning(&warning.to_string());
            Some(warning)
        }
    }
}
