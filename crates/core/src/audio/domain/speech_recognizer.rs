use std::path::Path;

use super::transcript::TranscriptSegment;
use super::whisper_model::WhisperModel;

/// Domain interface for speech-to-text transcription.
///
/// Implementations read the scratch WAV at `audio_path` and return
/// segments in temporal order. An empty result is valid (silent audio).
pub trait SpeechRecognizer: Send {
    fn transcribe(
        &self,
        audio_path: &Path,
        model: WhisperModel,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>, Box<dyn std::error::Error>>;
}
