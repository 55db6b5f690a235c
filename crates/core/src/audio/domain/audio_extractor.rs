use std::path::Path;

/// Domain interface for pulling the audio track out of a video file.
pub trait AudioExtractor: Send {
    /// Decode the audio of `video_path` and write it to `dest` as mono,
    /// 16 kHz, 16-bit PCM WAV.
    ///
    /// On error no valid file is guaranteed to exist at `dest`.
    fn extract(&self, video_path: &Path, dest: &Path) -> Result<(), Box<dyn std::error::Error>>;
}
