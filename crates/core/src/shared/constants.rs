pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "wmv"];

/// Sample rate of the scratch WAV handed to Whisper.
pub const WHISPER_SAMPLE_RATE: u32 = 16000;
pub const WHISPER_CHANNELS: u16 = 1;
pub const WHISPER_BITS_PER_SAMPLE: u16 = 16;

pub const WHISPER_MODEL_BASE_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

pub const DEFAULT_LANGUAGE: &str = "tr";
pub const DEFAULT_OUTPUT_ROOT: &str = "output";

pub const AUDIO_SUFFIX: &str = "_audio";
pub const AUDIO_EXTENSION: &str = "wav";
pub const SUBTITLE_EXTENSION: &str = "srt";
