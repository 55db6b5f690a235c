pub mod audio_extractor;
pub mod audio_segment;
pub mod speech_recognizer;
pub mod transcript;
pub mod whisper_model;
