pub mod ffmpeg_audio_extractor;
pub mod wav;
pub mod whisper_recognizer;
