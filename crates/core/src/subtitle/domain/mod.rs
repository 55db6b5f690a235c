pub mod cue;
pub mod segment_normalizer;
pub mod srt;
pub mod timestamp;
