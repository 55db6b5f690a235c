pub mod background_worker;
pub mod error;
pub mod generate_subtitles_use_case;
pub mod output_paths;
pub mod progress_sink;
pub mod stage;
pub mod video_job;
