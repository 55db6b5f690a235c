use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use super::generate_subtitles_use_case::{GenerateSubtitlesUseCase, Outcome};
use super::progress_sink::ProgressSink;
use super::stage::Stage;
use super::video_job::VideoJob;

/// Messages sent from the worker thread to the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerMessage {
    Progress(Stage, String),
    Warning(String),
    Complete(PathBuf),
    Error(String),
}

/// Relays pipeline progress over a channel.
pub struct ChannelProgressSink {
    tx: Sender<WorkerMessage>,
}

impl ChannelProgressSink {
    pub fn new(tx: Sender<WorkerMessage>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn stage(&mut self, stage: Stage, message: &str) {
        // The UI may have gone away; the run continues regardless
        let _ = self
            .tx
            .send(WorkerMessage::Progress(stage, message.to_string()));
    }

    fn warning(&mut self, message: &str) {
        let _ = self.tx.send(WorkerMessage::Warning(message.to_string()));
    }
}

/// Runs one job on a background thread so the caller's UI thread stays
/// responsive. The channel closes after the terminal `Complete` or
/// `Error` message.
pub fn spawn(
    job: VideoJob,
    use_case: GenerateSubtitlesUseCase,
) -> (Receiver<WorkerMessage>, JoinHandle<()>) {
    let (tx, rx) = crossbeam_channel::unbounded::<WorkerMessage>();

    let handle = thread::spawn(move || {
        let mut sink = ChannelProgressSink::new(tx.clone());
        let message = match use_case.run_job(&job, &mut sink) {
            Outcome::Completed(report) => WorkerMessage::Complete(report.subtitle_path),
            Outcome::Failed(e) => WorkerMessage::Error(e.to_string()),
        };
        let _ = tx.send(message);
    });

    (rx, handle)
}
