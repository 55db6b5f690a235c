/// One raw unit of transcription output, before validation.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl TranscriptSegment {
    pub fn new(start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start_time,
            end_time,
        }
    }
}
