use super::timestamp::format_timestamp;

/// One timed subtitle entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Cue {
    /// 1-based position in the emitted document.
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Cue {
    pub fn new(index: usize, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            index,
            start,
            end,
            text: text.into(),
        }
    }

    /// The `start --> end` line of an SRT block.
    pub fn time_range(&self) -> String {
        format!(
            "{} --> {}",
            format_timestamp(self.start),
            format_timestamp(self.end)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range() {
        let cue = Cue::new(1, 3.0, 5.0, "there");
        assert_eq!(cue.time_range(), "00:00:03,000 --> 00:00:05,000");
    }
}
