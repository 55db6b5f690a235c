use std::fmt;

use crate::audio::domain::transcript::TranscriptSegment;

use super::cue::Cue;

/// Why a transcript segment did not become a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    EmptyText,
    EndBeforeStart,
    InvalidTime,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::EmptyText => write!(f, "empty text"),
            DropReason::EndBeforeStart => write!(f, "end before start"),
            DropReason::InvalidTime => write!(f, "negative or non-finite time"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroppedSegment {
    /// 0-based position in the transcript.
    pub position: usize,
    pub reason: DropReason,
}

/// Result of normalizing a transcript.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub cues: Vec<Cue>,
    pub dropped: Vec<DroppedSegment>,
}

/// Turns raw transcript segments into contiguous, validated cues.
///
/// Malformed segments are skipped rather than failing the run: the
/// recognizer occasionally emits empty or inverted segments. Order is
/// kept as received; nothing is re-sorted.
pub struct SegmentNormalizer;

impl SegmentNormalizer {
    pub fn normalize(segments: &[TranscriptSegment]) -> Normalized {
        let mut out = Normalized::default();

        for (position, segment) in segments.iter().enumerate() {
            let text = clean_text(&segment.text);
            match Self::check(segment, &text) {
                Ok(()) => {
                    let index = out.cues.len() + 1;
                    out.cues.push(Cue::new(
                        index,
                        segment.start_time,
                        segment.end_time,
                        text,
                    ));
                }
                Err(reason) => {
                    log::warn!(
                        "Dropping transcript segment {position} ({:.3}-{:.3}): {reason}",
                        segment.start_time,
                        segment.end_time
                    );
                    out.dropped.push(DroppedSegment { position, reason });
                }
            }
        }

        out
    }

    fn check(segment: &TranscriptSegment, text: &str) -> Result<(), DropReason> {
        let (start, end) = (segment.start_time, segment.end_time);
        if !start.is_finite() || !end.is_finite() || start < 0.0 || end < 0.0 {
            return Err(DropReason::InvalidTime);
        }
        if end < start {
            return Err(DropReason::EndBeforeStart);
        }
        if text.is_empty() {
            return Err(DropReason::EmptyText);
        }
        Ok(())
    }
}

/// Trims every line and removes blank ones. A blank line would end the
/// SRT block early.
fn clean_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::domain::srt::{parse_srt, render_srt};
    use rstest::rstest;

    fn seg(start: f64, end: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment::new(start, end, text)
    }

    #[test]
    fn test_malformed_middle_segment_dropped_indices_contiguous() {
        let result = SegmentNormalizer::normalize(&[
            seg(0.0, 1.0, "a"),
            seg(1.0, 0.5, "bad"),
            seg(2.0, 3.0, " c "),
        ]);

        assert_eq!(
            result.cues,
            vec![Cue::new(1, 0.0, 1.0, "a"), Cue::new(2, 2.0, 3.0, "c")]
        );
        assert_eq!(
            result.dropped,
            vec![DroppedSegment {
                position: 1,
                reason: DropReason::EndBeforeStart
            }]
        );
    }

    #[rstest]
    #[case(seg(0.0, 1.0, "   "), DropReason::EmptyText)]
    #[case(seg(0.0, 1.0, ""), DropReason::EmptyText)]
    #[case(seg(0.0, 1.0, " \n\r\n \n"), DropReason::EmptyText)]
    #[case(seg(2.0, 1.0, "x"), DropReason::EndBeforeStart)]
    #[case(seg(-1.0, 1.0, "x"), DropReason::InvalidTime)]
    #[case(seg(0.0, f64::NAN, "x"), DropReason::InvalidTime)]
    #[case(seg(f64::INFINITY, f64::INFINITY, "x"), DropReason::InvalidTime)]
    fn test_drop_reasons(#[case] segment: TranscriptSegment, #[case] reason: DropReason) {
        let result = SegmentNormalizer::normalize(&[segment]);
        assert!(result.cues.is_empty());
        assert_eq!(result.dropped[0].reason, reason);
    }

    #[test]
    fn test_zero_length_segment_with_text_is_kept() {
        let result = SegmentNormalizer::normalize(&[seg(4.0, 4.0, "blip")]);
        assert_eq!(result.cues, vec![Cue::new(1, 4.0, 4.0, "blip")]);
    }

    #[test]
    fn test_order_preserved_without_sorting() {
        let result = SegmentNormalizer::normalize(&[seg(5.0, 6.0, "late"), seg(1.0, 2.0, "early")]);
        let texts: Vec<_> = result.cues.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["late", "early"]);
        assert_eq!(result.cues[1].index, 2);
    }

    #[test]
    fn test_empty_input() {
        let result = SegmentNormalizer::normalize(&[]);
        assert!(result.cues.is_empty());
        assert!(result.dropped.is_empty());
    }

    #[test]
    fn test_unicode_text_trimmed() {
        let result = SegmentNormalizer::normalize(&[seg(0.0, 1.0, "\u{3000} Merhaba dünya! \n")]);
        assert_eq!(result.cues[0].text, "Merhaba dünya!");
    }

    #[test]
    fn test_inner_blank_lines_removed_so_document_parses_back() {
        let result = SegmentNormalizer::normalize(&[
            seg(0.0, 1.0, "first\n\nsecond"),
            seg(1.0, 2.0, "next"),
        ]);
        assert_eq!(result.cues[0].text, "first\nsecond");

        let cues = parse_srt(&render_srt(&result.cues)).unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "first\nsecond");
        assert_eq!(cues[1].index, 2);
        assert_eq!(cues[1].text, "next");
    }

    #[test]
    fn test_multiline_text_lines_trimmed() {
        let result = SegmentNormalizer::normalize(&[seg(0.0, 1.0, "  one  \r\n   \n two ")]);
        assert_eq!(result.cues[0].text, "one\ntwo");
    }
}
