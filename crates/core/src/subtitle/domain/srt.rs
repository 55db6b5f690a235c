//! SubRip document rendering and parsing.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use super::cue::Cue;
use super::timestamp::parse_timestamp;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SrtParseError {
    #[error("line {line}: expected cue index, found '{found}'")]
    Index { line: usize, found: String },
    #[error("line {line}: expected 'start --> end', found '{found}'")]
    TimeRange { line: usize, found: String },
    #[error("line {line}: cue {index} has no text")]
    MissingText { line: usize, index: usize },
}

/// Renders cues as an SRT document: index, time range, text, blank line.
pub fn render_srt(cues: &[Cue]) -> String {
    let mut out = String::new();
    for cue in cues {
        out.push_str(&cue.index.to_string());
        out.push('\n');
        out.push_str(&cue.time_range());
        out.push('\n');
        out.push_str(&cue.text);
        out.push_str("\n\n");
    }
    out
}

/// Writes cues to `path` as UTF-8, replacing any existing file.
///
/// On error the file may be left partially written and must not be used.
pub fn write_srt(path: &Path, cues: &[Cue]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(render_srt(cues).as_bytes())?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

/// Parses an SRT document. Accepts CRLF line endings and a leading BOM.
pub fn parse_srt(input: &str) -> Result<Vec<Cue>, SrtParseError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut cues = Vec::new();
    let mut lines = input.lines().enumerate().peekable();

    loop {
        // Skip blank separator lines
        while matches!(lines.peek(), Some((_, l)) if l.trim().is_empty()) {
            lines.next();
        }
        let Some((idx_line, raw_index)) = lines.next() else {
            break;
        };
        let index: usize = raw_index
            .trim()
            .parse()
            .map_err(|_| SrtParseError::Index {
                line: idx_line + 1,
                found: raw_index.to_string(),
            })?;

        let (range_line, raw_range) = lines.next().ok_or(SrtParseError::TimeRange {
            line: idx_line + 2,
            found: String::new(),
        })?;
        let (start, end) = parse_range(raw_range).ok_or_else(|| SrtParseError::TimeRange {
            line: range_line + 1,
            found: raw_range.to_string(),
        })?;

        let mut text_lines = Vec::new();
        while let Some(&(_, l)) = lines.peek() {
            if l.trim().is_empty() {
                break;
            }
            text_lines.push(l);
            lines.next();
        }
        if text_lines.is_empty() {
            return Err(SrtParseError::MissingText {
                line: range_line + 2,
                index,
            });
        }

        cues.push(Cue::new(index, start, end, text_lines.join("\n")));
    }

    Ok(cues)
}

fn parse_range(line: &str) -> Option<(f64, f64)> {
    let (start, end) = line.split_once("-->")?;
    Some((parse_timestamp(start)?, parse_timestamp(end)?))
}
