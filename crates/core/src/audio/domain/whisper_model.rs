use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::constants::WHISPER_MODEL_BASE_URL;

/// Whisper model sizes offered to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhisperModel {
    Tiny,
    #[default]
    Base,
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown Whisper model '{0}' (expected one of: tiny, base, small, medium, large)")]
pub struct UnknownModel(pub String);

impl WhisperModel {
    pub const ALL: &[WhisperModel] = &[
        WhisperModel::Tiny,
        WhisperModel::Base,
        WhisperModel::Small,
        WhisperModel::Medium,
        WhisperModel::Large,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WhisperModel::Tiny => "tiny",
            WhisperModel::Base => "base",
            WhisperModel::Small => "small",
            WhisperModel::Medium => "medium",
            WhisperModel::Large => "large",
        }
    }

    /// Parses `identifier`, falling back to `default` for anything unknown.
    ///
    /// Returns the chosen model and whether the fallback was taken.
    pub fn parse_or(identifier: &str, default: WhisperModel) -> (WhisperModel, bool) {
        match identifier.parse() {
            Ok(model) => (model, false),
            Err(_) => (default, true),
        }
    }

    /// File name of the ggml weights published by whisper.cpp.
    pub fn file_name(&self) -> String {
        // "large" tracks the newest large checkpoint
        match self {
            WhisperModel::Large => "ggml-large-v3.bin".to_string(),
            other => format!("ggml-{}.bin", other.as_str()),
        }
    }

    pub fn download_url(&self) -> String {
        format!("{WHISPER_MODEL_BASE_URL}/{}", self.file_name())
    }
}

impl FromStr for WhisperModel {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        WhisperModel::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}

impl fmt::Display for WhisperModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("tiny", WhisperModel::Tiny)]
    #[case("base", WhisperModel::Base)]
    #[case("SMALL", WhisperModel::Small)]
    #[case(" medium ", WhisperModel::Medium)]
    #[case("large", WhisperModel::Large)]
    fn test_parse_known_identifiers(#[case] input: &str, #[case] expected: WhisperModel) {
        assert_eq!(input.parse::<WhisperModel>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_identifier_errors() {
        let err = "huge".parse::<WhisperModel>().unwrap_err();
        assert!(err.to_string().contains("huge"));
    }

    #[test]
    fn test_parse_or_falls_back_to_default() {
        assert_eq!(
            WhisperModel::parse_or("gigantic", WhisperModel::Base),
            (WhisperModel::Base, true)
        );
        assert_eq!(
            WhisperModel::parse_or("tiny", WhisperModel::Base),
            (WhisperModel::Tiny, false)
        );
    }

    #[test]
    fn test_default_is_base() {
        assert_eq!(WhisperModel::default(), WhisperModel::Base);
    }

    #[test]
    fn test_file_names() {
        assert_eq!(WhisperModel::Tiny.file_name(), "ggml-tiny.bin");
        assert_eq!(WhisperModel::Large.file_name(), "ggml-large-v3.bin");
        assert!(WhisperModel::Base
            .download_url()
            .ends_with("/resolve/main/ggml-base.bin"));
    }
}
