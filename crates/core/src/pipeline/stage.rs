use std::fmt;

/// Lifecycle of a single subtitle run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Idle,
    Extracting,
    Transcribing,
    Normalizing,
    Serializing,
    CleaningUp,
    Done,
    Failed,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }

    /// Whether the pipeline may move from `self` to `next`.
    pub fn can_transition_to(&self, next: Stage) -> bool {
        use Stage::*;
        if self.is_terminal() {
            return false;
        }
        match (self, next) {
            (_, Failed) => true,
            (Idle, Extracting)
            | (Extracting, Transcribing)
            | (Transcribing, Normalizing)
            | (Normalizing, Serializing)
            | (Serializing, CleaningUp)
            | (CleaningUp, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Extracting => "extracting",
            Stage::Transcribing => "transcribing",
            Stage::Normalizing => "normalizing",
            Stage::Serializing => "serializing",
            Stage::CleaningUp => "cleaning up",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const HAPPY_PATH: &[Stage] = &[
        Stage::Idle,
        Stage::Extracting,
        Stage::Transcribing,
        Stage::Normalizing,
        Stage::Serializing,
        Stage::CleaningUp,
        Stage::Done,
    ];

    #[test]
    fn test_happy_path_is_allowed() {
        for pair in HAPPY_PATH.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_every_non_terminal_stage_can_fail() {
        for stage in &HAPPY_PATH[..HAPPY_PATH.len() - 1] {
            assert!(stage.can_transition_to(Stage::Failed), "{stage}");
        }
    }

    #[rstest]
    #[case(Stage::Idle, Stage::Transcribing)]
    #[case(Stage::Extracting, Stage::Serializing)]
    #[case(Stage::Transcribing, Stage::Extracting)]
    #[case(Stage::Done, Stage::Failed)]
    #[case(Stage::Failed, Stage::Idle)]
    #[case(Stage::Done, Stage::Idle)]
    fn test_illegal_transitions(#[case] from: Stage, #[case] to: Stage) {
        assert!(!from.can_transition_to(to));
    }

    #[test]
    fn test_terminal_stages() {
        assert!(Stage::Done.is_terminal());
        assert!(Stage::Failed.is_terminal());
        assert!(!Stage::CleaningUp.is_terminal());
    }
}
