// Outcomes reported by the runner for a leaf

use serde::Serialize;

/// Outcome classification without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OutcomeKind {
    Success,
    Failure,
    Error,
    Skipped,
    ExpectedFailure,
    UnexpectedSuccess,
    Unknown,
}

impl OutcomeKind {
    pub const ALL: [OutcomeKind; 7] = [
        OutcomeKind::Success,
        OutcomeKind::Failure,
        OutcomeKind::Error,
        OutcomeKind::Skipped,
        OutcomeKind::ExpectedFailure,
        OutcomeKind::UnexpectedSuccess,
        OutcomeKind::Unknown,
    ];
}

/// Outcome together with the diagnostic text the runner attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Success,
    /// Assertion failure with its formatted traceback
    Failure(String),
    /// Unexpected exception with its formatted traceback
    Error(String),
    /// Skip with the reason given
    Skipped(String),
    ExpectedFailure(String),
    UnexpectedSuccess,
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Success => OutcomeKind::Success,
            Outcome::Failure(_) => OutcomeKind::Failure,
            Outcome::Error(_) => OutcomeKind::Error,
            Outcome::Skipped(_) => OutcomeKind::Skipped,
            Outcome::ExpectedFailure(_) => OutcomeKind::ExpectedFailure,
            Outcome::UnexpectedSuccess => OutcomeKind::UnexpectedSuccess,
        }
    }

    /// Line kept for the issue comment, if this outcome contributes one.
    ///
    /// Skip reasons are kept verbatim. Tracebacks keep their last non-blank
    /// line, which is where the exception summary lives.
    pub fn comment(&self) -> Option<String> {
        match self {
            Outcome::Skipped(reason) => Some(reason.clone()),
            Outcome::Failure(text) | Outcome::Error(text) => last_non_blank_line(text),
            _ => None,
        }
    }
}

pub fn last_non_blank_line(text: &str) -> Option<String> {
    text.lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_non_blank_line_skips_trailing_blanks() {
        let text =
            "Traceback (most recent call last):\n  File \"x.py\"\nAssertionError: x != y\n\n   \n";
        assert_eq!(
            last_non_blank_line(text),
            Some("AssertionError: x != y".to_string())
        );
    }

    #[test]
    fn test_last_non_blank_line_keeps_indentation() {
        assert_eq!(
            last_non_blank_line("first\n    indented tail\n"),
            Some("    indented tail".to_string())
        );
    }

    #[test]
    fn test_last_non_blank_line_of_blank_text() {
        assert_eq!(last_non_blank_line("\n \n"), None);
        assert_eq!(last_non_blank_line(""), None);
    }

    #[test]
    fn test_skip_reason_kept_verbatim() {
        let outcome = Outcome::Skipped("Reason for skipping.".to_string());
        assert_eq!(outcome.comment(), Some("Reason for skipping.".to_string()));
        assert_eq!(outcome.kind(), OutcomeKind::Skipped);
    }

    #[test]
    fn test_expected_failure_contributes_no_comment() {
        let outcome = Outcome::ExpectedFailure("Exception message.".to_string());
        assert_eq!(outcome.comment(), None);
    }
}
