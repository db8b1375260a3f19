// Outcome classification into Report Portal status and issue vocabulary

use super::types::{IssueType, ItemStatus};
use crate::state::OutcomeKind;

/// Status and optional issue type a finished leaf is reported with
pub fn classify(kind: OutcomeKind) -> (ItemStatus, Option<IssueType>) {
    match kind {
        OutcomeKind::Success => (ItemStatus::Passed, None),
        OutcomeKind::ExpectedFailure => (ItemStatus::Passed, None),
        OutcomeKind::Skipped => (ItemStatus::Skipped, Some(IssueType::NoDefect)),
        OutcomeKind::Failure => (ItemStatus::Failed, Some(IssueType::ProductBug)),
        OutcomeKind::Error => (ItemStatus::Failed, Some(IssueType::AutomationBug)),
        OutcomeKind::UnexpectedSuccess => (ItemStatus::Failed, None),
        OutcomeKind::Unknown => (ItemStatus::Failed, Some(IssueType::ToInvestigate)),
    }
}
