//! Candidate ordering.
//!
//! Candidates are grouped by their exact kind, each group is sorted by display text, and the
//! groups are concatenated by a fixed priority:
//!
//! | Kind              | Priority |
//! |-------------------|----------|
//! | markup extension  | 0        |
//! | namespace         | 1        |
//! | property          | 2        |
//! | attached property | 3        |
//! | static property   | 4        |
//! | event             | 5        |
//! | attached event    | 6        |
//! | class             | 7        |
//! | enum              | 8        |
//! | none              | 9        |
//!
//! Any other kind, including combined ones, ranks by its raw flag value.

use std::cmp::Ordering;

use crate::completion::item::{Completion, CompletionKind};

const PRIORITIES: [CompletionKind; 9] = [
    CompletionKind::MARKUP_EXTENSION,
    CompletionKind::NAMESPACE,
    CompletionKind::PROPERTY,
    CompletionKind::ATTACHED_PROPERTY,
    CompletionKind::STATIC_PROPERTY,
    CompletionKind::EVENT,
    CompletionKind::ATTACHED_EVENT,
    CompletionKind::CLASS,
    CompletionKind::ENUM,
];

/// Rank of a kind group, lower first.
#[must_use]
pub fn priority(kind: CompletionKind) -> u32 {
    if kind.is_empty() {
        return 9;
    }
    PRIORITIES
        .iter()
        .position(|k| *k == kind)
        .and_then(|rank| u32::try_from(rank).ok())
        .unwrap_or(kind.bits())
}

fn compare_display(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Order candidates for presentation.
///
/// Groups with equal priority stay apart and are ordered by their raw kind value.
#[must_use]
pub fn sort_completions(mut completions: Vec<Completion>) -> Vec<Completion> {
    completions.sort_by(|a, b| {
        priority(a.kind)
            .cmp(&priority(b.kind))
            .then_with(|| a.kind.bits().cmp(&b.kind.bits()))
            .then_with(|| compare_display(&a.display_text, &b.display_text))
    });
    completions
}
