//! Roll labels and the composed image prompt.

use crate::constants::{PROMPT_SEPARATOR, ROLL_LABELS};

/// Result of looking a roll label up in [`ROLL_LABELS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RollLookup {
    /// Recognised label and the number of words it asks for
    Found(usize),
    /// Label isn't in the table
    NotFound,
}

impl RollLookup {
    /// Looks up the field name of a roll embed.
    pub fn from_label(label: &str) -> Self {
        ROLL_LABELS
            .iter()
            .find(|(known, _)| *known == label)
            .map_or(Self::NotFound, |(_, count)| Self::Found(*count))
    }
}

/// Joins the first `count` lines of `text` with " and ".
///
/// Lines are trimmed and blank ones are skipped, so they don't count towards
/// `count` and never leave a dangling separator.
pub fn compose_prompt(text: &str, count: usize) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(count)
        .collect::<Vec<_>>()
        .join(PROMPT_SEPARATOR)
}
