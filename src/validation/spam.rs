use crate::models::SpamRule;

/// Returns true when `text` contains any flagged term of `rule`.
///
/// Callers lower-case `text`; terms are lower-cased here so a list holding
/// `CHEAP` still flags `cheap watches`. Blank terms never match.
pub fn contains_spam(text: &str, rule: &SpamRule) -> bool {
    rule.terms()
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .any(|term| text.contains(&term))
}
