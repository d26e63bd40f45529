//! Business rules for submitted task and work plan forms.
//!
//! Validation is pure: the caller supplies the locale, the submission
//! instant and the spam terms, and gets back every broken rule as a
//! [`Violation`]. Nothing here touches the database or the clock.
//!
//! # Format errors
//!
//! Dates and workloads that cannot be parsed are reported as
//! [`FormatError`]. What happens next is governed by [`FormatErrorPolicy`]:
//! the default skips the dependent checks without a violation, `Report`
//! emits a `format.error` violation on the offending field.

mod dates;
mod rules;
mod spam;
mod task;
mod work_plan;
mod workload;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SpamRule;

pub use dates::*;
pub use rules::*;
pub use spam::*;
pub use task::*;
pub use work_plan::*;
pub use workload::*;

/// Key used when a required value is blank.
pub const NOT_BLANK_KEY: &str = "default.error.not-blank";
/// Key used when a value cannot be converted to its field type.
pub const CONVERSION_KEY: &str = "default.error.conversion";

/// Raised when a submitted date or workload does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("{field} `{value}` does not match pattern `{pattern}`")]
    Date {
        field: &'static str,
        value: String,
        pattern: &'static str,
    },
    #[error("workload `{0}` is not numeric")]
    Workload(String),
}

impl FormatError {
    /// The form field the unparsable value came from.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Date { field, .. } => field,
            Self::Workload(_) => "workload",
        }
    }
}

/// What to do with input that fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatErrorPolicy {
    /// Skip the checks that depend on the value; no violation is recorded.
    #[default]
    Skip,
    /// Record a `format.error` violation on the field.
    Report,
}

impl FormatErrorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Report => "report",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "skip" => Some(Self::Skip),
            "report" => Some(Self::Report),
            _ => None,
        }
    }

    fn apply(&self, err: &FormatError, keys: &MessageKeys, violations: &mut Violations) {
        tracing::debug!("Unparsable submission: {}", err);
        if *self == Self::Report {
            violations.push(err.field(), keys.key(Rule::Format));
        }
    }
}

/// A failed business rule: the field it concerns and the message key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub key: String,
}

/// Violations in the order the rules were evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, key: impl Into<String>) {
        self.0.push(Violation {
            field: field.into(),
            key: key.into(),
        });
    }

    /// Records a violation unless `holds`.
    pub fn check(&mut self, holds: bool, field: &str, key: impl Into<String>) {
        if !holds {
            self.push(field, key);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn contains(&self, field: &str, key: &str) -> bool {
        self.0.iter().any(|v| v.field == field && v.key == key)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Violations> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Everything a validator needs besides the form itself.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub locale: &'a str,
    pub now: DateTime<Utc>,
    pub spam: &'a SpamRule,
    pub policy: FormatErrorPolicy,
}

impl<'a> ValidationContext<'a> {
    pub fn new(locale: &'a str, now: DateTime<Utc>, spam: &'a SpamRule) -> Self {
        Self {
            locale,
            now,
            spam,
            policy: FormatErrorPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FormatErrorPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Checks that each `(field, value)` pair is non-blank.
pub fn require_not_blank(fields: &[(&str, &str)]) -> Violations {
    let mut violations = Violations::new();
    for (field, value) in fields {
        violations.check(!value.trim().is_empty(), field, NOT_BLANK_KEY);
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_records_only_failures() {
        let mut violations = Violations::new();
        violations.check(true, "title", "a");
        violations.check(false, "ending", "b");

        assert_eq!(violations.len(), 1);
        assert!(violations.contains("ending", "b"));
        assert!(!violations.contains("title", "a"));
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut violations = Violations::new();
        violations.push("workload", "manager.task.form.workload.error3");

        let json = serde_json::to_value(&violations).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "field": "workload", "key": "manager.task.form.workload.error3" }])
        );
    }

    #[test]
    fn require_not_blank_flags_whitespace() {
        let violations = require_not_blank(&[("company", "Acme"), ("sector", "  ")]);

        assert_eq!(violations.len(), 1);
        assert!(violations.contains("sector", NOT_BLANK_KEY));
    }

    #[test]
    fn policy_round_trips_through_str() {
        assert_eq!(FormatErrorPolicy::from_str("report"), Some(FormatErrorPolicy::Report));
        assert_eq!(FormatErrorPolicy::Skip.as_str(), "skip");
        assert_eq!(FormatErrorPolicy::from_str("loud"), None);
    }
}
