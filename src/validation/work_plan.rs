use crate::models::{Privacy, WorkPlanForm};

use super::{contains_spam, DateWindow, MessageKeys, Rule, ValidationContext, Violations};

/// Validates manager work plan submissions.
#[derive(Debug, Clone)]
pub struct WorkPlanValidator {
    keys: MessageKeys,
}

impl Default for WorkPlanValidator {
    fn default() -> Self {
        Self::new(MessageKeys::work_plan())
    }
}

impl WorkPlanValidator {
    pub fn new(keys: MessageKeys) -> Self {
        Self { keys }
    }

    /// Checks a submitted work plan form against the window of its parent
    /// task.
    ///
    /// Public plans must have a clean title. The window is only checked when
    /// both ends were submitted, and must fall within `task`.
    pub fn validate(
        &self,
        form: &WorkPlanForm,
        task: &DateWindow,
        ctx: &ValidationContext<'_>,
    ) -> Violations {
        let keys = &self.keys;
        let mut violations = Violations::new();

        if Privacy::from_str(&form.privacy) == Some(Privacy::Public) {
            let title = form.title.to_lowercase();
            violations.check(
                !contains_spam(&title, ctx.spam),
                "title",
                keys.key(Rule::TitleSpam),
            );
        }

        if form.beginning.is_empty() || form.ending.is_empty() {
            return violations;
        }

        let DateWindow { beginning, ending } =
            match DateWindow::parse(&form.beginning, &form.ending, ctx.locale) {
                Ok(window) => window,
                Err(err) => {
                    ctx.policy.apply(&err, keys, &mut violations);
                    return violations;
                }
            };

        violations.check(
            beginning > ctx.now,
            "beginning",
            keys.key(Rule::BeginningInFuture),
        );
        violations.check(ending > ctx.now, "ending", keys.key(Rule::EndingInFuture));
        violations.check(
            ending >= beginning,
            "ending",
            keys.key(Rule::EndingNotBeforeBeginning),
        );
        violations.check(
            ending != beginning,
            "ending",
            keys.key(Rule::EndingDiffersFromBeginning),
        );
        violations.check(
            ending != beginning,
            "beginning",
            keys.key(Rule::BeginningDiffersFromEnding),
        );
        violations.check(
            beginning >= task.beginning,
            "beginning",
            keys.key(Rule::BeginningWithinTask),
        );
        violations.check(
            ending <= task.ending,
            "ending",
            keys.key(Rule::EndingWithinTask),
        );

        tracing::debug!(
            violations = violations.len(),
            "Validated work plan form {:?}",
            form.title
        );
        violations
    }
}
