use crate::models::{Privacy, TaskForm, WorkPlan};

use super::{
    contains_spam, has_four_digit_year, DateWindow, MessageKeys, Rule, ValidationContext,
    Violations, Workload,
};

/// Validates manager task submissions, both creations and updates.
#[derive(Debug, Clone)]
pub struct TaskValidator {
    keys: MessageKeys,
}

impl Default for TaskValidator {
    fn default() -> Self {
        Self::new(MessageKeys::task())
    }
}

impl TaskValidator {
    pub fn new(keys: MessageKeys) -> Self {
        Self { keys }
    }

    /// Checks a submitted task form.
    ///
    /// `work_plans` are the plans already attached to the task being updated
    /// (empty on creation). Every rule runs; violations are never
    /// short-circuited. When beginning, ending or workload is blank nothing is
    /// checked at all, and input that fails to parse is handled per
    /// [`ValidationContext::policy`].
    pub fn validate(
        &self,
        form: &TaskForm,
        work_plans: &[WorkPlan],
        ctx: &ValidationContext<'_>,
    ) -> Violations {
        let mut violations = Violations::new();

        if form.beginning.is_empty() || form.ending.is_empty() || form.workload.is_empty() {
            return violations;
        }

        let parsed = DateWindow::parse(&form.beginning, &form.ending, ctx.locale)
            .and_then(|window| Workload::parse(&form.workload).map(|w| (window, w)));
        let (window, workload) = match parsed {
            Ok(parsed) => parsed,
            Err(err) => {
                ctx.policy.apply(&err, &self.keys, &mut violations);
                return violations;
            }
        };

        self.check_window(&window, ctx, &mut violations);
        self.check_workload(&workload, &window, &mut violations);

        let title = form.title.to_lowercase();
        let description = form.description.to_lowercase();
        violations.check(
            !contains_spam(&title, ctx.spam),
            "title",
            self.keys.key(Rule::TitleSpam),
        );
        violations.check(
            !contains_spam(&description, ctx.spam),
            "description",
            self.keys.key(Rule::DescriptionSpam),
        );

        if !work_plans.is_empty() {
            self.check_work_plans(form, &window, work_plans, &mut violations);
        }

        tracing::debug!(
            violations = violations.len(),
            "Validated task form {:?}",
            form.title
        );
        violations
    }

    fn check_window(
        &self,
        window: &DateWindow,
        ctx: &ValidationContext<'_>,
        violations: &mut Violations,
    ) {
        let keys = &self.keys;
        let DateWindow { beginning, ending } = *window;

        violations.check(
            has_four_digit_year(&beginning),
            "beginning",
            keys.key(Rule::DateYear),
        );
        violations.check(
            has_four_digit_year(&ending),
            "ending",
            keys.key(Rule::DateYear),
        );
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
    }

    fn check_workload(&self, workload: &Workload, window: &DateWindow, violations: &mut Violations) {
        let keys = &self.keys;
        let value = workload.value();

        violations.check(
            workload.minutes() < 60.0,
            "workload",
            keys.key(Rule::WorkloadMinutes),
        );
        violations.check(
            value > 0.0 && value < 100.0,
            "workload",
            keys.key(Rule::WorkloadRange),
        );
        violations.check(
            window.elapsed_minutes() as f64 >= workload.total_minutes(),
            "workload",
            keys.key(Rule::WorkloadFitsWindow),
        );
        violations.check(
            workload.fraction_len() <= 2,
            "workload",
            keys.key(Rule::WorkloadPrecision),
        );
    }

    fn check_work_plans(
        &self,
        form: &TaskForm,
        window: &DateWindow,
        work_plans: &[WorkPlan],
        violations: &mut Violations,
    ) {
        let keys = &self.keys;
        let downgraded = Privacy::from_str(&form.privacy) == Some(Privacy::Private)
            && work_plans.iter().any(|p| p.privacy == Privacy::Public);
        let starts_later = work_plans.iter().any(|p| p.beginning > window.beginning);
        let ends_earlier = work_plans.iter().any(|p| p.ending < window.ending);

        violations.check(!downgraded, "privacy", keys.key(Rule::PrivacyDowngrade));
        violations.check(
            !starts_later,
            "beginning",
            keys.key(Rule::BeginningCoversWorkPlans),
        );
        violations.check(
            !ends_earlier,
            "ending",
            keys.key(Rule::EndingCoversWorkPlans),
        );
    }
}
