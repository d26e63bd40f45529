use std::collections::HashMap;

/// A business rule a submission can break.
///
/// Each rule has a stable key suffix; [`MessageKeys`] joins it with a form
/// prefix to build the message key callers look up in their catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Parsed year is not four digits long.
    DateYear,
    BeginningInFuture,
    EndingInFuture,
    EndingNotBeforeBeginning,
    EndingDiffersFromBeginning,
    BeginningDiffersFromEnding,
    /// Attached work plans start after the task.
    BeginningCoversWorkPlans,
    /// Attached work plans end before the task.
    EndingCoversWorkPlans,
    /// Work plan starts before its parent task.
    BeginningWithinTask,
    /// Work plan ends after its parent task.
    EndingWithinTask,
    WorkloadMinutes,
    WorkloadRange,
    WorkloadFitsWindow,
    WorkloadPrecision,
    TitleSpam,
    DescriptionSpam,
    /// Task made private while owning public work plans.
    PrivacyDowngrade,
    /// Input that could not be parsed, when reporting is enabled.
    Format,
}

impl Rule {
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::DateYear => "date.error",
            Self::BeginningInFuture => "beginning.error1",
            Self::EndingInFuture => "ending.error1",
            Self::EndingNotBeforeBeginning => "ending.error2",
            Self::EndingDiffersFromBeginning => "ending.error3",
            Self::BeginningDiffersFromEnding => "beginning.error2",
            Self::BeginningCoversWorkPlans => "beginning.error3",
            Self::EndingCoversWorkPlans => "ending.error4",
            Self::BeginningWithinTask => "beginning.outside-task",
            Self::EndingWithinTask => "ending.outside-task",
            Self::WorkloadMinutes => "workload.error1",
            Self::WorkloadRange => "workload.error2",
            Self::WorkloadFitsWindow => "workload.error3",
            Self::WorkloadPrecision => "workload.error4",
            Self::TitleSpam => "title.error",
            Self::DescriptionSpam => "description.error",
            Self::PrivacyDowngrade => "privacy.error",
            Self::Format => "format.error",
        }
    }
}

/// Maps rules to full message keys for one form.
///
/// Keys default to `<prefix>.<suffix>`; individual rules can be pointed at
/// any other key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageKeys {
    prefix: String,
    overrides: HashMap<Rule, String>,
}

impl MessageKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            overrides: HashMap::new(),
        }
    }

    /// Keys used by the manager task form.
    pub fn task() -> Self {
        Self::new("manager.task.form")
    }

    /// Keys used by the manager work plan form. Its spam key sits outside
    /// the form namespace.
    pub fn work_plan() -> Self {
        Self::new("manager.workplan.form").with_key(Rule::TitleSpam, "manager.workplan.error.spam")
    }

    pub fn with_key(mut self, rule: Rule, key: impl Into<String>) -> Self {
        self.overrides.insert(rule, key.into());
        self
    }

    pub fn key(&self, rule: Rule) -> String {
        match self.overrides.get(&rule) {
            Some(key) => key.clone(),
            None => format!("{}.{}", self.prefix, rule.suffix()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_keys_use_form_prefix() {
        let keys = MessageKeys::task();

        assert_eq!(keys.key(Rule::WorkloadFitsWindow), "manager.task.form.workload.error3");
        assert_eq!(keys.key(Rule::DateYear), "manager.task.form.date.error");
        assert_eq!(keys.key(Rule::PrivacyDowngrade), "manager.task.form.privacy.error");
    }

    #[test]
    fn work_plan_spam_key_is_overridden() {
        let keys = MessageKeys::work_plan();

        assert_eq!(keys.key(Rule::TitleSpam), "manager.workplan.error.spam");
        assert_eq!(keys.key(Rule::EndingInFuture), "manager.workplan.form.ending.error1");
    }

    #[test]
    fn overrides_replace_defaults() {
        let keys = MessageKeys::new("custom").with_key(Rule::Format, "shared.format");

        assert_eq!(keys.key(Rule::Format), "shared.format");
        assert_eq!(keys.key(Rule::TitleSpam), "custom.title.error");
    }
}
