use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Privacy, WorkPlan};
use crate::validation::{
    parse_instant, DateWindow, Violations, Workload, CONVERSION_KEY, NOT_BLANK_KEY,
};

/// A unit of planned work owned by a manager.
///
/// A task spans a `beginning`..`ending` window and carries a `workload` in
/// `H.MM` form, where the two fractional digits count minutes. Tasks are
/// never deleted; managers revise them through update submissions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub manager_id: Uuid,
    pub title: String,
    pub beginning: DateTime<Utc>,
    pub ending: DateTime<Utc>,
    /// Planned effort as hours with minute digits (`1.30` is 90 minutes).
    pub workload: f64,
    pub description: String,
    pub link: Option<String>,
    pub privacy: Privacy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// The window its work plans must fall within.
    pub fn window(&self) -> DateWindow {
        DateWindow {
            beginning: self.beginning,
            ending: self.ending,
        }
    }
}

/// A task together with its work plans, as shown to its manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWithWorkPlans {
    #[serde(flatten)]
    pub task: Task,
    pub work_plans: Vec<WorkPlan>,
}

/// A task form exactly as submitted.
///
/// Values stay raw strings so the validator can see what the user typed,
/// including locale-formatted dates and comma decimals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskForm {
    pub title: String,
    pub beginning: String,
    pub ending: String,
    pub workload: String,
    pub description: String,
    pub link: String,
    pub privacy: String,
}

/// Typed task values ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub beginning: DateTime<Utc>,
    pub ending: DateTime<Utc>,
    pub workload: f64,
    pub description: String,
    pub link: Option<String>,
    pub privacy: Privacy,
}

impl TaskForm {
    /// Converts the raw form into typed values.
    ///
    /// Runs after business validation; it only catches what cannot be
    /// stored at all (blank or unconvertible values).
    pub fn bind(&self, locale: &str) -> Result<TaskDraft, Violations> {
        let mut violations = Violations::new();

        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
        ] {
            violations.check(!value.trim().is_empty(), field, NOT_BLANK_KEY);
        }

        let beginning = bind_instant(&mut violations, "beginning", &self.beginning, locale);
        let ending = bind_instant(&mut violations, "ending", &self.ending, locale);

        let workload = if self.workload.trim().is_empty() {
            violations.push("workload", NOT_BLANK_KEY);
            None
        } else {
            match Workload::parse(&self.workload) {
                Ok(workload) => Some(workload.value()),
                Err(_) => {
                    violations.push("workload", CONVERSION_KEY);
                    None
                }
            }
        };

        let privacy = bind_privacy(&mut violations, &self.privacy);

        match (beginning, ending, workload, privacy) {
            (Some(beginning), Some(ending), Some(workload), Some(privacy))
                if violations.is_empty() =>
            {
                let link = self.link.trim();
                Ok(TaskDraft {
                    title: self.title.clone(),
                    beginning,
                    ending,
                    workload,
                    description: self.description.clone(),
                    link: (!link.is_empty()).then(|| link.to_string()),
                    privacy,
                })
            }
            _ => Err(violations),
        }
    }
}

pub(crate) fn bind_instant(
    violations: &mut Violations,
    field: &'static str,
    raw: &str,
    locale: &str,
) -> Option<DateTime<Utc>> {
    if raw.trim().is_empty() {
        violations.push(field, NOT_BLANK_KEY);
        return None;
    }
    match parse_instant(field, raw, locale) {
        Ok(instant) => Some(instant),
        Err(_) => {
            violations.push(field, CONVERSION_KEY);
            None
        }
    }
}

pub(crate) fn bind_privacy(violations: &mut Violations, raw: &str) -> Option<Privacy> {
    if raw.trim().is_empty() {
        violations.push("privacy", NOT_BLANK_KEY);
        return None;
    }
    let privacy = Privacy::from_str(raw.trim());
    if privacy.is_none() {
        violations.push("privacy", CONVERSION_KEY);
    }
    privacy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> TaskForm {
        TaskForm {
            title: "Task 001".to_string(),
            beginning: "2099/10/30 17:15".to_string(),
            ending: "2099/10/30 17:45".to_string(),
            workload: "0,30".to_string(),
            description: "Creation of Task entity".to_string(),
            link: "https://example.org".to_string(),
            privacy: "PRIVATE".to_string(),
        }
    }

    #[test]
    fn binds_complete_form() {
        let draft = form().bind("en").unwrap();

        assert_eq!(draft.workload, 0.3);
        assert_eq!(draft.privacy, Privacy::Private);
        assert_eq!(draft.link.as_deref(), Some("https://example.org"));
    }

    #[test]
    fn empty_link_binds_to_none() {
        let mut f = form();
        f.link = " ".to_string();

        assert_eq!(f.bind("en").unwrap().link, None);
    }

    #[test]
    fn reports_blank_and_unconvertible_values() {
        let mut f = form();
        f.title = String::new();
        f.ending = "tomorrow".to_string();
        f.privacy = "SECRET".to_string();

        let violations = f.bind("en").unwrap_err();

        assert!(violations.contains("title", NOT_BLANK_KEY));
        assert!(violations.contains("ending", CONVERSION_KEY));
        assert!(violations.contains("privacy", CONVERSION_KEY));
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn window_spans_beginning_to_ending() {
        let draft = form().bind("en").unwrap();
        let task = Task {
            id: Uuid::new_v4(),
            manager_id: Uuid::new_v4(),
            title: draft.title,
            beginning: draft.beginning,
            ending: draft.ending,
            workload: draft.workload,
            description: draft.description,
            link: draft.link,
            privacy: draft.privacy,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let window = task.window();
        assert_eq!(window.beginning, draft.beginning);
        assert_eq!(window.elapsed_minutes(), 30);
    }
}
