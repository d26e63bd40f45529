use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::{bind_instant, bind_privacy};
use super::Privacy;
use crate::validation::{Violations, NOT_BLANK_KEY};

/// A slice of a task's window, planned separately.
///
/// A public work plan keeps its parent task from being made private.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkPlan {
    pub id: Uuid,
    pub task_id: Uuid,
    pub title: String,
    pub beginning: DateTime<Utc>,
    pub ending: DateTime<Utc>,
    pub privacy: Privacy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A work plan form exactly as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkPlanForm {
    /// Parent task. Required on creation, ignored on update.
    pub task_id: Option<Uuid>,
    pub title: String,
    pub beginning: String,
    pub ending: String,
    pub privacy: String,
}

/// Typed work plan values ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkPlanDraft {
    pub title: String,
    pub beginning: DateTime<Utc>,
    pub ending: DateTime<Utc>,
    pub privacy: Privacy,
}

impl WorkPlanForm {
    pub fn bind(&self, locale: &str) -> Result<WorkPlanDraft, Violations> {
        let mut violations = Violations::new();
        violations.check(!self.title.trim().is_empty(), "title", NOT_BLANK_KEY);

        let beginning = bind_instant(&mut violations, "beginning", &self.beginning, locale);
        let ending = bind_instant(&mut violations, "ending", &self.ending, locale);
        let privacy = bind_privacy(&mut violations, &self.privacy);

        match (beginning, ending, privacy) {
            (Some(beginning), Some(ending), Some(privacy)) if violations.is_empty() => {
                Ok(WorkPlanDraft {
                    title: self.title.clone(),
                    beginning,
                    ending,
                    privacy,
                })
            }
            _ => Err(violations),
        }
    }
}
