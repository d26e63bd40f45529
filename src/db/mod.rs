mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{Connection, Row};
use uuid::Uuid;

use crate::models::*;

const TASK_COLUMNS: &str = "t.id, t.manager_id, t.title, t.beginning, t.ending, t.workload, \
     t.description, t.link, t.privacy, t.created_at, t.updated_at";

const WORK_PLAN_COLUMNS: &str =
    "w.id, w.task_id, w.title, w.beginning, w.ending, w.privacy, w.created_at, w.updated_at";

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Account operations
    // ============================================================

    pub fn create_user_account(&self, username: &str) -> Result<UserAccount> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = timestamp();

        conn.execute(
            "INSERT INTO user_accounts (id, username, created_at) VALUES (?, ?, ?)",
            (id.to_string(), username, format_datetime(&now)),
        )?;

        Ok(UserAccount {
            id,
            username: username.to_string(),
            created_at: now,
        })
    }

    pub fn get_user_account_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt =
            conn.prepare("SELECT id, username, created_at FROM user_accounts WHERE username = ?")?;

        let mut rows = stmt.query([username])?;
        if let Some(row) = rows.next()? {
            Ok(Some(UserAccount {
                id: parse_uuid(row.get::<_, String>(0)?),
                username: row.get(1)?,
                created_at: parse_datetime(row.get::<_, String>(2)?),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn create_manager(&self, user_account_id: Uuid) -> Result<Manager> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();

        conn.execute(
            "INSERT INTO managers (id, user_account_id) VALUES (?, ?)",
            (id.to_string(), user_account_id.to_string()),
        )?;

        Ok(Manager {
            id,
            user_account_id,
        })
    }

    /// Resolves a username to the principal acting on a request.
    pub fn get_principal(&self, username: &str) -> Result<Option<Principal>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, m.id, c.id
             FROM user_accounts u
             LEFT JOIN managers m ON m.user_account_id = u.id
             LEFT JOIN consumers c ON c.user_account_id = u.id
             WHERE u.username = ?",
        )?;

        let mut rows = stmt.query([username])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Principal {
                user_account_id: parse_uuid(row.get::<_, String>(0)?),
                username: row.get(1)?,
                manager_id: row.get::<_, Option<String>>(2)?.map(parse_uuid),
                consumer_id: row.get::<_, Option<String>>(3)?.map(parse_uuid),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn get_consumer(&self, user_account_id: Uuid) -> Result<Option<Consumer>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, user_account_id, company, sector FROM consumers WHERE user_account_id = ?",
        )?;

        let mut rows = stmt.query([user_account_id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Consumer {
                id: parse_uuid(row.get::<_, String>(0)?),
                user_account_id: parse_uuid(row.get::<_, String>(1)?),
                company: row.get(2)?,
                sector: row.get(3)?,
            }))
        } else {
            Ok(None)
        }
    }

    pub fn create_consumer(&self, user_account_id: Uuid, form: ConsumerForm) -> Result<Consumer> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();

        conn.execute(
            "INSERT INTO consumers (id, user_account_id, company, sector) VALUES (?, ?, ?, ?)",
            (
                id.to_string(),
                user_account_id.to_string(),
                &form.company,
                &form.sector,
            ),
        )?;

        Ok(Consumer {
            id,
            user_account_id,
            company: form.company,
            sector: form.sector,
        })
    }

    pub fn update_consumer(
        &self,
        user_account_id: Uuid,
        form: ConsumerForm,
    ) -> Result<Option<Consumer>> {
        let Some(existing) = self.get_consumer(user_account_id)? else {
            return Ok(None);
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "UPDATE consumers SET company = ?, sector = ? WHERE id = ?",
            (&form.company, &form.sector, existing.id.to_string()),
        )?;

        Ok(Some(Consumer {
            company: form.company,
            sector: form.sector,
            ..existing
        }))
    }

    // ============================================================
    // Spam operations
    // ============================================================

    pub fn get_spam_rule(&self) -> Result<SpamRule> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT word FROM spam_words ORDER BY id")?;
        let words = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(SpamRule::new(words))
    }

    /// Adds a flagged term. Returns false if it was already listed.
    pub fn add_spam_word(&self, word: &str) -> Result<bool> {
        let word = word.trim();
        if word.is_empty() {
            anyhow::bail!("Spam word must not be blank");
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("INSERT OR IGNORE INTO spam_words (word) VALUES (?)", [word])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Task operations
    // ============================================================

    pub fn get_task(&self, id: Uuid) -> Result<Option<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks t WHERE t.id = ?"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(task_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn get_task_with_work_plans(&self, id: Uuid) -> Result<Option<TaskWithWorkPlans>> {
        let Some(task) = self.get_task(id)? else {
            return Ok(None);
        };
        let work_plans = self.get_work_plans_by_task(id)?;

        Ok(Some(TaskWithWorkPlans { task, work_plans }))
    }

    pub fn get_tasks_by_manager(&self, manager_id: Uuid) -> Result<Vec<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks t WHERE t.manager_id = ? ORDER BY t.beginning, t.title"
        ))?;

        let tasks = stmt
            .query_map([manager_id.to_string()], task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// Public tasks still open at `now`.
    pub fn get_public_unfinished_tasks(&self, now: DateTime<Utc>) -> Result<Vec<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks t
             WHERE t.privacy = 'PUBLIC' AND t.ending > ?
             ORDER BY t.beginning, t.title"
        ))?;

        let tasks = stmt
            .query_map([format_datetime(&now)], task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// Public tasks whose window closed before `now`.
    pub fn get_public_finished_tasks(&self, now: DateTime<Utc>) -> Result<Vec<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks t
             WHERE t.privacy = 'PUBLIC' AND t.ending < ?
             ORDER BY t.ending DESC, t.title"
        ))?;

        let tasks = stmt
            .query_map([format_datetime(&now)], task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    pub fn create_task(&self, manager_id: Uuid, draft: TaskDraft) -> Result<Task> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = timestamp();

        conn.execute(
            "INSERT INTO tasks (id, manager_id, title, beginning, ending, workload, description, link, privacy, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                manager_id.to_string(),
                &draft.title,
                format_datetime(&draft.beginning),
                format_datetime(&draft.ending),
                draft.workload,
                &draft.description,
                &draft.link,
                draft.privacy.as_str(),
                format_datetime(&now),
                format_datetime(&now),
            ),
        )?;

        Ok(Task {
            id,
            manager_id,
            title: draft.title,
            beginning: draft.beginning,
            ending: draft.ending,
            workload: draft.workload,
            description: draft.description,
            link: draft.link,
            privacy: draft.privacy,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_task(&self, id: Uuid, draft: TaskDraft) -> Result<Option<Task>> {
        let Some(existing) = self.get_task(id)? else {
            return Ok(None);
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        let now = timestamp();

        conn.execute(
            "UPDATE tasks SET title = ?, beginning = ?, ending = ?, workload = ?, description = ?,
                 link = ?, privacy = ?, updated_at = ?
             WHERE id = ?",
            (
                &draft.title,
                format_datetime(&draft.beginning),
                format_datetime(&draft.ending),
                draft.workload,
                &draft.description,
                &draft.link,
                draft.privacy.as_str(),
                format_datetime(&now),
                id.to_string(),
            ),
        )?;

        Ok(Some(Task {
            id,
            manager_id: existing.manager_id,
            title: draft.title,
            beginning: draft.beginning,
            ending: draft.ending,
            workload: draft.workload,
            description: draft.description,
            link: draft.link,
            privacy: draft.privacy,
            created_at: existing.created_at,
            updated_at: now,
        }))
    }

    // ============================================================
    // Work plan operations
    // ============================================================

    pub fn get_work_plan(&self, id: Uuid) -> Result<Option<WorkPlan>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {WORK_PLAN_COLUMNS} FROM work_plans w WHERE w.id = ?"
        ))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(work_plan_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn get_work_plans_by_task(&self, task_id: Uuid) -> Result<Vec<WorkPlan>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {WORK_PLAN_COLUMNS} FROM work_plans w WHERE w.task_id = ? ORDER BY w.beginning, w.title"
        ))?;

        let plans = stmt
            .query_map([task_id.to_string()], work_plan_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(plans)
    }

    /// Work plans under any task the manager owns.
    pub fn get_work_plans_by_manager(&self, manager_id: Uuid) -> Result<Vec<WorkPlan>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {WORK_PLAN_COLUMNS} FROM work_plans w
             JOIN tasks t ON t.id = w.task_id
             WHERE t.manager_id = ?
             ORDER BY w.beginning, w.title"
        ))?;

        let plans = stmt
            .query_map([manager_id.to_string()], work_plan_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(plans)
    }

    pub fn get_public_work_plans(&self) -> Result<Vec<WorkPlan>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {WORK_PLAN_COLUMNS} FROM work_plans w
             WHERE w.privacy = 'PUBLIC'
             ORDER BY w.beginning, w.title"
        ))?;

        let plans = stmt
            .query_map([], work_plan_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(plans)
    }

    pub fn create_work_plan(&self, task_id: Uuid, draft: WorkPlanDraft) -> Result<WorkPlan> {
        self.get_task(task_id)?
            .ok_or_else(|| anyhow::anyhow!("Task not found"))?;

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = timestamp();

        conn.execute(
            "INSERT INTO work_plans (id, task_id, title, beginning, ending, privacy, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                task_id.to_string(),
                &draft.title,
                format_datetime(&draft.beginning),
                format_datetime(&draft.ending),
                draft.privacy.as_str(),
                format_datetime(&now),
                format_datetime(&now),
            ),
        )?;

        Ok(WorkPlan {
            id,
            task_id,
            title: draft.title,
            beginning: draft.beginning,
            ending: draft.ending,
            privacy: draft.privacy,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_work_plan(&self, id: Uuid, draft: WorkPlanDraft) -> Result<Option<WorkPlan>> {
        let Some(existing) = self.get_work_plan(id)? else {
            return Ok(None);
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        let now = timestamp();

        conn.execute(
            "UPDATE work_plans SET title = ?, beginning = ?, ending = ?, privacy = ?, updated_at = ?
             WHERE id = ?",
            (
                &draft.title,
                format_datetime(&draft.beginning),
                format_datetime(&draft.ending),
                draft.privacy.as_str(),
                format_datetime(&now),
                id.to_string(),
            ),
        )?;

        Ok(Some(WorkPlan {
            id,
            task_id: existing.task_id,
            title: draft.title,
            beginning: draft.beginning,
            ending: draft.ending,
            privacy: draft.privacy,
            created_at: existing.created_at,
            updated_at: now,
        }))
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

/// `<data dir>/acme-planner.db` for the current platform.
pub fn default_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "acme-planner")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("acme-planner.db"))
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: parse_uuid(row.get::<_, String>(0)?),
        manager_id: parse_uuid(row.get::<_, String>(1)?),
        title: row.get(2)?,
        beginning: parse_datetime(row.get::<_, String>(3)?),
        ending: parse_datetime(row.get::<_, String>(4)?),
        workload: row.get(5)?,
        description: row.get(6)?,
        link: row.get(7)?,
        privacy: Privacy::from_str(&row.get::<_, String>(8)?).unwrap_or(Privacy::Private),
        created_at: parse_datetime(row.get::<_, String>(9)?),
        updated_at: parse_datetime(row.get::<_, String>(10)?),
    })
}

fn work_plan_from_row(row: &Row<'_>) -> rusqlite::Result<WorkPlan> {
    Ok(WorkPlan {
        id: parse_uuid(row.get::<_, String>(0)?),
        task_id: parse_uuid(row.get::<_, String>(1)?),
        title: row.get(2)?,
        beginning: parse_datetime(row.get::<_, String>(3)?),
        ending: parse_datetime(row.get::<_, String>(4)?),
        privacy: Privacy::from_str(&row.get::<_, String>(5)?).unwrap_or(Privacy::Private),
        created_at: parse_datetime(row.get::<_, String>(6)?),
        updated_at: parse_datetime(row.get::<_, String>(7)?),
    })
}

/// Current instant at the precision it is stored with.
fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Fixed-width UTC form so stored instants compare correctly as text.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
