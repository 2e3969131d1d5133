/// Task model and database operations
///
/// A task is assigned by one user to another and moves through three
/// statuses. Any status may be set from any other; `completed_at` tracks
/// whether the task is currently completed.
///
/// ```text
/// pending <-> in-progress <-> completed
///    ^___________________________^
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in-progress', 'completed');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     assigned_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date DATE,
///     completed_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use teamtrack_shared::models::task::{Task, CreateTask, TaskPriority, TaskStatus};
/// use teamtrack_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// # async fn example(assigner: Uuid, assignee: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Review landing page copy".to_string(),
///     description: String::new(),
///     assigned_by: Some(assigner),
///     assigned_to: assignee,
///     priority: TaskPriority::High,
///     due_date: NaiveDate::from_ymd_opt(2025, 3, 1),
/// }).await?;
///
/// Task::update_status(&pool, task.id, TaskStatus::Completed).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Task progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    #[sqlx(rename = "pending")]
    #[serde(rename = "pending")]
    Pending,

    #[sqlx(rename = "in-progress")]
    #[serde(rename = "in-progress")]
    InProgress,

    #[sqlx(rename = "completed")]
    #[serde(rename = "completed")]
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status or priority
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field}: {value}")]
pub struct InvalidTaskField {
    pub field: &'static str,
    pub value: String,
}

impl FromStr for TaskStatus {
    type Err = InvalidTaskField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(InvalidTaskField {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Task urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = InvalidTaskField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(InvalidTaskField {
                field: "priority",
                value: other.to_string(),
            }),
        }
    }
}

/// Task row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,

    pub title: String,

    /// Empty string when no description was given
    pub description: String,

    /// Assigner (null once that user is deleted)
    pub assigned_by: Option<Uuid>,

    /// Assignee (null once that user is deleted)
    pub assigned_to: Option<Uuid>,

    pub status: TaskStatus,

    pub priority: TaskPriority,

    pub due_date: Option<NaiveDate>,

    /// Set while the task is completed
    pub completed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// A task is overdue when its due date is before `today` and it is not
    /// completed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_completed() && self.due_date.is_some_and(|due| due < today)
    }

    /// Human-readable due date relative to `today`
    pub fn due_label(&self, today: NaiveDate) -> String {
        match self.due_date {
            Some(due) => describe_due_date(due, today),
            None => "No due date".to_string(),
        }
    }

    /// Whether `user_id` assigned or received this task
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.assigned_to == Some(user_id) || self.assigned_by == Some(user_id)
    }
}

/// Describes a due date relative to `today`
///
/// Past dates are "Overdue", the next week is counted in days, anything later
/// is printed as a date ("Mar 1, 2025").
pub fn describe_due_date(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        d if d < 0 => "Overdue".to_string(),
        0 => "Due Today".to_string(),
        1 => "Due Tomorrow".to_string(),
        d if d <= 7 => format!("Due in {} days", d),
        _ => due.format("%b %-d, %Y").to_string(),
    }
}

/// Input for creating a task; status always starts as `pending`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub assigned_by: Option<Uuid>,
    pub assigned_to: Uuid,
    #[serde(default)]
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
}

/// Partial task update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
}

impl UpdateTask {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.assigned_to.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }
}

const TASK_COLUMNS: &str = "id, title, description, assigned_by, assigned_to, status, priority, \
     due_date, completed_at, created_at, updated_at";

impl Task {
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, description, assigned_by, assigned_to, priority, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.assigned_by)
        .bind(data.assigned_to)
        .bind(data.priority)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Applies a partial update; `None` when the task does not exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.assigned_to.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assigned_to = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {TASK_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(assigned_to) = data.assigned_to {
            q = q.bind(assigned_to);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }

        q.fetch_optional(pool).await
    }

    /// Sets the status; `completed` stamps `completed_at`, others clear it
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let completed_at = status.is_completed().then(Utc::now);

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = $2, completed_at = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(completed_at)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Tasks the user assigned or received, newest first
    pub async fn list_involving(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE assigned_to = $1 OR assigned_by = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Tasks assigned to the user, newest first
    pub async fn list_assigned_to(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE assigned_to = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Admin analytics query
    ///
    /// `created_since` bounds `created_at` from below; `involving` keeps tasks
    /// the given user assigned or received. Newest first.
    pub async fn list_for_analytics(
        pool: &PgPool,
        created_since: Option<DateTime<Utc>>,
        involving: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE ($1::timestamptz IS NULL OR created_at >= $1)
              AND ($2::uuid IS NULL OR assigned_to = $2 OR assigned_by = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(created_since)
        .bind(involving)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(status: TaskStatus, due_date: Option<NaiveDate>) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Ship release notes".to_string(),
            description: String::new(),
            assigned_by: None,
            assigned_to: None,
            status,
            priority: TaskPriority::Medium,
            due_date,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(TaskStatus::InProgress.as_str(), "in-progress");
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("Completed".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert!("done".parse::<TaskStatus>().is_err());
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            serde_json::json!("in-progress")
        );
    }

    #[test]
    fn test_priority_parse_and_default() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
        assert_eq!("HIGH".parse::<TaskPriority>(), Ok(TaskPriority::High));
        let err = "urgent".parse::<TaskPriority>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid priority: urgent");
    }

    #[test]
    fn test_is_overdue() {
        let today = date(2025, 3, 10);
        assert!(task(TaskStatus::Pending, Some(date(2025, 3, 9))).is_overdue(today));
        assert!(!task(TaskStatus::Pending, Some(today)).is_overdue(today));
        assert!(!task(TaskStatus::Completed, Some(date(2025, 3, 1))).is_overdue(today));
        assert!(!task(TaskStatus::InProgress, None).is_overdue(today));
    }

    #[test]
    fn test_describe_due_date() {
        let today = date(2025, 3, 10);
        assert_eq!(describe_due_date(date(2025, 3, 9), today), "Overdue");
        assert_eq!(describe_due_date(today, today), "Due Today");
        assert_eq!(describe_due_date(date(2025, 3, 11), today), "Due Tomorrow");
        assert_eq!(describe_due_date(date(2025, 3, 17), today), "Due in 7 days");
        assert_eq!(describe_due_date(date(2025, 3, 18), today), "Mar 18, 2025");
    }

    #[test]
    fn test_due_label_without_date() {
        let t = task(TaskStatus::Pending, None);
        assert_eq!(t.due_label(date(2025, 1, 1)), "No due date");
    }

    #[test]
    fn test_involves() {
        let me = Uuid::new_v4();
        let mut t = task(TaskStatus::Pending, None);
        assert!(!t.involves(me));
        t.assigned_by = Some(me);
        assert!(t.involves(me));
    }

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());
        assert!(!UpdateTask {
            priority: Some(TaskPriority::Low),
            ..Default::default()
        }
        .is_empty());
    }
}
