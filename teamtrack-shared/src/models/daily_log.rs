/// Daily work log model
///
/// A user may submit any number of logs per day; reports merge them per
/// (day, user) afterwards, see [`crate::reports`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE daily_work_logs (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     summary TEXT,
///     work_items JSONB NOT NULL DEFAULT '[]',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyWorkLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub summary: Option<String>,
    pub work_items: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// A log row joined with its author's name and email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyWorkLogWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub summary: Option<String>,
    pub work_items: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Validated log input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDailyWorkLog {
    pub user_id: Uuid,
    pub summary: Option<String>,
    pub work_items: Vec<String>,
}

/// Error returned when a log has neither summary nor work items
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("A summary or at least one work item is required")]
pub struct EmptyDailyWorkLog;

impl CreateDailyWorkLog {
    /// Trims the summary and items, dropping the empty ones
    pub fn new(
        user_id: Uuid,
        summary: Option<&str>,
        work_items: &[String],
    ) -> Result<Self, EmptyDailyWorkLog> {
        let summary = summary
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let work_items: Vec<String> = work_items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();

        if summary.is_none() && work_items.is_empty() {
            return Err(EmptyDailyWorkLog);
        }

        Ok(Self {
            user_id,
            summary,
            work_items,
        })
    }
}

impl DailyWorkLog {
    pub async fn create(pool: &PgPool, data: CreateDailyWorkLog) -> Result<Self, sqlx::Error> {
        let log = sqlx::query_as::<_, DailyWorkLog>(
            r#"
            INSERT INTO daily_work_logs (user_id, summary, work_items)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, summary, work_items, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.summary)
        .bind(Json(data.work_items))
        .fetch_one(pool)
        .await?;

        Ok(log)
    }

    /// Logs created in `[start, end]`, newest first, optionally for one user
    pub async fn list_in_range(
        pool: &PgPool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        user_id: Option<Uuid>,
    ) -> Result<Vec<DailyWorkLogWithAuthor>, sqlx::Error> {
        let logs = sqlx::query_as::<_, DailyWorkLogWithAuthor>(
            r#"
            SELECT l.id, l.user_id, l.summary, l.work_items, l.created_at,
                   u.full_name, u.email
            FROM daily_work_logs l
            LEFT JOIN users u ON u.id = l.user_id
            WHERE l.created_at >= $1
              AND l.created_at <= $2
              AND ($3::uuid IS NULL OR l.user_id = $3)
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trims_and_drops_empty_items() {
        let user = Uuid::new_v4();
        let items = vec![
            "  Fixed login bug ".to_string(),
            "   ".to_string(),
            String::new(),
            "Reviewed PR #42".to_string(),
        ];

        let log = CreateDailyWorkLog::new(user, Some("  Productive day  "), &items).unwrap();

        assert_eq!(log.summary.as_deref(), Some("Productive day"));
        assert_eq!(log.work_items, vec!["Fixed login bug", "Reviewed PR #42"]);
    }

    #[test]
    fn test_blank_summary_becomes_none() {
        let log = CreateDailyWorkLog::new(Uuid::new_v4(), Some("  "), &["Standup".to_string()])
            .unwrap();
        assert!(log.summary.is_none());
    }

    #[test]
    fn test_empty_log_rejected() {
        let err = CreateDailyWorkLog::new(Uuid::new_v4(), Some(" "), &[" ".to_string()])
            .unwrap_err();
        assert_eq!(err.to_string(), "A summary or at least one work item is required");
        assert!(CreateDailyWorkLog::new(Uuid::new_v4(), None, &[]).is_err());
    }

    #[test]
    fn test_work_items_serialize_as_array() {
        let log = DailyWorkLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            summary: None,
            work_items: Json(vec!["Deploy".to_string()]),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["work_items"], serde_json::json!(["Deploy"]));
    }
}
