/// Dashboard summary for the signed-in user
///
/// ```text
/// GET /v1/dashboard
/// ```
///
/// Counts cover the tasks assigned to the caller; `recent_tasks` holds the
/// newest few of them.

use crate::{app::AppState, error::ApiResult, routes::tasks::TaskView};
use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::Serialize;
use teamtrack_shared::{
    analytics::TaskStats, auth::middleware::AuthContext, models::task::Task,
};

const RECENT_TASKS: usize = 5;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub stats: TaskStats,
    /// Percentage of completed tasks, 0 to 100
    pub completion_rate: u8,
    pub recent_tasks: Vec<TaskView>,
}

impl DashboardResponse {
    fn build(tasks: Vec<Task>, today: chrono::NaiveDate) -> Self {
        let stats = TaskStats::compute(&tasks, today);
        let recent_tasks = tasks
            .into_iter()
            .take(RECENT_TASKS)
            .map(|task| TaskView::new(task, today))
            .collect();

        Self {
            completion_rate: stats.completion_rate(),
            stats,
            recent_tasks,
        }
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<DashboardResponse>> {
    let tasks = Task::list_assigned_to(&state.db, auth.user_id).await?;
    Ok(Json(DashboardResponse::build(tasks, Utc::now().date_naive())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use teamtrack_shared::models::task::{TaskPriority, TaskStatus};
    use uuid::Uuid;

    fn task(status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Review".to_string(),
            description: String::new(),
            assigned_by: None,
            assigned_to: None,
            status,
            priority: TaskPriority::Medium,
            due_date: None,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_dashboard_caps_recent_tasks() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut tasks: Vec<Task> = (0..7).map(|_| task(TaskStatus::Pending)).collect();
        tasks.push(task(TaskStatus::Completed));

        let dashboard = DashboardResponse::build(tasks, today);

        assert_eq!(dashboard.stats.total, 8);
        assert_eq!(dashboard.stats.completed, 1);
        assert_eq!(dashboard.recent_tasks.len(), RECENT_TASKS);
    }

    #[test]
    fn test_dashboard_empty() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let dashboard = DashboardResponse::build(Vec::new(), today);
        assert_eq!(dashboard.stats, TaskStats::default());
        assert_eq!(dashboard.completion_rate, 0);
        assert!(dashboard.recent_tasks.is_empty());
    }
}
