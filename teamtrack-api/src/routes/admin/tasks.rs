/// Task analytics for admins
///
/// ```text
/// GET /v1/admin/tasks?time_range=2weeks&user_id=<uuid>
/// ```
///
/// `time_range` is `1week`, `2weeks`, `1month` or `all`; `user_id` keeps the
/// tasks that user assigned or received (`all` or blank disables it).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::tasks::{views, TaskView},
};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use teamtrack_shared::{analytics::TaskStats, models::task::Task, time_range::TaskTimeRange};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct TaskAnalyticsQuery {
    pub time_range: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskAnalyticsResponse {
    pub tasks: Vec<TaskView>,
    pub stats: TaskStats,
}

/// Parses an optional user filter; `all` and blank mean no filter
pub(crate) fn parse_user_filter(value: Option<&str>) -> ApiResult<Option<Uuid>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => Uuid::parse_str(v)
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid user_id: {}", v))),
    }
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskAnalyticsQuery>,
) -> ApiResult<Json<TaskAnalyticsResponse>> {
    let user_id = parse_user_filter(query.user_id.as_deref())?;
    let now = Utc::now();
    let since = TaskTimeRange::from_param(query.time_range.as_deref()).start(now);

    let tasks = Task::list_for_analytics(&state.db, since, user_id).await?;
    let today = now.date_naive();
    let stats = TaskStats::compute(&tasks, today);

    Ok(Json(TaskAnalyticsResponse {
        tasks: views(tasks, today),
        stats,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_filter() {
        assert_eq!(parse_user_filter(None).unwrap(), None);
        assert_eq!(parse_user_filter(Some("")).unwrap(), None);
        assert_eq!(parse_user_filter(Some("ALL")).unwrap(), None);

        let id = Uuid::new_v4();
        assert_eq!(parse_user_filter(Some(id.to_string().as_str())).unwrap(), Some(id));

        assert!(matches!(
            parse_user_filter(Some("nobody")),
            Err(ApiError::BadRequest(_))
        ));
    }
}
