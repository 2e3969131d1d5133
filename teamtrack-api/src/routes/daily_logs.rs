/// Daily work log endpoints for signed-in users
///
/// - `GET  /v1/daily-logs?time_range=1week`: my logs grouped per day
/// - `POST /v1/daily-logs`: submit a log

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use teamtrack_shared::{
    auth::middleware::AuthContext,
    models::daily_log::{CreateDailyWorkLog, DailyWorkLog},
    reports::{group_daily_reports, DailyReport},
    time_range::ReportTimeRange,
};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct DailyLogQuery {
    /// `today`, `yesterday`, `1week`, `1month`; anything else means all time
    pub time_range: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitDailyLogRequest {
    pub summary: Option<String>,
    #[serde(default)]
    pub work_items: Vec<String>,
}

pub async fn list_my_logs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<DailyLogQuery>,
) -> ApiResult<Json<Vec<DailyReport>>> {
    let range = ReportTimeRange::from_param(query.time_range.as_deref());
    let (start, end) = range.bounds(Utc::now());

    let rows = DailyWorkLog::list_in_range(&state.db, start, end, Some(auth.user_id)).await?;

    Ok(Json(group_daily_reports(&rows)))
}

/// Stores a log for the caller
///
/// Items are trimmed and blank ones dropped; the log needs a summary or at
/// least one item.
pub async fn submit_log(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<SubmitDailyLogRequest>,
) -> ApiResult<(StatusCode, Json<DailyWorkLog>)> {
    let data = CreateDailyWorkLog::new(auth.user_id, req.summary.as_deref(), &req.work_items)?;
    let log = DailyWorkLog::create(&state.db, data).await?;

    info!(log_id = %log.id, user_id = %auth.user_id, items = log.work_items.len(), "Daily log submitted");

    Ok((StatusCode::CREATED, Json(log)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_defaults_items() {
        let req: SubmitDailyLogRequest =
            serde_json::from_value(serde_json::json!({ "summary": "Wrapped up QA" })).unwrap();
        assert_eq!(req.summary.as_deref(), Some("Wrapped up QA"));
        assert!(req.work_items.is_empty());
    }
}
