/// Everyone's daily reports, for admins
///
/// ```text
/// GET /v1/admin/daily-reports?time_range=today&user_id=<uuid>&search=deploy
/// ```
///
/// Logs are grouped per user and UTC day before `search` is applied, so a
/// match on any merged line keeps the whole day.

use crate::{app::AppState, error::ApiResult, routes::admin::tasks::parse_user_filter};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use teamtrack_shared::{
    models::daily_log::DailyWorkLog,
    reports::{group_daily_reports, search_reports, DailyReport},
    time_range::ReportTimeRange,
};

#[derive(Debug, Default, Deserialize)]
pub struct DailyReportQuery {
    pub time_range: Option<String>,
    pub user_id: Option<String>,
    pub search: Option<String>,
}

pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<DailyReportQuery>,
) -> ApiResult<Json<Vec<DailyReport>>> {
    let user_id = parse_user_filter(query.user_id.as_deref())?;
    let (start, end) = ReportTimeRange::from_param(query.time_range.as_deref()).bounds(Utc::now());

    let rows = DailyWorkLog::list_in_range(&state.db, start, end, user_id).await?;
    let reports = search_reports(group_daily_reports(&rows), query.search.as_deref());

    Ok(Json(reports))
}
