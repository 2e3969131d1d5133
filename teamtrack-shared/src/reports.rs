//! Daily report aggregation
//!
//! A daily report merges every log one user wrote on one UTC day. Input rows
//! are expected newest first, as returned by
//! [`DailyWorkLog::list_in_range`](crate::models::daily_log::DailyWorkLog::list_in_range).

use crate::models::daily_log::DailyWorkLogWithAuthor;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Logs of one user on one day, merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    /// Id of the newest log in the group
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    /// Creation time of the newest log in the group
    pub created_at: DateTime<Utc>,
    /// Non-empty summaries joined with newlines
    pub summary: Option<String>,
    pub work_items: Vec<String>,
    pub user_name: String,
    pub user_email: Option<String>,
}

impl DailyReport {
    fn start(row: &DailyWorkLogWithAuthor, date: NaiveDate) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            date,
            created_at: row.created_at,
            summary: None,
            work_items: Vec::new(),
            user_name: display_name(row.full_name.as_deref(), row.email.as_deref()),
            user_email: row.email.clone(),
        }
    }

    fn absorb(&mut self, row: &DailyWorkLogWithAuthor) {
        if let Some(summary) = row.summary.as_deref().filter(|s| !s.trim().is_empty()) {
            match &mut self.summary {
                Some(merged) => {
                    merged.push('\n');
                    merged.push_str(summary);
                }
                None => self.summary = Some(summary.to_string()),
            }
        }
        self.work_items.extend(row.work_items.iter().cloned());
    }

    /// Case-insensitive match against author name, summary and work items
    ///
    /// A blank query matches every report.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        self.user_name.to_lowercase().contains(&query)
            || self
                .summary
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&query))
            || self
                .work_items
                .iter()
                .any(|item| item.to_lowercase().contains(&query))
    }
}

fn display_name(full_name: Option<&str>, email: Option<&str>) -> String {
    match (full_name.map(str::trim).filter(|n| !n.is_empty()), email) {
        (Some(name), _) => name.to_string(),
        (None, Some(email)) => email.to_string(),
        (None, None) => "Unknown".to_string(),
    }
}

/// Groups rows by (UTC date, user) keeping the order of first appearance
pub fn group_daily_reports(rows: &[DailyWorkLogWithAuthor]) -> Vec<DailyReport> {
    let mut reports: Vec<DailyReport> = Vec::new();
    let mut index: HashMap<(NaiveDate, Uuid), usize> = HashMap::new();

    for row in rows {
        let date = row.created_at.date_naive();
        let slot = *index.entry((date, row.user_id)).or_insert_with(|| {
            reports.push(DailyReport::start(row, date));
            reports.len() - 1
        });
        reports[slot].absorb(row);
    }

    reports
}

/// Keeps the reports matching `query`; `None` keeps everything
pub fn search_reports(reports: Vec<DailyReport>, query: Option<&str>) -> Vec<DailyReport> {
    match query {
        Some(q) => reports.into_iter().filter(|r| r.matches(q)).collect(),
        None => reports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sqlx::types::Json;

    fn row(
        user_id: Uuid,
        created_at: DateTime<Utc>,
        summary: Option<&str>,
        items: &[&str],
    ) -> DailyWorkLogWithAuthor {
        DailyWorkLogWithAuthor {
            id: Uuid::new_v4(),
            user_id,
            summary: summary.map(str::to_string),
            work_items: Json(items.iter().map(|s| s.to_string()).collect()),
            created_at,
            full_name: Some("Ava Stone".to_string()),
            email: Some("ava.stone@company.com".to_string()),
        }
    }

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_groups_same_user_same_day() {
        let ava = Uuid::new_v4();
        let newest = row(ava, at(10, 17), Some("Afternoon"), &["Deploy"]);
        let oldest = row(ava, at(10, 9), Some("Morning"), &["Standup", "Review"]);

        let reports = group_daily_reports(&[newest.clone(), oldest]);

        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.id, newest.id);
        assert_eq!(report.created_at, newest.created_at);
        assert_eq!(report.summary.as_deref(), Some("Afternoon\nMorning"));
        assert_eq!(report.work_items, vec!["Deploy", "Standup", "Review"]);
        assert_eq!(report.date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }

    #[test]
    fn test_separate_days_and_users_keep_first_appearance_order() {
        let ava = Uuid::new_v4();
        let ben = Uuid::new_v4();
        let rows = vec![
            row(ben, at(11, 10), Some("Ben day 11"), &[]),
            row(ava, at(11, 9), Some("Ava day 11"), &[]),
            row(ben, at(10, 18), Some("Ben day 10"), &[]),
            row(ben, at(11, 8), Some("Ben early 11"), &[]),
        ];

        let reports = group_daily_reports(&rows);

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].user_id, ben);
        assert_eq!(reports[0].summary.as_deref(), Some("Ben day 11\nBen early 11"));
        assert_eq!(reports[1].user_id, ava);
        assert_eq!(reports[2].summary.as_deref(), Some("Ben day 10"));
    }

    #[test]
    fn test_empty_summaries_skipped() {
        let ava = Uuid::new_v4();
        let rows = vec![
            row(ava, at(10, 17), None, &["Deploy"]),
            row(ava, at(10, 12), Some("  "), &[]),
            row(ava, at(10, 9), Some("Morning"), &[]),
        ];

        let reports = group_daily_reports(&rows);
        assert_eq!(reports[0].summary.as_deref(), Some("Morning"));

        let only_items = group_daily_reports(&rows[..1]);
        assert!(only_items[0].summary.is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(group_daily_reports(&[]).is_empty());
    }

    #[test]
    fn test_search_over_name_summary_and_items() {
        let ava = Uuid::new_v4();
        let reports = group_daily_reports(&[row(
            ava,
            at(10, 9),
            Some("Sprint planning"),
            &["Fixed OAuth redirect"],
        )]);

        assert_eq!(search_reports(reports.clone(), Some("ava")).len(), 1);
        assert_eq!(search_reports(reports.clone(), Some("PLANNING")).len(), 1);
        assert_eq!(search_reports(reports.clone(), Some("oauth")).len(), 1);
        assert_eq!(search_reports(reports.clone(), Some("  ")).len(), 1);
        assert_eq!(search_reports(reports.clone(), None).len(), 1);
        assert!(search_reports(reports, Some("kubernetes")).is_empty());
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(display_name(Some(" "), Some("x@company.com")), "x@company.com");
        assert_eq!(display_name(None, None), "Unknown");
        assert_eq!(display_name(Some("Eli"), None), "Eli");
    }
}
