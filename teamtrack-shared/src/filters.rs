//! In-memory filters over already fetched rows

use crate::models::task::{InvalidTaskField, Task, TaskPriority, TaskStatus};
use crate::models::user::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task list filter; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Lowercased search term, matched against title and description
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    /// Builds a filter from raw query values
    ///
    /// Blank values and `all` disable a criterion. Unparseable status or
    /// priority values are rejected.
    pub fn from_params(
        search: Option<&str>,
        status: Option<&str>,
        priority: Option<&str>,
    ) -> Result<Self, InvalidTaskField> {
        Ok(Self {
            search: non_blank(search).map(|s| s.to_lowercase()),
            status: non_blank(status)
                .filter(|s| !s.eq_ignore_ascii_case("all"))
                .map(str::parse::<TaskStatus>)
                .transpose()?,
            priority: non_blank(priority)
                .filter(|s| !s.eq_ignore_ascii_case("all"))
                .map(str::parse::<TaskPriority>)
                .transpose()?,
        })
    }

    pub fn matches(&self, task: &Task) -> bool {
        let search_ok = self.search.as_deref().map_or(true, |q| {
            task.title.to_lowercase().contains(q) || task.description.to_lowercase().contains(q)
        });

        search_ok
            && self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Tasks of one user, split by direction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitTasks<T> {
    pub assigned_to_me: Vec<T>,
    pub assigned_by_me: Vec<T>,
}

/// Filters `tasks` and splits them into received and given
///
/// Tasks the user neither assigned nor received are dropped. A task a user
/// assigned to themselves lands in both lists.
pub fn split_for_user(tasks: Vec<Task>, user_id: Uuid, filter: &TaskFilter) -> SplitTasks<Task> {
    let mut split = SplitTasks {
        assigned_to_me: Vec::new(),
        assigned_by_me: Vec::new(),
    };

    for task in tasks
        .into_iter()
        .filter(|t| t.involves(user_id) && filter.matches(t))
    {
        let to_me = task.assigned_to == Some(user_id);
        let by_me = task.assigned_by == Some(user_id);
        match (to_me, by_me) {
            (true, true) => {
                split.assigned_by_me.push(task.clone());
                split.assigned_to_me.push(task);
            }
            (true, false) => split.assigned_to_me.push(task),
            _ => split.assigned_by_me.push(task),
        }
    }

    split
}

/// Case-insensitive user search over name, email, role and status
pub fn user_matches(user: &User, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    [
        user.full_name.as_str(),
        user.email.as_str(),
        user.role.as_str(),
        user.status.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&query))
}
