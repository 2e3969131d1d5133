//! Task statistics for the dashboards

use crate::models::task::{Task, TaskPriority, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Counts over a set of tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    /// Past due and not completed
    pub overdue: usize,
    pub high_priority: usize,
}

impl TaskStats {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Pending => stats.pending += 1,
            }
            if task.is_overdue(today) {
                stats.overdue += 1;
            }
            if task.priority == TaskPriority::High {
                stats.high_priority += 1;
            }
            stats
        })
    }

    /// Share of completed tasks in percent, 0 for an empty set
    pub fn completion_rate(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100) / self.total) as u8
    }
}
