/// Task endpoints for signed-in users
///
/// - `GET    /v1/tasks`: my tasks, split into received and given
/// - `POST   /v1/tasks`: assign a new task
/// - `GET    /v1/tasks/:id`
/// - `PATCH  /v1/tasks/:id`: edit title, description, assignee, due date, priority
/// - `PATCH  /v1/tasks/:id/status`
/// - `DELETE /v1/tasks/:id`
///
/// Every task is returned as a [`TaskView`] with `overdue` and `due_label`
/// computed against today's UTC date.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use teamtrack_shared::{
    auth::middleware::AuthContext,
    filters::{split_for_user, SplitTasks, TaskFilter},
    models::{
        task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
        user::User,
    },
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// A task plus its derived due-date fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub overdue: bool,
    pub due_label: String,
}

impl TaskView {
    pub fn new(task: Task, today: NaiveDate) -> Self {
        Self {
            overdue: task.is_overdue(today),
            due_label: task.due_label(today),
            task,
        }
    }

    pub fn now(task: Task) -> Self {
        Self::new(task, Utc::now().date_naive())
    }
}

pub fn views(tasks: Vec<Task>, today: NaiveDate) -> Vec<TaskView> {
    tasks.into_iter().map(|t| TaskView::new(t, today)).collect()
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    pub search: Option<String>,
    /// `pending`, `in-progress`, `completed` or `all`
    pub status: Option<String>,
    /// `low`, `medium`, `high` or `all`
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

async fn ensure_assignee_exists(state: &AppState, user_id: Uuid) -> ApiResult<()> {
    if User::exists(&state.db, user_id).await? {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Assigned user does not exist".to_string()))
    }
}

/// Lists the caller's tasks
///
/// ```text
/// GET /v1/tasks?search=invoice&status=pending&priority=all
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<SplitTasks<TaskView>>> {
    let filter = TaskFilter::from_params(
        query.search.as_deref(),
        query.status.as_deref(),
        query.priority.as_deref(),
    )?;

    let tasks = Task::list_involving(&state.db, auth.user_id).await?;
    let split = split_for_user(tasks, auth.user_id, &filter);
    let today = Utc::now().date_naive();

    Ok(Json(SplitTasks {
        assigned_to_me: views(split.assigned_to_me, today),
        assigned_by_me: views(split.assigned_by_me, today),
    }))
}

/// Assigns a new task; the caller becomes the assigner
///
/// Title, assignee and due date are required. Status starts as `pending`,
/// priority defaults to `medium`.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskView>)> {
    req.validate()?;

    let title = req.title.as_deref().map(str::trim).unwrap_or_default();
    let (Some(assigned_to), Some(due_date)) = (req.assigned_to, req.due_date) else {
        return Err(ApiError::BadRequest("Please fill in all required fields".to_string()));
    };
    if title.is_empty() {
        return Err(ApiError::BadRequest("Please fill in all required fields".to_string()));
    }

    ensure_assignee_exists(&state, assigned_to).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: title.to_string(),
            description: req
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            assigned_by: Some(auth.user_id),
            assigned_to,
            priority: req.priority.unwrap_or_default(),
            due_date: Some(due_date),
        },
    )
    .await?;

    info!(task_id = %task.id, assigned_by = %auth.user_id, assigned_to = %assigned_to, "Task created");

    Ok((StatusCode::CREATED, Json(TaskView::now(task))))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskView>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(Json(TaskView::now(task)))
}

/// Edits a task; only the fields present in the body change
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskView>> {
    req.validate()?;

    let title = match req.title.as_deref().map(str::trim) {
        Some("") => return Err(ApiError::BadRequest("Task title cannot be empty".to_string())),
        other => other.map(str::to_string),
    };

    if let Some(assignee) = req.assigned_to {
        ensure_assignee_exists(&state, assignee).await?;
    }

    let update = UpdateTask {
        title,
        description: req.description.map(|d| d.trim().to_string()),
        assigned_to: req.assigned_to,
        due_date: req.due_date,
        priority: req.priority,
    };

    if update.is_empty() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }

    let task = Task::update(&state.db, id, update)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(Json(TaskView::now(task)))
}

/// Moves a task to another status
///
/// `completed` stamps `completed_at`; any other status clears it.
pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<TaskView>> {
    let status: TaskStatus = req.status.parse()?;

    let task = Task::update_status(&state.db, id, status)
        .await?
        .ok_or_else(task_not_found)?;

    info!(task_id = %id, user_id = %auth.user_id, status = status.as_str(), "Task status updated");

    Ok(Json(TaskView::now(task)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if Task::delete(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(task_not_found())
    }
}
