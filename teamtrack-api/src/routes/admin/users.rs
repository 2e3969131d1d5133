/// User administration
///
/// - `GET   /v1/admin/users?search=`
/// - `PATCH /v1/admin/users/:id/status`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use teamtrack_shared::{
    auth::middleware::AuthContext,
    filters::user_matches,
    models::user::{User, UserStatus},
};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    /// Matched against name, email, role and status
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub status: String,
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<Vec<User>>> {
    let mut users = User::list_all(&state.db).await?;

    if let Some(search) = query.search.as_deref() {
        users.retain(|user| user_matches(user, search));
    }

    Ok(Json(users))
}

/// Approves, rejects or resets a registration
pub async fn update_user_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserStatusRequest>,
) -> ApiResult<Json<User>> {
    let status: UserStatus = req.status.parse()?;

    let user = User::update_status(&state.db, id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = %id, admin_id = %auth.user_id, status = status.as_str(), "User status changed");

    Ok(Json(user))
}
