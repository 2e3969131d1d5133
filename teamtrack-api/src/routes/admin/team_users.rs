/// Team membership assignment
///
/// ```text
/// PUT /v1/admin/team-users
///
/// { "user_id": "...", "team_ids": ["...", "..."] }
/// ```
///
/// The user's memberships become exactly `team_ids`; an empty list removes
/// the user from every team.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use teamtrack_shared::{
    auth::middleware::AuthContext,
    models::{team::TeamUser, user::User},
};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SetMembershipsRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub team_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SetMembershipsResponse {
    pub user_id: Uuid,
    pub team_ids: Vec<Uuid>,
}

pub async fn set_memberships(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<SetMembershipsRequest>,
) -> ApiResult<Json<SetMembershipsResponse>> {
    if !User::exists(&state.db, req.user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let team_ids = TeamUser::replace_for_user(&state.db, req.user_id, &req.team_ids).await?;

    info!(
        user_id = %req.user_id,
        admin_id = %auth.user_id,
        teams = team_ids.len(),
        "Team memberships replaced"
    );

    Ok(Json(SetMembershipsResponse {
        user_id: req.user_id,
        team_ids,
    }))
}
