/// User endpoints for signed-in users
///
/// - `GET /v1/users/me`: the caller's profile and team ids
/// - `GET /v1/users`: people a task can be assigned to

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::Serialize;
use teamtrack_shared::{
    auth::middleware::AuthContext,
    models::{
        team::TeamUser,
        user::{Person, User},
    },
};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: User,
    pub team_ids: Vec<Uuid>,
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<MeResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let team_ids = TeamUser::team_ids_for_user(&state.db, user.id).await?;

    Ok(Json(MeResponse { user, team_ids }))
}

/// Everyone except accounts still waiting for approval
pub async fn list_people(State(state): State<AppState>) -> ApiResult<Json<Vec<Person>>> {
    let people = User::list_assignable(&state.db).await?;
    Ok(Json(people))
}
