/// Team administration
///
/// - `GET    /v1/admin/teams`: every team with its member ids
/// - `POST   /v1/admin/teams`
/// - `PATCH  /v1/admin/teams/:id`
/// - `DELETE /v1/admin/teams/:id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Deserializer};
use teamtrack_shared::{
    auth::middleware::AuthContext,
    models::team::{CreateTeam, Team, TeamWithMembers, UpdateTeam},
};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,

    /// Absent leaves the description alone, `null` clears it
    #[serde(default, deserialize_with = "present_or_null")]
    pub description: Option<Option<String>>,
}

/// Tells an explicit `null` apart from a missing field
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Trimmed description, `None` when blank
fn clean_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

impl UpdateTeamRequest {
    fn into_update(self) -> ApiResult<UpdateTeam> {
        let name = match self.name.as_deref().map(str::trim) {
            Some("") => return Err(ApiError::BadRequest("Team name cannot be empty".to_string())),
            other => other.map(str::to_string),
        };

        let update = UpdateTeam {
            name,
            description: self.description.map(|d| clean_description(d.as_deref())),
        };

        if update.is_empty() {
            return Err(ApiError::BadRequest("Nothing to update".to_string()));
        }

        Ok(update)
    }
}

fn team_not_found() -> ApiError {
    ApiError::NotFound("Team not found".to_string())
}

pub async fn list_teams(State(state): State<AppState>) -> ApiResult<Json<Vec<TeamWithMembers>>> {
    let teams = Team::list_with_members(&state.db).await?;
    Ok(Json(teams))
}

/// Creates a team owned by the calling admin
pub async fn create_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<TeamWithMembers>)> {
    let name = req.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Team name is required".to_string()));
    }

    let team = Team::create(
        &state.db,
        CreateTeam {
            name: name.to_string(),
            description: clean_description(req.description.as_deref()),
            created_by: Some(auth.user_id),
        },
    )
    .await?;

    info!(team_id = %team.id, admin_id = %auth.user_id, "Team created");

    Ok((
        StatusCode::CREATED,
        Json(TeamWithMembers {
            team,
            members: Vec::new(),
        }),
    ))
}

pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTeamRequest>,
) -> ApiResult<Json<TeamWithMembers>> {
    let update = req.into_update()?;

    Team::update(&state.db, id, update)
        .await?
        .ok_or_else(team_not_found)?;

    let team = Team::find_with_members(&state.db, id)
        .await?
        .ok_or_else(team_not_found)?;

    Ok(Json(team))
}

/// Deletes a team together with its memberships
pub async fn delete_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !Team::delete(&state.db, id).await? {
        return Err(team_not_found());
    }

    info!(team_id = %id, admin_id = %auth.user_id, "Team deleted");

    Ok(StatusCode::NO_CONTENT)
}
