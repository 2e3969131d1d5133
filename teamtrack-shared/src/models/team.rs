/// Team model and the `team_users` membership relation
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     created_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE team_users (
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (team_id, user_id)
/// );
/// ```
///
/// Teams are listed together with their member ids. Memberships are loaded
/// in one query and attached in memory with [`attach_members`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Row of the `team_users` join table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamUser {
    pub team_id: Uuid,
    pub user_id: Uuid,
}

/// A team together with the ids of its members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamWithMembers {
    #[serde(flatten)]
    pub team: Team,
    pub members: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    /// Already trimmed and non-empty
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Partial team update
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTeam {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl UpdateTeam {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Groups membership rows by team, preserving the team order
///
/// Teams without rows get an empty member list; rows for unknown teams are
/// dropped.
pub fn attach_members(teams: Vec<Team>, links: &[TeamUser]) -> Vec<TeamWithMembers> {
    let mut members_by_team: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for link in links {
        members_by_team.entry(link.team_id).or_default().push(link.user_id);
    }

    teams
        .into_iter()
        .map(|team| {
            let members = members_by_team.remove(&team.id).unwrap_or_default();
            TeamWithMembers { team, members }
        })
        .collect()
}

const TEAM_COLUMNS: &str = "id, name, description, created_by, created_at";

impl Team {
    pub async fn create(pool: &PgPool, data: CreateTeam) -> Result<Self, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(&format!(
            r#"
            INSERT INTO teams (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING {TEAM_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.description)
        .bind(data.created_by)
        .fetch_one(pool)
        .await?;

        Ok(team)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Applies a partial update; `None` when the team does not exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTeam,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut assignments = Vec::new();
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            assignments.push(format!("name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            assignments.push(format!("description = ${}", bind_count));
        }

        let query = format!(
            "UPDATE teams SET {} WHERE id = $1 RETURNING {TEAM_COLUMNS}",
            assignments.join(", ")
        );

        let mut q = sqlx::query_as::<_, Team>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a team's memberships and then the team, in one transaction
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM team_users WHERE team_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all teams, newest first, with their member ids
    pub async fn list_with_members(pool: &PgPool) -> Result<Vec<TeamWithMembers>, sqlx::Error> {
        let teams = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        let links = sqlx::query_as::<_, TeamUser>(
            "SELECT team_id, user_id FROM team_users ORDER BY created_at ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(attach_members(teams, &links))
    }

    /// Member ids of one team
    pub async fn member_ids(pool: &PgPool, team_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let ids = sqlx::query_scalar(
            "SELECT user_id FROM team_users WHERE team_id = $1 ORDER BY created_at ASC",
        )
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }

    /// Loads a team and its members
    pub async fn find_with_members(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<TeamWithMembers>, sqlx::Error> {
        let Some(team) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let members = Self::member_ids(pool, id).await?;
        Ok(Some(TeamWithMembers { team, members }))
    }
}

impl TeamUser {
    /// Replaces every membership of `user_id` with `team_ids`
    ///
    /// Runs in one transaction so a failed insert leaves the previous
    /// memberships untouched. Duplicate team ids are collapsed; an empty list
    /// removes the user from every team.
    pub async fn replace_for_user(
        pool: &PgPool,
        user_id: Uuid,
        team_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let unique: BTreeSet<Uuid> = team_ids.iter().copied().collect();
        let unique: Vec<Uuid> = unique.into_iter().collect();

        let mut tx = pool.begin().await?;

        let removed = sqlx::query("DELETE FROM team_users WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if !unique.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO team_users (team_id, user_id)
                SELECT team_id, $2 FROM UNNEST($1::uuid[]) AS t(team_id)
                "#,
            )
            .bind(&unique)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(
            user_id = %user_id,
            removed,
            added = unique.len(),
            "Replaced team memberships"
        );

        Ok(unique)
    }

    /// Team ids the user belongs to
    pub async fn team_ids_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let ids = sqlx::query_scalar("SELECT team_id FROM team_users WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str) -> Team {
        Team {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_attach_members_groups_by_team() {
        let dev = team("Development");
        let qa = team("Quality Assurance");
        let design = team("Design");
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let links = vec![
            TeamUser { team_id: dev.id, user_id: a },
            TeamUser { team_id: qa.id, user_id: b },
            TeamUser { team_id: dev.id, user_id: c },
            TeamUser { team_id: Uuid::new_v4(), user_id: a },
        ];

        let result = attach_members(vec![dev.clone(), qa.clone(), design.clone()], &links);

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].team, dev);
        assert_eq!(result[0].members, vec![a, c]);
        assert_eq!(result[1].members, vec![b]);
        assert!(result[2].members.is_empty());
    }

    #[test]
    fn test_team_with_members_serializes_flat() {
        let t = team("Product");
        let member = Uuid::new_v4();
        let json = serde_json::to_value(TeamWithMembers {
            team: t.clone(),
            members: vec![member],
        })
        .unwrap();

        assert_eq!(json["name"], "Product");
        assert_eq!(json["id"], t.id.to_string());
        assert_eq!(json["members"][0], member.to_string());
        assert!(json["description"].is_null());
    }

    #[test]
    fn test_update_team_is_empty() {
        assert!(UpdateTeam::default().is_empty());
        assert!(!UpdateTeam {
            name: None,
            description: Some(None),
        }
        .is_empty());
    }
}
