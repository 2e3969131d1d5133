/// User model and database operations
///
/// Users register themselves and start out `pending`; an admin approves or
/// rejects them. Only approved users can sign in.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('user', 'admin');
/// CREATE TYPE user_status AS ENUM ('pending', 'approved', 'rejected');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     full_name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     avatar_url VARCHAR(512),
///     role user_role NOT NULL DEFAULT 'user',
///     status user_status NOT NULL DEFAULT 'pending',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use teamtrack_shared::models::user::{User, CreateUser, UserStatus};
/// use teamtrack_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     full_name: "Mia Belle".to_string(),
///     email: "mia.belle@company.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// User::update_status(&pool, user.id, UserStatus::Approved).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular team member
    #[default]
    User,

    /// Manages users, teams and sees every task and report
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// Approval state of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Registered, waiting for an admin decision
    #[default]
    Pending,

    /// Allowed to sign in
    Approved,

    /// Turned down by an admin
    Rejected,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Approved => "approved",
            UserStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status. Use pending | approved | rejected")]
pub struct InvalidUserStatus;

impl FromStr for UserStatus {
    type Err = InvalidUserStatus;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(UserStatus::Pending),
            "approved" => Ok(UserStatus::Approved),
            "rejected" => Ok(UserStatus::Rejected),
            _ => Err(InvalidUserStatus),
        }
    }
}

/// User account
///
/// The password hash never leaves the server: it is skipped on serialization.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,

    pub full_name: String,

    /// Stored lowercased
    pub email: String,

    /// Argon2id hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub avatar_url: Option<String>,

    pub role: UserRole,

    pub status: UserStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name shown in the UI: the full name, or the email when the name is blank
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}

/// Minimal projection used for assignee pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

/// Input for creating a new user
///
/// Role and status take the table defaults (`user`, `pending`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub full_name: String,

    /// Lowercased before insert
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

/// Normalizes an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

const USER_COLUMNS: &str =
    "id, full_name, email, password_hash, avatar_url, role, status, created_at, updated_at";

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on `users_email_key` when the email is
    /// already registered.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (full_name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.full_name.trim())
        .bind(normalize_email(&data.email))
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Inserts a user with an explicit role and status (admin seeding, tests)
    pub async fn create_with_role(
        pool: &PgPool,
        data: CreateUser,
        role: UserRole,
        status: UserStatus,
    ) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (full_name, email, password_hash, role, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.full_name.trim())
        .bind(normalize_email(&data.email))
        .bind(data.password_hash)
        .bind(role)
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email (normalized before lookup)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Sets the approval status
    ///
    /// Returns `None` when no user has this id.
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: UserStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists every user, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// People that tasks can be assigned to: everyone who is not pending
    pub async fn list_assignable(pool: &PgPool) -> Result<Vec<Person>, sqlx::Error> {
        let people = sqlx::query_as::<_, Person>(
            r#"
            SELECT id, full_name, email
            FROM users
            WHERE status <> 'pending'
            ORDER BY full_name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(people)
    }

    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(exists)
    }

    /// Deletes a user; memberships and logs cascade, task references are nulled
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(full_name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: full_name.to_string(),
            email: "nora.quinn@company.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            avatar_url: None,
            role: UserRole::User,
            status: UserStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_status_parse() {
        assert_eq!("approved".parse::<UserStatus>(), Ok(UserStatus::Approved));
        assert_eq!(" Rejected ".parse::<UserStatus>(), Ok(UserStatus::Rejected));
        assert_eq!("PENDING".parse::<UserStatus>(), Ok(UserStatus::Pending));
        assert_eq!("banned".parse::<UserStatus>(), Err(InvalidUserStatus));
        assert_eq!("".parse::<UserStatus>(), Err(InvalidUserStatus));
    }

    #[test]
    fn test_invalid_status_message() {
        assert_eq!(
            InvalidUserStatus.to_string(),
            "Invalid status. Use pending | approved | rejected"
        );
    }

    #[test]
    fn test_defaults() {
        assert_eq!(UserRole::default(), UserRole::User);
        assert_eq!(UserStatus::default(), UserStatus::Pending);
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::User.is_admin());
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        assert_eq!(sample_user("Nora Quinn").display_name(), "Nora Quinn");
        assert_eq!(sample_user("   ").display_name(), "nora.quinn@company.com");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(sample_user("Nora Quinn")).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "user");
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Zoe.Jane@Company.COM "), "zoe.jane@company.com");
    }
}
