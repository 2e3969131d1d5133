/// Startup tasks that run after migrations
///
/// Registration only creates pending users and only an admin can approve
/// them, so a fresh database gets its first admin from `ADMIN_EMAIL` /
/// `ADMIN_PASSWORD`.

use crate::config::AdminSeedConfig;
use sqlx::PgPool;
use teamtrack_shared::{
    auth::password::hash_password,
    models::user::{CreateUser, User, UserRole, UserStatus},
};
use tracing::info;

/// Creates the configured admin unless a user with that email exists
///
/// Returns the new admin, or `None` when the email was already taken. An
/// existing account is left untouched whatever its role or status.
pub async fn seed_admin(pool: &PgPool, seed: &AdminSeedConfig) -> anyhow::Result<Option<User>> {
    if let Some(existing) = User::find_by_email(pool, &seed.email).await? {
        info!(user_id = %existing.id, "Admin seed skipped, email already registered");
        return Ok(None);
    }

    let admin = User::create_with_role(
        pool,
        CreateUser {
            full_name: seed.full_name.clone(),
            email: seed.email.clone(),
            password_hash: hash_password(&seed.password)?,
        },
        UserRole::Admin,
        UserStatus::Approved,
    )
    .await?;

    info!(user_id = %admin.id, "Seeded admin account");

    Ok(Some(admin))
}
