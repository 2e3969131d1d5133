/// Database models for TeamTrack
///
/// One type per table, each with its async queries as associated functions.
///
/// # Models
///
/// - `user`: accounts, roles and approval status
/// - `team`: teams and the `team_users` membership relation
/// - `task`: assigned tasks with status, priority and due date
/// - `daily_log`: daily work logs (summary + work items)
///
/// # Example
///
/// ```no_run
/// use teamtrack_shared::models::user::{User, CreateUser};
/// use teamtrack_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     full_name: "Tom Hanks".to_string(),
///     email: "tom.hanks@company.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod daily_log;
pub mod task;
pub mod team;
pub mod user;
