/// Database layer for TeamTrack
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: schema migrations for the users, teams, team_users,
///   tasks and daily_work_logs tables
///
/// Table models live in the `models` module at crate root level.
///
/// # Example
///
/// ```no_run
/// use teamtrack_shared::db::pool::{create_pool, DatabaseConfig};
/// use teamtrack_shared::db::migrations::run_migrations;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
