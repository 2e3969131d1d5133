/// API route handlers
///
/// - `health`: health check
/// - `auth`: register, login, refresh
/// - `users`: own profile, assignable people
/// - `dashboard`: own task summary
/// - `tasks`: task assignment and tracking
/// - `daily_logs`: own daily work logs
/// - `admin`: admin-only endpoints

pub mod admin;
pub mod auth;
pub mod daily_logs;
pub mod dashboard;
pub mod health;
pub mod tasks;
pub mod users;
