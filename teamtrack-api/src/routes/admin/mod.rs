/// Admin-only endpoints
///
/// Mounted under `/v1/admin` behind both the JWT layer and the admin check.
///
/// - `users`: account approval
/// - `teams`: team CRUD
/// - `team_users`: membership assignment
/// - `tasks`: task analytics
/// - `daily_reports`: everyone's daily reports

pub mod daily_reports;
pub mod tasks;
pub mod team_users;
pub mod teams;
pub mod users;
