//! # TeamTrack Shared Library
//!
//! Types, queries and domain logic used by the TeamTrack API server.
//!
//! ## Module Organization
//!
//! - `db`: connection pool and migrations
//! - `models`: one type per table with its queries
//! - `auth`: password hashing, JWT sessions, Axum auth layers
//! - `time_range`: time windows for the admin views
//! - `filters`: in-memory task and user filters
//! - `reports`: daily report grouping and search
//! - `analytics`: task statistics

pub mod analytics;
pub mod auth;
pub mod db;
pub mod filters;
pub mod models;
pub mod reports;
pub mod time_range;

/// Current version of the TeamTrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
