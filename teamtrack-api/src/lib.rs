//! # TeamTrack API Server Library
//!
//! HTTP layer of TeamTrack. Domain types, queries and auth primitives live
//! in `teamtrack-shared`; this crate wires them to axum.
//!
//! ## Modules
//!
//! - `app`: application state and router builder
//! - `bootstrap`: first-admin seeding at startup
//! - `config`: configuration from the environment
//! - `error`: error handling and HTTP response mapping
//! - `middleware`: security headers
//! - `routes`: route handlers

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
