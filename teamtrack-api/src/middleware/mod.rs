/// Middleware for the API server
///
/// - `security`: security response headers

pub mod security;
