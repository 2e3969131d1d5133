/// Role checks
///
/// The only permission boundary is the admin area: every `/v1/admin/*`
/// route requires the `admin` role claim. Other routes only need a valid
/// session.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use teamtrack_shared::auth::authorization::admin_only;
///
/// let admin: Router = Router::new()
///     .route("/users", get(|| async { "every user" }))
///     .layer(middleware::from_fn(admin_only));
/// ```

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// No authenticated caller; the JWT layer did not run
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Admin access required")]
    AdminRequired,
}

impl IntoResponse for AuthzError {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            AuthzError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AuthzError::AdminRequired => (StatusCode::FORBIDDEN, "forbidden"),
        };
        (status, Json(json!({ "error": code, "message": self.to_string() }))).into_response()
    }
}

/// Fails unless the caller has the admin role
pub fn require_admin(auth: &AuthContext) -> Result<(), AuthzError> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::AdminRequired)
    }
}

/// Middleware guarding admin routes; must run after the JWT layer
pub async fn admin_only(req: Request, next: Next) -> Result<Response, AuthzError> {
    let auth = req
        .extensions()
        .get::<AuthContext>()
        .copied()
        .ok_or(AuthzError::Unauthenticated)?;

    if let Err(e) = require_admin(&auth) {
        warn!(user_id = %auth.user_id, path = %req.uri().path(), "Non-admin request to admin route");
        return Err(e);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use uuid::Uuid;

    #[test]
    fn test_require_admin() {
        let admin = AuthContext::new(Uuid::new_v4(), UserRole::Admin);
        let user = AuthContext::new(Uuid::new_v4(), UserRole::User);

        assert_eq!(require_admin(&admin), Ok(()));
        assert_eq!(require_admin(&user), Err(AuthzError::AdminRequired));
    }

    #[test]
    fn test_authz_error_status() {
        assert_eq!(
            AuthzError::AdminRequired.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthzError::Unauthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
