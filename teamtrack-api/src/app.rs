/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use teamtrack_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use teamtrack_shared::auth::{
    authorization::admin_only,
    middleware::{jwt_auth_middleware, AuthError},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// HS256 key for signing and validating tokens
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete router
///
/// ```text
/// /
/// ├── GET /health                     public
/// └── /v1
///     ├── /auth                       public
///     │   ├── POST /register
///     │   ├── POST /login
///     │   └── POST /refresh
///     ├── GET  /users/me              jwt
///     ├── GET  /users
///     ├── GET  /dashboard
///     ├── /tasks
///     │   ├── GET, POST /
///     │   ├── GET, PATCH, DELETE /:id
///     │   └── PATCH /:id/status
///     ├── GET, POST /daily-logs
///     └── /admin                      jwt + admin role
///         ├── GET /users, PATCH /users/:id/status
///         ├── GET, POST /teams, PATCH, DELETE /teams/:id
///         ├── PUT /team-users
///         ├── GET /tasks
///         └── GET /daily-reports
/// ```
///
/// Every response passes through tracing, CORS and the security headers.
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let admin_routes = Router::new()
        .route("/users", get(routes::admin::users::list_users))
        .route(
            "/users/:id/status",
            patch(routes::admin::users::update_user_status),
        )
        .route(
            "/teams",
            get(routes::admin::teams::list_teams).post(routes::admin::teams::create_team),
        )
        .route(
            "/teams/:id",
            patch(routes::admin::teams::update_team).delete(routes::admin::teams::delete_team),
        )
        .route("/team-users", put(routes::admin::team_users::set_memberships))
        .route("/tasks", get(routes::admin::tasks::list_tasks))
        .route(
            "/daily-reports",
            get(routes::admin::daily_reports::list_reports),
        )
        .layer(middleware::from_fn(admin_only));

    // Admin routes are nested before the JWT layer so it runs first
    let protected_routes = Router::new()
        .route("/users/me", get(routes::users::me))
        .route("/users", get(routes::users::list_people))
        .route("/dashboard", get(routes::dashboard::dashboard))
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/tasks/:id/status", patch(routes::tasks::update_task_status))
        .route(
            "/daily-logs",
            get(routes::daily_logs::list_my_logs).post(routes::daily_logs::submit_log),
        )
        .nest("/admin", admin_routes)
        .layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    let cors = if state.config.cors_allows_any() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Runs the shared JWT middleware with the configured secret
async fn jwt_auth_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    jwt_auth_middleware(state.jwt_secret().to_string(), req, next).await
}
