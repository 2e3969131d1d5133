/// Shared setup for the integration tests
///
/// Needs `DATABASE_URL` and `JWT_SECRET` (a `.env` file works). Each context
/// seeds its own approved admin and regular user with unique emails, so
/// tests can run in parallel against one database.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::PgPool;
use teamtrack_api::{
    app::{build_router, AppState},
    config::Config,
};
use teamtrack_shared::{
    auth::{jwt, password::hash_password},
    db::migrations::run_migrations,
    models::user::{CreateUser, User, UserRole, UserStatus},
};
use tower::Service as _;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "sunflower";

pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub config: Config,
    pub admin: User,
    pub user: User,
    pub admin_token: String,
    pub user_token: String,
}

impl TestContext {
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;
        let db = PgPool::connect(&config.database.url).await?;
        run_migrations(&db).await?;

        let admin = seed_user(&db, "Ada Admin", UserRole::Admin, UserStatus::Approved).await?;
        let user = seed_user(&db, "Uma User", UserRole::User, UserStatus::Approved).await?;

        let admin_token = jwt::issue_token_pair(admin.id, admin.role, &config.jwt.secret)?.access_token;
        let user_token = jwt::issue_token_pair(user.id, user.role, &config.jwt.secret)?.access_token;

        let app = build_router(AppState::new(db.clone(), config.clone()));

        Ok(Self {
            db,
            app,
            config,
            admin,
            user,
            admin_token,
            user_token,
        })
    }

    /// Sends a request and returns the status with the parsed JSON body
    /// (`Value::Null` for empty bodies)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .call(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Removes the seeded users; their logs and memberships cascade
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM tasks WHERE assigned_by = ANY($1) OR assigned_to = ANY($1)")
            .bind(vec![self.admin.id, self.user.id])
            .execute(&self.db)
            .await?;
        User::delete(&self.db, self.admin.id).await?;
        User::delete(&self.db, self.user.id).await?;
        Ok(())
    }
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@teamtrack.test", prefix, Uuid::new_v4())
}

pub async fn seed_user(
    db: &PgPool,
    full_name: &str,
    role: UserRole,
    status: UserStatus,
) -> anyhow::Result<User> {
    let user = User::create_with_role(
        db,
        CreateUser {
            full_name: full_name.to_string(),
            email: unique_email(&full_name.to_lowercase().replace(' ', ".")),
            password_hash: hash_password(TEST_PASSWORD)?,
        },
        role,
        status,
    )
    .await?;

    Ok(user)
}
