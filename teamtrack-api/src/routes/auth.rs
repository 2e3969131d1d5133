/// Authentication endpoints
///
/// - `POST /v1/auth/register`: create an account, pending admin approval
/// - `POST /v1/auth/login`: exchange credentials for tokens
/// - `POST /v1/auth/refresh`: exchange a refresh token for an access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use teamtrack_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User, UserRole, UserStatus},
};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// May be blank; the session name then falls back to the email
    #[validate(length(max = 255, message = "Full name must be at most 255 characters"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,

    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The signed-in user as the client keeps it in its session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    /// Full name, or the email when the name is blank
    pub name: String,
    pub role: UserRole,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.display_name().to_string(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub user: SessionUser,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_in: i64,
}

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Rejects accounts that may not sign in yet (or ever)
fn ensure_can_sign_in(user: &User) -> ApiResult<()> {
    match user.status {
        UserStatus::Approved => Ok(()),
        UserStatus::Pending => Err(ApiError::Forbidden("Account is pending approval".to_string())),
        UserStatus::Rejected => Err(ApiError::Forbidden("Account has been rejected".to_string())),
    }
}

/// Registers a new user
///
/// ```text
/// POST /v1/auth/register
///
/// {
///   "full_name": "Zoe Jane",
///   "email": "zoe.jane@company.com",
///   "password": "sunflower",
///   "confirm_password": "sunflower"
/// }
/// ```
///
/// Answers `201` with the created user (role `user`, status `pending`).
///
/// # Errors
///
/// - `422`: invalid email, name over 255 characters, password mismatch or
///   shorter than 6
/// - `409`: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(mut req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.full_name = req.full_name.trim().to_string();
    req.email = req.email.trim().to_string();
    req.validate()?;

    password::validate_password(&req.password, &req.confirm_password)?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            full_name: req.full_name,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    info!(user_id = %user.id, "User registered, awaiting approval");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user,
            message: "Registration successful. Please wait for admin approval.".to_string(),
        }),
    ))
}

/// Signs a user in
///
/// ```text
/// POST /v1/auth/login
///
/// { "email": "zoe.jane@company.com", "password": "sunflower" }
/// ```
///
/// # Errors
///
/// - `401`: unknown email or wrong password (same message for both)
/// - `403`: account pending or rejected
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "Failed login attempt");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    ensure_can_sign_in(&user)?;

    let tokens = jwt::issue_token_pair(user.id, user.role, state.jwt_secret())?;

    info!(user_id = %user.id, role = user.role.as_str(), "User logged in");

    Ok(Json(LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        user: SessionUser::from(&user),
    }))
}

/// Issues a new access token
///
/// The user is reloaded, so the new token carries the current role and a
/// user rejected since login cannot refresh.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let claims = jwt::validate_refresh_token(&req.refresh_token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    ensure_can_sign_in(&user)?;

    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret(), user.role)?;

    Ok(Json(RefreshResponse {
        access_token,
        expires_in: jwt::TokenType::Access.default_expiration().num_seconds(),
    }))
}
