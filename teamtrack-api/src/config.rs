/// Configuration for the API server
///
/// Everything is read from environment variables; a `.env` file is loaded
/// first when present.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 8080)
/// - `JWT_SECRET`: HS256 signing key, at least 32 characters (required)
/// - `CORS_ORIGINS`: comma separated origins, `*` for any (default: `*`)
/// - `PRODUCTION`: `true` enables HSTS (default: false)
/// - `ADMIN_EMAIL`, `ADMIN_PASSWORD`: approved admin created at startup when
///   no user has that email (optional, both or neither)
/// - `ADMIN_NAME`: full name of that admin (default: `Administrator`)
/// - `RUST_LOG`: log filter
///
/// # Example
///
/// ```no_run
/// use teamtrack_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use teamtrack_shared::auth::password::MIN_PASSWORD_LENGTH;

/// Minimum length of `JWT_SECRET`
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,

    /// First admin account, seeded on startup
    pub admin: Option<AdminSeedConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Allowed CORS origins; `["*"]` allows any
    pub cors_origins: Vec<String>,

    /// Adds `Strict-Transport-Security` when true
    pub production: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Generate with `openssl rand -hex 32`
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSeedConfig {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl Config {
    /// Loads configuration from the environment
    ///
    /// # Errors
    ///
    /// Fails when a required variable is missing, a number does not parse or
    /// the JWT secret is too short.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is not a valid port: {}", e))?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is not a number: {}", e))?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        validate_jwt_secret(&jwt_secret)?;

        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));
        let production = parse_bool(env::var("PRODUCTION").ok().as_deref());

        let admin = parse_admin_seed(
            env::var("ADMIN_NAME").ok(),
            env::var("ADMIN_EMAIL").ok(),
            env::var("ADMIN_PASSWORD").ok(),
        )?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
            admin,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// True when any origin is allowed
    pub fn cors_allows_any(&self) -> bool {
        self.api.cors_origins.iter().any(|o| o == "*")
    }
}

fn validate_jwt_secret(secret: &str) -> anyhow::Result<()> {
    if secret.len() < MIN_JWT_SECRET_LENGTH {
        anyhow::bail!(
            "JWT_SECRET must be at least {} characters long",
            MIN_JWT_SECRET_LENGTH
        );
    }
    Ok(())
}

/// Splits a comma separated origin list, dropping blanks; empty means `*`
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}

/// Both `ADMIN_EMAIL` and `ADMIN_PASSWORD` or neither; blank counts as unset
fn parse_admin_seed(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<Option<AdminSeedConfig>> {
    let email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());
    let password = password.filter(|p| !p.is_empty());

    match (email, password) {
        (None, None) => Ok(None),
        (Some(email), Some(password)) => {
            if password.chars().count() < MIN_PASSWORD_LENGTH {
                anyhow::bail!(
                    "ADMIN_PASSWORD must be at least {} characters",
                    MIN_PASSWORD_LENGTH
                );
            }
            let full_name = name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Administrator".to_string());
            Ok(Some(AdminSeedConfig {
                full_name,
                email,
                password,
            }))
        }
        (Some(_), None) => anyhow::bail!("ADMIN_PASSWORD is required when ADMIN_EMAIL is set"),
        (None, Some(_)) => anyhow::bail!("ADMIN_EMAIL is required when ADMIN_PASSWORD is set"),
    }
}

fn parse_bool(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "yes")
    )
}
