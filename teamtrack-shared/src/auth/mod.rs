/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id hashing and the registration password rules
/// - [`jwt`]: HS256 access and refresh tokens carrying the user's role
/// - [`middleware`]: Axum layer turning a bearer token into an [`middleware::AuthContext`]
/// - [`authorization`]: admin-only guard
///
/// # Example
///
/// ```no_run
/// use teamtrack_shared::auth::password::{hash_password, verify_password};
/// use teamtrack_shared::auth::jwt::issue_token_pair;
/// use teamtrack_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("sunflower")?;
/// assert!(verify_password("sunflower", &hash)?);
///
/// let tokens = issue_token_pair(Uuid::new_v4(), UserRole::User, "a-secret-that-is-at-least-32-bytes")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
