use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use super::error::ApiError;
use super::extract::JsonBody;
use crate::config::Config;
use crate::db::{now_timestamp, LoginRequest, LoginResponse, Session, User, UserResponse};
use crate::AppState;

/// Id of the synthetic user behind the configured admin token
pub const SYSTEM_USER_ID: &str = "system";

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes)?;
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

/// Hash a token for storage
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Bearer token or X-API-Key header value
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get("Authorization").and_then(|h| h.to_str().ok()) {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            return Some(token.trim().to_string());
        }
    }

    headers
        .get("X-API-Key")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim().to_string())
}

fn is_admin_token(config: &Config, token: &str) -> bool {
    let admin_token = config.auth.admin_token.as_bytes();
    let provided = token.as_bytes();
    !admin_token.is_empty() && admin_token.len() == provided.len() && admin_token.ct_eq(provided).into()
}

/// Resolve a token to the user it belongs to
pub async fn get_current_user(
    pool: &SqlitePool,
    config: &Config,
    token: &str,
) -> Result<Option<User>, sqlx::Error> {
    if is_admin_token(config, token) {
        let now = now_timestamp();
        return Ok(Some(User {
            id: SYSTEM_USER_ID.to_string(),
            email: "system@susu.local".to_string(),
            password_hash: String::new(),
            name: "System Admin".to_string(),
            role: "admin".to_string(),
            created_at: now.clone(),
            updated_at: now,
        }));
    }

    let session = match Session::find_valid(pool, &hash_token(token)).await? {
        Some(s) => s,
        None => return Ok(None),
    };
    User::get(pool, &session.user_id).await
}

/// Create the configured admin account on first start
pub async fn ensure_admin_user(
    pool: &SqlitePool,
    email: &Option<String>,
    password: &Option<String>,
) -> anyhow::Result<()> {
    let (email, password) = match (email, password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => return Ok(()),
    };

    if User::find_by_email(pool, email).await?.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(password)
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {}", e))?;
    User::create(pool, email, &password_hash, "Administrator", "admin").await?;
    tracing::info!("Created admin user {}", email);
    Ok(())
}

/// Periodically drop sessions past their expiry
pub fn spawn_session_cleanup_task(pool: SqlitePool, interval_secs: u64) {
    tokio::spawn(async move {
        let interval = std::time::Duration::from_secs(interval_secs);
        loop {
            tokio::time::sleep(interval).await;
            match Session::delete_expired(&pool).await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!("Removed {} expired sessions", removed),
                Err(e) => tracing::warn!("Session cleanup failed: {}", e),
            }
        }
    });
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = User::find_by_email(&state.db, request.email.trim())
        .await?
        .filter(|u| verify_password(&request.password, &u.password_hash));

    let user = match user {
        Some(u) => u,
        None => {
            tracing::warn!(email = %request.email, "Failed login attempt");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    let token = generate_token();
    let expires_at = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(state.config.auth.session_hours))
        .ok_or_else(|| ApiError::internal("Session lifetime out of range"))?
        .to_rfc3339_opts(chrono::SecondsFormat::Micros, true);

    Session::create(&state.db, &user.id, &hash_token(&token), &expires_at).await?;
    tracing::info!(user = %user.email, "User logged in");

    Ok(Json(LoginResponse {
        token,
        expires_at,
        user: UserResponse::from(user),
    }))
}

/// Report the user behind the presented token
pub async fn validate(user: User) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = extract_token(&headers).ok_or_else(|| ApiError::unauthorized("Missing token"))?;
    if !is_admin_token(&state.config, &token) {
        Session::delete_by_token_hash(&state.db, &hash_token(&token)).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Rejects requests without a valid admin token or session, and stores the
/// resolved user in the request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Authentication credentials were not provided."))?;

    let user = get_current_user(&state.db, &state.config, &token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired token."))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Extractor for the authenticated user
#[async_trait]
impl FromRequestParts<Arc<AppState>> for User {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<User>() {
            return Ok(user.clone());
        }

        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Authentication credentials were not provided."))?;
        get_current_user(&state.db, &state.config, &token)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired token."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_in_memory;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("s3cret-Susu!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-Susu!", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3cret-Susu!", "not-a-hash"));
    }

    #[test]
    fn test_extract_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert("X-API-Key", "key123".parse().unwrap());
        assert_eq!(extract_token(&headers).as_deref(), Some("key123"));

        headers.insert("Authorization", "Bearer tok456".parse().unwrap());
        assert_eq!(extract_token(&headers).as_deref(), Some("tok456"));
    }

    #[test]
    fn test_admin_token_compare() {
        let mut config = Config::default();
        config.auth.admin_token = "abc".to_string();
        assert!(is_admin_token(&config, "abc"));
        assert!(!is_admin_token(&config, "abd"));
        assert!(!is_admin_token(&config, "abcd"));

        config.auth.admin_token = String::new();
        assert!(!is_admin_token(&config, ""));
    }

    #[tokio::test]
    async fn test_ensure_admin_user_is_idempotent() {
        let db = init_in_memory().await.unwrap();
        let email = Some("admin@example.com".to_string());
        let password = Some("change-me-please".to_string());

        ensure_admin_user(&db, &email, &password).await.unwrap();
        ensure_admin_user(&db, &email, &password).await.unwrap();
        assert_eq!(User::count(&db).await.unwrap(), 1);

        let user = User::find_by_email(&db, "ADMIN@example.com").await.unwrap().unwrap();
        assert!(verify_password("change-me-please", &user.password_hash));
        assert_eq!(user.role, "admin");
    }

    #[tokio::test]
    async fn test_session_token_resolves_user() {
        let db = init_in_memory().await.unwrap();
        let config = Config::default();
        let user = User::create(&db, "staff@example.com", "x", "Staff", "staff")
            .await
            .unwrap();

        let token = generate_token();
        let future = (chrono::Utc::now() + chrono::Duration::hours(1))
            .to_rfc3339_opts(chrono::SecondsFormat::Micros, true);
        Session::create(&db, &user.id, &hash_token(&token), &future)
            .await
            .unwrap();

        let found = get_current_user(&db, &config, &token).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        // expired sessions don't count
        let stale = generate_token();
        let past = (chrono::Utc::now() - chrono::Duration::hours(1))
            .to_rfc3339_opts(chrono::SecondsFormat::Micros, true);
        Session::create(&db, &user.id, &hash_token(&stale), &past)
            .await
            .unwrap();
        assert!(get_current_user(&db, &config, &stale).await.unwrap().is_none());
    }
}
