use lazy_static::lazy_static;
use regex::Regex;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::auth::{
    dto::{LoginRequest, SignupRequest},
    jwt::TokenKeys,
    password::{hash_password_blocking, verify_password_blocking},
    repo_types::{NewUser, User},
};
use crate::error::AppError;
use crate::storage::UserStore;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

/// A real argon2 hash with the default parameters. Only the cost of checking it matters.
async fn dummy_hash() -> anyhow::Result<String> {
    DUMMY_HASH
        .get_or_try_init(|| hash_password_blocking("finance-tracker-dummy".to_string()))
        .await
        .cloned()
}

pub async fn signup(users: &dyn UserStore, payload: SignupRequest) -> Result<User, AppError> {
    let email = normalize_email(&payload.email);
    let name = payload.name.trim().to_string();

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::InvalidInput("Invalid email".into()));
    }
    if name.is_empty() {
        return Err(AppError::InvalidInput("Name is required".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::InvalidInput("Password is required".into()));
    }

    if users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password_blocking(payload.password).await?;
    // The store enforces uniqueness too, so a racing signup still ends in Conflict.
    let user = users
        .insert(NewUser {
            name,
            email,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Checks the credentials and returns a signed access token.
pub async fn login(
    users: &dyn UserStore,
    keys: &TokenKeys,
    payload: LoginRequest,
) -> Result<String, AppError> {
    let email = normalize_email(&payload.email);

    let Some(user) = users.find_by_email(&email).await? else {
        // Unknown emails pay the same argon2 cost as a wrong password.
        verify_password_blocking(payload.password, dummy_hash().await?).await?;
        warn!(email = %email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password_blocking(payload.password, user.password_hash.clone()).await? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.issue(&user.email)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(token)
}
