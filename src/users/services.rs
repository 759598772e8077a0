use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use super::repo_types::{NewUser, User};
use crate::{
    auth::{claims::Role, password::hash_password},
    error::AppError,
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates input, hashes the password and stores a new active account.
pub async fn create_account(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<User, AppError> {
    let name = name.trim();
    let email = normalize_email(email);

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Name, email, and password are required".into(),
        ));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict(
            "User with this email already exists".into(),
        ));
    }

    let password_hash = hash_password(password)?;
    let user = state
        .users
        .create(NewUser {
            name: name.to_string(),
            email,
            password_hash,
            role,
        })
        .await?;
    Ok(user)
}
