use serde::{Deserialize, Serialize};

use crate::users::repo_types::PublicUser;

/// Request body for user registration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after register or login. The token itself travels in the cookie.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub success: bool,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
