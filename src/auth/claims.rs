use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role. Stored as lowercase text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,     // user ID
    pub email: String, // email at issue time
    pub role: Role,    // role at issue time, a hint only
    pub iat: usize,    // issued at (unix timestamp)
    pub exp: usize,    // expires at (unix timestamp)
    pub iss: String,   // issuer
    pub aud: String,   // audience
}

/// Who is calling, as asserted by a verified token.
///
/// `role` reflects the account at the moment the token was issued. Anything
/// privileged must re-read the role from storage instead of trusting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for Identity {
    fn from(c: Claims) -> Self {
        Self {
            user_id: c.sub,
            email: c.email,
            role: c.role,
        }
    }
}
