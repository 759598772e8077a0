use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::claims::{Identity, Role};

/// User account as exposed to the rest of the application. Carries no password data.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub avatar: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            email: self.email.clone(),
            role: self.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.is_active && self.role == Role::Admin
    }
}

/// A user together with its Argon2 hash. Only returned by lookups that ask for it
/// explicitly, and deliberately not `Serialize`.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Fields needed to create an account. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            avatar: u.avatar.clone(),
            role: u.role,
        }
    }
}

/// Row shape in the `users` table, without the hash.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub avatar: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct CredentialsRow {
    #[sqlx(flatten)]
    pub user: UserRow,
    pub password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&r.role)
            .ok_or_else(|| anyhow::anyhow!("unknown role {:?} for user {}", r.role, r.id))?;
        Ok(Self {
            id: r.id,
            name: r.name,
            email: r.email,
            role,
            is_active: r.is_active,
            avatar: r.avatar,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

impl TryFrom<CredentialsRow> for UserCredentials {
    type Error = anyhow::Error;

    fn try_from(r: CredentialsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user: User::try_from(r.user)?,
            password_hash: r.password_hash,
        })
    }
}
