use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{CreateUserRequest, CreatedUserResponse, UserListResponse},
    repo_types::User,
    services::create_account,
};
use crate::{
    auth::{claims::Role, extractors::AuthUser},
    error::AppError,
    extract::ApiJson,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users).post(create_user))
}

/// An authenticated caller whose stored account is an active admin.
///
/// The role claim inside the token is ignored here: the account is re-read
/// so that a demotion takes effect before the token expires.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;

        match state.users.find_by_id(identity.user_id).await? {
            Some(user) if user.is_admin() => Ok(AdminUser(user)),
            _ => {
                warn!(user_id = %identity.user_id, token_role = ?identity.role, "admin access denied");
                Err(AppError::Forbidden("Forbidden - Admin access required".into()))
            }
        }
    }
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<UserListResponse>, AppError> {
    let users = state.users.list().await?;
    Ok(Json(UserListResponse {
        count: users.len(),
        users,
    }))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.id))]
pub async fn create_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), AppError> {
    let role = match payload.role.as_deref().map(str::trim) {
        None | Some("") => Role::User,
        Some(raw) => Role::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("Unknown role: {raw}")))?,
    };

    let user = create_account(&state, &payload.name, &payload.email, &payload.password, role).await?;

    info!(user_id = %user.id, email = %user.email, role = ?user.role, "user created by admin");
    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            message: "User created successfully",
            user: (&user).into(),
        }),
    ))
}
