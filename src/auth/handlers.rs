use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::Duration;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        claims::Role,
        dto::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest},
        extractors::{AuthUser, MaybeAuthUser, TOKEN_COOKIE},
        jwt::JwtKeys,
        password::verify_password,
    },
    error::AppError,
    extract::ApiJson,
    state::AppState,
    users::{
        repo_types::{PublicUser, User},
        services::{create_account, normalize_email},
    },
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, cookies, payload))]
pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let user = create_account(
        &state,
        &payload.name,
        &payload.email,
        &payload.password,
        Role::User,
    )
    .await?;

    set_token_cookie(&state, &cookies, &user)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful",
            success: true,
            user: PublicUser::from(&user),
        }),
    ))
}

#[instrument(skip(state, cookies, payload))]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = normalize_email(&payload.email);
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".into(),
        ));
    }

    let Some(creds) = state.users.find_credentials_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Unauthorized("Invalid email or password".into()));
    };

    // Deactivation is only revealed to a caller who knows the password.
    if !verify_password(&payload.password, &creds.password_hash)? {
        warn!(user_id = %creds.user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid email or password".into()));
    }

    if !creds.user.is_active {
        warn!(user_id = %creds.user.id, "login on deactivated account");
        return Err(AppError::Unauthorized("Account is deactivated".into()));
    }

    let user = creds.user;
    set_token_cookie(&state, &cookies, &user)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        message: "Login successful",
        success: true,
        user: PublicUser::from(&user),
    }))
}

/// Drops the cookie on the client. Tokens already handed out stay valid until expiry.
#[instrument(skip(cookies, caller))]
pub async fn logout(MaybeAuthUser(caller): MaybeAuthUser, cookies: Cookies) -> Json<MessageResponse> {
    cookies.remove(Cookie::build((TOKEN_COOKIE, "")).path("/").into());
    match caller {
        Some(identity) => info!(user_id = %identity.user_id, "user logged out"),
        None => info!("logout without a valid token"),
    }
    Json(MessageResponse {
        message: "Logged out",
    })
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(AppError::unauthorized)?;
    Ok(Json(PublicUser::from(&user)))
}

fn set_token_cookie(state: &AppState, cookies: &Cookies, user: &User) -> Result<(), AppError> {
    let keys = &state.jwt;
    let token = keys.issue(&user.identity())?;
    cookies.add(token_cookie(keys, token, state.config.cookie_secure));
    Ok(())
}

fn token_cookie(keys: &JwtKeys, token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(keys.ttl.as_secs() as i64))
        .build()
}
