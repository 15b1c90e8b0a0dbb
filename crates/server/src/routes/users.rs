//! Account endpoints: registration, login, token refresh.
//!
//! Login accepts either email or username, matched case-insensitively.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::auth::{self, TokenPair};
use crate::error::ApiResult;
use crate::routes::AppState;
use linkvault_core::{Error, db::User};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub conf_password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self { id: user.id, name: user.name, email: user.email, username: user.username }
    }
}

pub async fn register(
    State(state): State<Arc<AppState>>, Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    if body.name.trim().is_empty() || body.username.trim().is_empty() {
        return Err(Error::InvalidInput("name and username are required".into()).into());
    }
    if !body.email.contains('@') {
        return Err(Error::InvalidInput("Enter a valid email address.".into()).into());
    }
    if body.password.is_empty() {
        return Err(Error::InvalidInput("password must not be empty".into()).into());
    }
    if body.password != body.conf_password {
        return Err(Error::InvalidInput("Passwords do not match.".into()).into());
    }

    let hash = auth::hash_password(&body.password)?;
    let user = state
        .db
        .create_user(body.name.trim(), body.email.trim(), body.username.trim(), &hash)
        .await?;

    tracing::info!(user_id = user.id, "registered new user");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email or username, matched case-insensitively.
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>, Json(body): Json<LoginRequest>,
) -> ApiResult<Json<TokenPair>> {
    let user = state.db.find_user_by_login(body.username.trim()).await?;

    // Same rejection whether the account is missing or the password is
    // wrong, so login probing can't enumerate accounts.
    let user = user
        .filter(|u| auth::verify_password(&body.password, &u.password_hash))
        .ok_or_else(|| Error::Unauthorized("No active account found with the given credentials".into()))?;

    let pair = state.jwt.issue_pair(user.id)?;
    Ok(Json(pair))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

pub async fn refresh(
    State(state): State<Arc<AppState>>, Json(body): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let user_id = state.jwt.verify(&body.refresh, "refresh")?;
    let access = state.jwt.issue_access(user_id)?;
    Ok(Json(RefreshResponse { access }))
}
