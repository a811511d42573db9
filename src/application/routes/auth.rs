use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::errors::{ApiError, AppError};
use crate::application::routes::support::JsonBody;
use crate::application::services::Registration;
use crate::application::state::AppState;
use crate::domain::users::{User, UserView};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RegisterRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

/// Returned by both register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

fn issue_session(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let token = state.tokens.issue(user.id)?;
    Ok(AuthResponse {
        token,
        user: UserView::from(user),
    })
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let user = state
        .account_service
        .register(Registration {
            username: payload.username.unwrap_or_default(),
            email: payload.email.unwrap_or_default(),
            password: payload.password.unwrap_or_default(),
        })
        .await?;

    info!(user.id = %user.id, username = %user.username, "user registered");
    let response = issue_session(&state, user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state
        .account_service
        .authenticate(
            payload.email.as_deref().unwrap_or_default(),
            payload.password.as_deref().unwrap_or_default(),
        )
        .await?;

    info!(user.id = %user.id, "user logged in");
    Ok(Json(issue_session(&state, user)?))
}
