use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use tracing::{Span, debug, warn};

use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::RepositoryError;
use crate::domain::users::User;

/// The caller resolved from a valid bearer token. Handlers take this as an
/// argument to require authentication.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn user(&self) -> &User {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let token = bearer_token(parts)?;

        let user_id = state.tokens.verify(token).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            ApiError::from(AppError::from(err))
        })?;

        let user = state.user_repo.get(user_id).await.map_err(|err| match err {
            RepositoryError::NotFound => {
                warn!(user.id = %user_id, "token refers to a user that no longer exists");
                ApiError::from(AppError::unauthorized("Token is not valid"))
            }
            other => ApiError::from(other),
        })?;

        Span::current().record("user.id", tracing::field::display(&user.id));
        let auth = AuthenticatedUser(user);
        parts.extensions.insert(auth.clone());
        Ok(auth)
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let no_token = || ApiError::from(AppError::unauthorized("No authentication token, access denied"));

    let header_value = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(no_token)?;

    let value = header_value.to_str().map_err(|err| {
        warn!(error = %err, "authorization header contains invalid characters");
        no_token()
    })?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(no_token)
}
