use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::{ApiError, AppError};
use crate::application::routes::support::{JsonBody, ListQuery, lenient_integer};
use crate::application::services::BookSubmission;
use crate::application::state::AppState;
use crate::domain::books::{Book, BookWithOwner};
use crate::domain::ids::BookId;
use crate::domain::listing::BookPage;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NewBookRequest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default, deserialize_with = "lenient_integer")]
    rating: Option<i64>,
    #[serde(default)]
    image: Option<String>,
}

impl From<NewBookRequest> for BookSubmission {
    fn from(request: NewBookRequest) -> Self {
        Self {
            title: request.title,
            caption: request.caption,
            rating: request.rating,
            image: request.image,
        }
    }
}

/// Confirmation body for operations that return no resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[tracing::instrument(skip(state, auth_user, payload))]
pub(crate) async fn create_book(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    JsonBody(payload): JsonBody<NewBookRequest>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let book = state
        .book_service
        .create(auth_user.user().id, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(book)))
}

#[tracing::instrument(skip(state, _auth_user))]
pub(crate) async fn list_books(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<BookPage<BookWithOwner>>, ApiError> {
    let page = state.book_service.list_page(query.into_request()).await?;
    Ok(Json(BookPage::from(page)))
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn list_user_books(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books = state
        .book_service
        .list_by_owner(auth_user.user().id)
        .await?;
    Ok(Json(books))
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn delete_book(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    // An id that cannot name a row is reported the same as a missing one.
    let id = raw_id
        .parse::<i64>()
        .map(BookId::new)
        .map_err(|_| AppError::not_found("Book not found"))?;
    state.book_service.delete(id, auth_user.user().id).await?;
    Ok(Json(MessageResponse {
        message: "Book deleted successfully".to_string(),
    }))
}
