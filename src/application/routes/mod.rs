pub mod auth;
pub mod books;
pub mod support;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Request};
use axum::routing::{delete, get, post};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

use crate::application::state::AppState;

/// 10 MB request body limit, enough for inline data URI images.
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub fn app_router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_router())
        .nest("/api/books", book_router())
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(BookshelfMakeSpan)
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
                .layer(CorsLayer::permissive())
                .layer(SetResponseHeaderLayer::overriding(
                    axum::http::header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(CompressionLayer::new().gzip(true)),
        )
        .with_state(state)
}

fn auth_router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

fn book_router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(books::list_books).post(books::create_book))
        .route("/user", get(books::list_user_books))
        .route("/{id}", delete(books::delete_book))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct BookshelfMakeSpan;

impl<B> MakeSpan<B> for BookshelfMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
            user.id = tracing::field::Empty,
        )
    }
}
