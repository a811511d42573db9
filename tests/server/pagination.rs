use bookshelf::domain::books::{BookWithOwner, NewBook};
use bookshelf::domain::ids::UserId;
use bookshelf::domain::listing::BookPage;
use chrono::{Duration, TimeZone, Utc};
use reqwest::{Client, StatusCode};

use crate::helpers::{HOSTED_IMAGE_URL, TestApp, register_user, spawn_app};

/// Inserts `count` books straight into the store, one minute apart, so
/// "Book 1" is the oldest.
async fn seed_books(app: &TestApp, owner: UserId, count: usize) {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    for n in 1..=count {
        let offset = Duration::minutes(i64::try_from(n).expect("small count"));
        let book = NewBook::new(
            owner,
            format!("Book {n}"),
            "caption".to_string(),
            3,
            HOSTED_IMAGE_URL.to_string(),
        )
        .with_created_at(start + offset);
        app.book_repo.insert(book).await.expect("Failed to seed book");
    }
}

async fn fetch_page(app: &TestApp, token: &str, query: &str) -> BookPage<BookWithOwner> {
    let response = Client::new()
        .get(format!("{}{query}", app.api_url("/books")))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.expect("Failed to parse page")
}

fn titles(page: &BookPage<BookWithOwner>) -> Vec<&str> {
    page.books.iter().map(|b| b.book.title.as_str()).collect()
}

#[tokio::test]
async fn last_partial_page_reports_totals() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;
    seed_books(&app, session.user.id, 12).await;

    let page = fetch_page(&app, &session.token, "?page=3&limit=5").await;

    assert_eq!(page.current_page, 3);
    assert_eq!(page.total_books, 12);
    assert_eq!(page.total_pages, 3);
    assert_eq!(titles(&page), vec!["Book 2", "Book 1"]);
}

#[tokio::test]
async fn pages_are_newest_first_without_overlap() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;
    seed_books(&app, session.user.id, 7).await;

    let first = fetch_page(&app, &session.token, "?page=1&limit=3").await;
    let second = fetch_page(&app, &session.token, "?page=2&limit=3").await;
    let third = fetch_page(&app, &session.token, "?page=3&limit=3").await;

    assert_eq!(titles(&first), vec!["Book 7", "Book 6", "Book 5"]);
    assert_eq!(titles(&second), vec!["Book 4", "Book 3", "Book 2"]);
    assert_eq!(titles(&third), vec!["Book 1"]);
}

#[tokio::test]
async fn defaults_apply_without_query() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;
    seed_books(&app, session.user.id, 6).await;

    let page = fetch_page(&app, &session.token, "").await;

    assert_eq!(page.current_page, 1);
    assert_eq!(page.books.len(), 5);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test]
async fn invalid_query_values_fall_back_to_defaults() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;
    seed_books(&app, session.user.id, 6).await;

    let page = fetch_page(&app, &session.token, "?page=abc&limit=-4").await;

    assert_eq!(page.current_page, 1);
    assert_eq!(page.books.len(), 5);
}

#[tokio::test]
async fn large_limit_returns_every_book_on_one_page() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;
    seed_books(&app, session.user.id, 60).await;

    let page = fetch_page(&app, &session.token, "?page=1&limit=100").await;
    assert_eq!(page.books.len(), 60);
    assert_eq!(page.total_books, 60);
    assert_eq!(page.total_pages, 1);

    let page = fetch_page(&app, &session.token, "?page=1&limit=55").await;
    assert_eq!(page.books.len(), 55);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;
    seed_books(&app, session.user.id, 4).await;

    let page = fetch_page(&app, &session.token, "?page=9&limit=5").await;

    assert!(page.books.is_empty());
    assert_eq!(page.current_page, 9);
    assert_eq!(page.total_books, 4);
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn empty_feed_has_zero_pages() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;

    let page = fetch_page(&app, &session.token, "").await;

    assert!(page.books.is_empty());
    assert_eq!(page.total_books, 0);
    assert_eq!(page.total_pages, 0);
}
