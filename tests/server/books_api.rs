use bookshelf::domain::books::Book;
use bookshelf::domain::ids::BookId;
use axum::body::Body;
use axum::http::Request;
use reqwest::{Client, StatusCode};
use tower::ServiceExt;
use serde_json::{Value, json};

use crate::helpers::{
    HOSTED_IMAGE_URL, PNG_DATA_URI, build_router, create_book, delete_book, message_of,
    post_book, register_user, spawn_app,
};

#[tokio::test]
async fn create_book_stores_hosted_image_url() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;

    let response = post_book(
        &app,
        &session.token,
        &json!({
            "title": "Dune",
            "caption": "Spice must flow",
            "rating": 5,
            "image": PNG_DATA_URI,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["title"], "Dune");
    assert_eq!(body["caption"], "Spice must flow");
    assert_eq!(body["rating"], 5);
    assert_eq!(body["image"], HOSTED_IMAGE_URL);
    assert_eq!(body["userId"], json!(session.user.id));
    assert!(body["createdAt"].is_string());
    assert!(body["updatedAt"].is_string());

    let id: BookId = serde_json::from_value(body["id"].clone()).expect("numeric id");
    let stored = app.book_repo.get(id).await.expect("book persisted");
    assert_eq!(stored.image_url, HOSTED_IMAGE_URL);
}

#[tokio::test]
async fn create_book_accepts_numeric_string_rating() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;

    let response = post_book(
        &app,
        &session.token,
        &json!({
            "title": "Dune",
            "caption": "Spice must flow",
            "rating": "3",
            "image": "https://example.com/dune.jpg",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let book: Book = response.json().await.expect("Failed to parse body");
    assert_eq!(book.rating, 3);
}

#[tokio::test]
async fn create_book_requires_every_field() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;

    let complete = json!({
        "title": "Dune",
        "caption": "Spice must flow",
        "rating": 5,
        "image": PNG_DATA_URI,
    });

    for missing in ["title", "caption", "rating", "image"] {
        let mut payload = complete.clone();
        payload
            .as_object_mut()
            .expect("payload is an object")
            .remove(missing);

        let response = post_book(&app, &session.token, &payload).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "missing {missing} should be rejected"
        );
        assert_eq!(message_of(response).await, "Please provide all fields");
    }

    let mut blank = complete.clone();
    blank["title"] = json!("   ");
    let response = post_book(&app, &session.token, &blank).await;
    assert_eq!(message_of(response).await, "Please provide all fields");

    let mut zero = complete;
    zero["rating"] = json!(0);
    let response = post_book(&app, &session.token, &zero).await;
    assert_eq!(message_of(response).await, "Please provide all fields");

    let media_calls = app.mock_server.received_requests().await.unwrap_or_default();
    assert!(media_calls.is_empty());
}

#[tokio::test]
async fn create_book_rejects_out_of_range_rating() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;

    for rating in [6, -1] {
        let response = post_book(
            &app,
            &session.token,
            &json!({
                "title": "Dune",
                "caption": "Spice must flow",
                "rating": rating,
                "image": PNG_DATA_URI,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(message_of(response).await, "Rating must be between 1 and 5");
    }
}

#[tokio::test]
async fn create_book_rejects_unusable_image() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;

    let images = [
        "ftp://example.com/a.png",
        "data:text/plain;base64,aGVsbG8=",
        "data:image/png;base64,@@@",
    ];
    for image in images {
        let response = post_book(
            &app,
            &session.token,
            &json!({
                "title": "Dune",
                "caption": "Spice must flow",
                "rating": 4,
                "image": image,
            }),
        )
        .await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "{image} should be rejected"
        );
    }

    let media_calls = app.mock_server.received_requests().await.unwrap_or_default();
    assert!(media_calls.is_empty());
}

#[tokio::test]
async fn user_books_lists_only_own_books_newest_first() {
    let app = spawn_app().await;
    let alice = register_user(&app, "alice").await;
    let bob = register_user(&app, "bob").await;

    let first = create_book(&app, &alice.token, "First").await;
    create_book(&app, &bob.token, "Not Alice's").await;
    let second = create_book(&app, &alice.token, "Second").await;

    let response = Client::new()
        .get(app.api_url("/books/user"))
        .bearer_auth(&alice.token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let books: Vec<Book> = response.json().await.expect("Failed to parse body");
    let ids: Vec<_> = books.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert!(books.iter().all(|b| b.user_id == alice.user.id));
}

#[tokio::test]
async fn owner_can_delete_book() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;
    let book = create_book(&app, &session.token, "Dune").await;

    let response = delete_book(&app, &session.token, &book.id.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(message_of(response).await, "Book deleted successfully");

    assert!(app.book_repo.get(book.id).await.is_err());
}

#[tokio::test]
async fn non_owner_cannot_delete_book() {
    let app = spawn_app().await;
    let owner = register_user(&app, "owner").await;
    let intruder = register_user(&app, "intruder").await;
    let book = create_book(&app, &owner.token, "Dune").await;

    let response = delete_book(&app, &intruder.token, &book.id.to_string()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        message_of(response).await,
        "You can only delete your own books"
    );

    let stored = app.book_repo.get(book.id).await.expect("book still exists");
    assert_eq!(stored.user_id, owner.user.id);
    assert_eq!(stored.title, book.title);
}

#[tokio::test]
async fn deleting_missing_book_returns_not_found() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;

    for id in ["4242", "not-an-id"] {
        let response = delete_book(&app, &session.token, id).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(message_of(response).await, "Book not found");
    }
}

#[tokio::test]
async fn list_items_carry_owner_summary() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;
    create_book(&app, &session.token, "Dune").await;

    let response = Client::new()
        .get(app.api_url("/books"))
        .bearer_auth(&session.token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse body");
    let user = &body["books"][0]["user"];
    assert_eq!(user["id"], json!(session.user.id));
    assert_eq!(user["username"], "abc");
    assert_eq!(user["profileImage"], json!(session.user.profile_image));
    assert!(user.get("email").is_none());
    assert!(user.get("password").is_none());
}

#[tokio::test]
async fn image_payloads_above_the_default_json_limit_are_accepted() {
    let app = spawn_app().await;
    let session = register_user(&app, "abc").await;
    let image = format!("data:image/png;base64,{}", "A".repeat(3 * 1024 * 1024));

    let response = post_book(
        &app,
        &session.token,
        &json!({
            "title": "Dune",
            "caption": "Spice must flow",
            "rating": 5,
            "image": image,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn bodies_over_ten_megabytes_are_rejected() {
    let app = build_router().await;
    let body = vec![b'a'; 11 * 1024 * 1024];

    let request = Request::builder()
        .method("POST")
        .uri("/api/books")
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body))
        .expect("valid request");

    let response = app.oneshot(request).await.expect("router is infallible");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
