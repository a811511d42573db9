use reqwest::{Client, StatusCode};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::{
    DESTROY_PATH, PNG_DATA_URI, UPLOAD_PATH, create_book, delete_book, message_of,
    mount_upload_ok, post_book, register_user, spawn_app_with_media,
};

#[tokio::test]
async fn upload_is_signed_and_sends_the_image() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(body_string_contains("api_key=test-key"))
        .and(body_string_contains("signature="))
        .and(body_string_contains("signature_algorithm=sha256"))
        .and(body_string_contains("timestamp="))
        .and(body_string_contains("file=data%3Aimage%2Fpng%3Bbase64"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/signed.png",
            "public_id": "signed",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    let app = spawn_app_with_media(mock_server).await;
    let session = register_user(&app, "abc").await;

    let book = create_book(&app, &session.token, "Dune").await;

    assert_eq!(
        book.image_url,
        "https://res.cloudinary.com/demo/image/upload/v1/signed.png"
    );
}

#[tokio::test]
async fn failed_upload_stores_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&mock_server)
        .await;
    let app = spawn_app_with_media(mock_server).await;
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

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(message_of(response).await, "Internal server error");

    let books = app
        .book_repo
        .list_by_user(session.user.id)
        .await
        .expect("Failed to list books");
    assert!(books.is_empty());
}

#[tokio::test]
async fn delete_removes_hosted_image_by_public_id() {
    let mock_server = MockServer::start().await;
    mount_upload_ok(&mock_server).await;
    Mock::given(method("POST"))
        .and(path(DESTROY_PATH))
        .and(body_string_contains("public_id=bookshelf-cover"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
        .expect(1)
        .mount(&mock_server)
        .await;
    let app = spawn_app_with_media(mock_server).await;
    let session = register_user(&app, "abc").await;
    let book = create_book(&app, &session.token, "Dune").await;

    let response = delete_book(&app, &session.token, &book.id.to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn delete_succeeds_when_image_removal_fails() {
    let mock_server = MockServer::start().await;
    mount_upload_ok(&mock_server).await;
    Mock::given(method("POST"))
        .and(path(DESTROY_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    let app = spawn_app_with_media(mock_server).await;
    let session = register_user(&app, "abc").await;
    let book = create_book(&app, &session.token, "Dune").await;

    let response = delete_book(&app, &session.token, &book.id.to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(message_of(response).await, "Book deleted successfully");
    assert!(app.book_repo.get(book.id).await.is_err());
}

#[tokio::test]
async fn foreign_image_urls_are_never_sent_for_deletion() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "secure_url": "https://images.example.com/covers/dune.png",
            "public_id": "dune",
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(DESTROY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
        .expect(0)
        .mount(&mock_server)
        .await;
    let app = spawn_app_with_media(mock_server).await;
    let session = register_user(&app, "abc").await;
    let book = create_book(&app, &session.token, "Dune").await;

    let response = Client::new()
        .delete(app.api_url(&format!("/books/{}", book.id)))
        .bearer_auth(&session.token)
        .send()
        .await
        .expect("Failed to send delete request");

    assert_eq!(response.status(), StatusCode::OK);
}
