use anyhow::Result;
use serde::Serialize;

use super::BookshelfClient;
use crate::application::routes::books::MessageResponse;
use crate::domain::books::{Book, BookWithOwner};
use crate::domain::ids::BookId;
use crate::domain::listing::BookPage;

pub struct BooksClient<'a> {
    client: &'a BookshelfClient,
}

#[derive(Debug, Serialize)]
pub struct NewBookPayload {
    pub title: String,
    pub caption: String,
    pub rating: i64,
    pub image: String,
}

impl<'a> BooksClient<'a> {
    pub fn new(client: &'a BookshelfClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, payload: &NewBookPayload) -> Result<Book> {
        let url = self.client.endpoint("api/books")?;
        let response = self
            .client
            .request(reqwest::Method::POST, url)
            .json(payload)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn list(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<BookPage<BookWithOwner>> {
        let mut url = self.client.endpoint("api/books")?;
        if let Some(page) = page {
            url.query_pairs_mut().append_pair("page", &page.to_string());
        }
        if let Some(limit) = limit {
            url.query_pairs_mut().append_pair("limit", &limit.to_string());
        }
        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn list_mine(&self) -> Result<Vec<Book>> {
        let url = self.client.endpoint("api/books/user")?;
        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn delete(&self, id: BookId) -> Result<String> {
        let url = self.client.endpoint(&format!("api/books/{id}"))?;
        let response = self
            .client
            .request(reqwest::Method::DELETE, url)
            .send()
            .await?;
        let body: MessageResponse = self.client.handle_response(response).await?;
        Ok(body.message)
    }
}
