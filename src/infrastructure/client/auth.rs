use anyhow::Result;
use serde::Serialize;

use super::BookshelfClient;
use crate::application::routes::auth::AuthResponse;

pub struct AuthClient<'a> {
    client: &'a BookshelfClient,
}

#[derive(Debug, Serialize)]
struct RegisterPayload<'p> {
    username: &'p str,
    email: &'p str,
    password: &'p str,
}

#[derive(Debug, Serialize)]
struct LoginPayload<'p> {
    email: &'p str,
    password: &'p str,
}

impl<'a> AuthClient<'a> {
    pub fn new(client: &'a BookshelfClient) -> Self {
        Self { client }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse> {
        let url = self.client.endpoint("api/auth/register")?;
        let response = self
            .client
            .request(reqwest::Method::POST, url)
            .json(&RegisterPayload {
                username,
                email,
                password,
            })
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let url = self.client.endpoint("api/auth/login")?;
        let response = self
            .client
            .request(reqwest::Method::POST, url)
            .json(&LoginPayload { email, password })
            .send()
            .await?;
        self.client.handle_response(response).await
    }
}
