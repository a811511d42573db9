use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::media::{ImageSource, MediaError, MediaStore, UploadedImage};

pub const CLOUDINARY_API_URL: &str = "https://api.cloudinary.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "bookshelf/1.0";

#[derive(Clone)]
pub struct CloudinaryConfig {
    pub api_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("api_url", &self.api_url)
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

/// Image hosting on a Cloudinary-compatible upload API using signed requests.
pub struct CloudinaryMediaStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryMediaStore {
    pub fn new(client: reqwest::Client, config: CloudinaryConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{action}",
            self.config.api_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Signed form body: the caller's parameters plus `api_key`, `timestamp`,
    /// and the signature over everything except `file` and `api_key`.
    fn signed_form(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        params.push(("timestamp", Utc::now().timestamp().to_string()));
        let signature = sign_params(&params, &self.config.api_secret);
        params.push(("api_key", self.config.api_key.clone()));
        params.push(("signature", signature));
        params.push(("signature_algorithm", "sha256".to_string()));
        params
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        form: &[(&'static str, String)],
    ) -> Result<T, MediaError> {
        let response = self
            .client
            .post(self.endpoint(action))
            .header("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .form(form)
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "(unreadable body)".to_string());
            return Err(MediaError::Status { status, body });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MediaError::Response(e.to_string()))
    }
}

/// Parameters sorted by name, joined as `k=v&k=v`, with the secret appended,
/// hashed with SHA-256. `file` never takes part in the signature.
fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut signed: Vec<_> = params
        .iter()
        .filter(|(key, _)| *key != "file")
        .collect();
    signed.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = signed
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    hex::encode(Sha256::digest(format!("{to_sign}{api_secret}").as_bytes()))
}

#[async_trait]
impl MediaStore for CloudinaryMediaStore {
    async fn upload(&self, image: &ImageSource) -> Result<UploadedImage, MediaError> {
        let form = self.signed_form(vec![("file", image.as_upload_value().to_string())]);
        let uploaded: UploadResponse = self.post_form("upload", &form).await?;
        debug!(public_id = %uploaded.public_id, "image uploaded");

        Ok(UploadedImage {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let form = self.signed_form(vec![("public_id", public_id.to_string())]);
        let destroyed: DestroyResponse = self.post_form("destroy", &form).await?;

        match destroyed.result.as_str() {
            "ok" => Ok(()),
            other => Err(MediaError::Response(format!(
                "destroy of {public_id} returned {other}"
            ))),
        }
    }

    fn owns(&self, url: &str) -> bool {
        url.contains("cloudinary")
    }
}
