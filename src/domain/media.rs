use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media request failed: {0}")]
    Request(String),
    #[error("media service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected media response: {0}")]
    Response(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Durable HTTPS URL to store on the book.
    pub url: String,
    pub public_id: String,
}

/// An image accepted for upload: either an inline `data:image/*;base64,` URI
/// or a remote `http(s)` URL the media service fetches itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    DataUri(String),
    Remote(url::Url),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidImage {
    #[error("image is required")]
    Missing,
    #[error("image must be an image data URI or an http(s) URL")]
    UnsupportedFormat,
    #[error("image data is not valid base64")]
    BadEncoding,
}

impl ImageSource {
    pub fn parse(raw: &str) -> Result<Self, InvalidImage> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(InvalidImage::Missing);
        }

        if let Some(rest) = raw.strip_prefix("data:") {
            let (meta, payload) = rest.split_once(',').ok_or(InvalidImage::UnsupportedFormat)?;
            let Some(mime) = meta.strip_suffix(";base64") else {
                return Err(InvalidImage::UnsupportedFormat);
            };
            if !mime.starts_with("image/") {
                return Err(InvalidImage::UnsupportedFormat);
            }
            if payload.is_empty() || STANDARD.decode(payload).is_err() {
                return Err(InvalidImage::BadEncoding);
            }
            return Ok(Self::DataUri(raw.to_string()));
        }

        let parsed = url::Url::parse(raw).map_err(|_| InvalidImage::UnsupportedFormat)?;
        match parsed.scheme() {
            "http" | "https" if parsed.host().is_some() => Ok(Self::Remote(parsed)),
            _ => Err(InvalidImage::UnsupportedFormat),
        }
    }

    /// Value sent as the upload `file` parameter.
    pub fn as_upload_value(&self) -> &str {
        match self {
            Self::DataUri(uri) => uri,
            Self::Remote(url) => url.as_str(),
        }
    }
}

/// External image host. Book records only ever hold the URL it returns.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, image: &ImageSource) -> Result<UploadedImage, MediaError>;
    async fn delete(&self, public_id: &str) -> Result<(), MediaError>;
    /// Whether `url` points at an asset this store can delete.
    fn owns(&self, url: &str) -> bool;
}

/// Derives the asset identifier from a delivery URL: the last path segment
/// with its extension removed.
///
/// `https://res.cloudinary.com/demo/image/upload/v123/cover.png` → `cover`
pub fn public_id_from_url(image_url: &str) -> Option<String> {
    let path = match url::Url::parse(image_url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => image_url.to_string(),
    };
    let segment = path.rsplit('/').next()?;
    let id = segment.split('.').next()?;
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
