use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{BookId, UserId};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub caption: String,
    pub rating: i64,
    #[serde(rename = "image")]
    pub image_url: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Only the owner fields a feed needs; the full user record is never joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: UserId,
    pub username: String,
    pub profile_image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookWithOwner {
    #[serde(flatten)]
    pub book: Book,
    pub user: OwnerSummary,
}

#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub caption: String,
    pub rating: i64,
    pub image_url: String,
    pub user_id: UserId,
    /// Override the creation timestamp. Defaults to now.
    pub created_at: Option<DateTime<Utc>>,
}

impl NewBook {
    pub fn new(
        user_id: UserId,
        title: String,
        caption: String,
        rating: i64,
        image_url: String,
    ) -> Self {
        Self {
            title,
            caption,
            rating,
            image_url,
            user_id,
            created_at: None,
        }
    }

    pub fn with_created_at(self, created_at: DateTime<Utc>) -> Self {
        Self {
            created_at: Some(created_at),
            ..self
        }
    }
}

pub fn is_valid_rating(rating: i64) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}
