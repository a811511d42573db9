use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::UserId;

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/9.x/adventurer/svg";

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// A stored account. `password_hash` is a bcrypt hash, never the plaintext.
/// Responses use [`UserView`], which has no password field.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile_image: String,
}

/// Public projection of a user returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub profile_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            profile_image: user.profile_image,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl NewUser {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let profile_image = default_avatar_url(&username);
        Self {
            username,
            email,
            password_hash,
            profile_image,
        }
    }
}

/// Deterministic avatar for a username.
pub fn default_avatar_url(username: &str) -> String {
    let seed: String = url::form_urlencoded::byte_serialize(username.as_bytes()).collect();
    format!("{AVATAR_BASE_URL}?seed={seed}")
}
