use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::query_as;

use super::map_insert_error;
use crate::domain::RepositoryError;
use crate::domain::ids::UserId;
use crate::domain::repositories::UserRepository;
use crate::domain::users::{NewUser, User};
use crate::infrastructure::database::DatabasePool;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, profile_image, created_at, updated_at";

#[derive(Clone)]
pub struct SqlUserRepository {
    pool: DatabasePool,
}

impl SqlUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_domain(record: UserRecord) -> User {
        User {
            id: UserId::new(record.id),
            username: record.username,
            email: record.email,
            password_hash: record.password_hash,
            profile_image: record.profile_image,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<User, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?");
        let record = query_as::<_, UserRecord>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        Ok(Self::into_domain(record))
    }

    async fn exists_by(&self, column: &str, value: &str) -> Result<bool, RepositoryError> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM users WHERE {column} = ?)");
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(exists)
    }
}

#[derive(sqlx::FromRow)]
struct UserRecord {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    profile_image: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, profile_image, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {USER_COLUMNS}"
        );

        let record = query_as::<_, UserRecord>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.profile_image)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)?;

        Ok(Self::into_domain(record))
    }

    async fn get(&self, id: UserId) -> Result<User, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let record = query_as::<_, UserRecord>(&sql)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        Ok(Self::into_domain(record))
    }

    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        self.fetch_one_by("email", email).await
    }

    async fn get_by_username(&self, username: &str) -> Result<User, RepositoryError> {
        self.fetch_one_by("username", username).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        self.exists_by("email", email).await
    }

    async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError> {
        self.exists_by("username", username).await
    }
}
