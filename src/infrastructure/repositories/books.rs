use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as};

use super::map_insert_error;
use crate::domain::RepositoryError;
use crate::domain::books::{Book, BookWithOwner, NewBook, OwnerSummary};
use crate::domain::ids::{BookId, UserId};
use crate::domain::listing::{Page, PageRequest};
use crate::domain::repositories::BookRepository;
use crate::infrastructure::database::DatabasePool;

const BOOK_COLUMNS: &str = "id, title, caption, rating, image_url, user_id, created_at, updated_at";

#[derive(Clone)]
pub struct SqlBookRepository {
    pool: DatabasePool,
}

impl SqlBookRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_book(record: BookRecord) -> Book {
        Book {
            id: BookId::from(record.id),
            title: record.title,
            caption: record.caption,
            rating: record.rating,
            image_url: record.image_url,
            user_id: UserId::from(record.user_id),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    fn into_book_with_owner(record: BookWithOwnerRecord) -> BookWithOwner {
        BookWithOwner {
            book: Book {
                id: BookId::from(record.id),
                title: record.title,
                caption: record.caption,
                rating: record.rating,
                image_url: record.image_url,
                user_id: UserId::from(record.user_id),
                created_at: record.created_at,
                updated_at: record.updated_at,
            },
            user: OwnerSummary {
                id: UserId::from(record.user_id),
                username: record.owner_username,
                profile_image: record.owner_profile_image,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookRecord {
    id: i64,
    title: String,
    caption: String,
    rating: i64,
    image_url: String,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct BookWithOwnerRecord {
    id: i64,
    title: String,
    caption: String,
    rating: i64,
    image_url: String,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_username: String,
    owner_profile_image: String,
}

#[async_trait]
impl BookRepository for SqlBookRepository {
    async fn insert(&self, new_book: NewBook) -> Result<Book, RepositoryError> {
        let now = Utc::now();
        let created_at = new_book.created_at.unwrap_or(now);
        let sql = format!(
            "INSERT INTO books (title, caption, rating, image_url, user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {BOOK_COLUMNS}"
        );

        let record = query_as::<_, BookRecord>(&sql)
            .bind(&new_book.title)
            .bind(&new_book.caption)
            .bind(new_book.rating)
            .bind(&new_book.image_url)
            .bind(i64::from(new_book.user_id))
            .bind(created_at)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)?;

        Ok(Self::into_book(record))
    }

    async fn get(&self, id: BookId) -> Result<Book, RepositoryError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?");
        let record = query_as::<_, BookRecord>(&sql)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        Ok(Self::into_book(record))
    }

    async fn list(&self, request: PageRequest) -> Result<Page<BookWithOwner>, RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        let records = query_as::<_, BookWithOwnerRecord>(
            r"SELECT b.id, b.title, b.caption, b.rating, b.image_url, b.user_id, b.created_at, b.updated_at,
                     u.username AS owner_username, u.profile_image AS owner_profile_image
              FROM books b
              JOIN users u ON u.id = b.user_id
              ORDER BY b.created_at DESC, b.id DESC
              LIMIT ? OFFSET ?",
        )
        .bind(request.limit() as i64)
        .bind(request.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        let items = records
            .into_iter()
            .map(Self::into_book_with_owner)
            .collect();

        Ok(Page::new(items, request, total.max(0) as u64))
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Book>, RepositoryError> {
        let sql = format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE user_id = ? ORDER BY created_at DESC, id DESC"
        );
        let records = query_as::<_, BookRecord>(&sql)
            .bind(i64::from(user_id))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(records.into_iter().map(Self::into_book).collect())
    }

    async fn delete(&self, id: BookId) -> Result<(), RepositoryError> {
        let result = query("DELETE FROM books WHERE id = ?")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
