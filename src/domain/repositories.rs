use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::books::{Book, BookWithOwner, NewBook};
use crate::domain::ids::{BookId, UserId};
use crate::domain::listing::{Page, PageRequest};
use crate::domain::users::{NewUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email or username is already taken.
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn get(&self, id: UserId) -> Result<User, RepositoryError>;
    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError>;
    async fn get_by_username(&self, username: &str) -> Result<User, RepositoryError>;
    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError>;
    async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn insert(&self, book: NewBook) -> Result<Book, RepositoryError>;
    async fn get(&self, id: BookId) -> Result<Book, RepositoryError>;
    /// Newest first, joined with the owner's username and avatar.
    async fn list(&self, request: PageRequest) -> Result<Page<BookWithOwner>, RepositoryError>;
    /// Every book owned by `user_id`, newest first.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Book>, RepositoryError>;
    async fn delete(&self, id: BookId) -> Result<(), RepositoryError>;
}
