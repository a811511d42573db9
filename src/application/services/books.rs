use std::sync::Arc;

use tracing::{info, warn};

use crate::application::errors::AppError;
use crate::domain::RepositoryError;
use crate::domain::books::{Book, BookWithOwner, NewBook, is_valid_rating};
use crate::domain::ids::{BookId, UserId};
use crate::domain::listing::{Page, PageRequest};
use crate::domain::media::{ImageSource, MediaStore, public_id_from_url};
use crate::domain::repositories::BookRepository;

/// Raw fields of a new book as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct BookSubmission {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub rating: Option<i64>,
    pub image: Option<String>,
}

#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn BookRepository>,
    media: Arc<dyn MediaStore>,
}

impl BookService {
    pub fn new(books: Arc<dyn BookRepository>, media: Arc<dyn MediaStore>) -> Self {
        Self { books, media }
    }

    /// Uploads the image, then stores the book pointing at the hosted URL.
    pub async fn create(&self, owner: UserId, submission: BookSubmission) -> Result<Book, AppError> {
        let title = non_blank(submission.title);
        let caption = non_blank(submission.caption);
        let image = non_blank(submission.image);
        let rating = submission.rating.filter(|r| *r != 0);

        let (Some(title), Some(caption), Some(rating), Some(image)) =
            (title, caption, rating, image)
        else {
            return Err(AppError::validation("Please provide all fields"));
        };

        if !is_valid_rating(rating) {
            return Err(AppError::validation("Rating must be between 1 and 5"));
        }

        let source = ImageSource::parse(&image)?;
        let uploaded = self.media.upload(&source).await?;

        let book = self
            .books
            .insert(NewBook::new(owner, title, caption, rating, uploaded.url))
            .await?;

        info!(book_id = %book.id, user.id = %owner, "book created");
        Ok(book)
    }

    pub async fn list_page(&self, request: PageRequest) -> Result<Page<BookWithOwner>, AppError> {
        Ok(self.books.list(request).await?)
    }

    pub async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Book>, AppError> {
        Ok(self.books.list_by_user(owner).await?)
    }

    /// Only the owner may delete. Removing the hosted image is best effort:
    /// a failure there is logged and the record is deleted regardless.
    pub async fn delete(&self, id: BookId, requester: UserId) -> Result<(), AppError> {
        let book = self.books.get(id).await.map_err(book_not_found)?;

        if book.user_id != requester {
            return Err(AppError::forbidden("You can only delete your own books"));
        }

        self.delete_remote_image(&book).await;

        self.books.delete(id).await.map_err(book_not_found)?;
        info!(book_id = %id, user.id = %requester, "book deleted");
        Ok(())
    }

    async fn delete_remote_image(&self, book: &Book) {
        if !self.media.owns(&book.image_url) {
            return;
        }
        let Some(public_id) = public_id_from_url(&book.image_url) else {
            warn!(book_id = %book.id, url = %book.image_url, "could not derive image id");
            return;
        };
        if let Err(err) = self.media.delete(&public_id).await {
            warn!(error = %err, book_id = %book.id, %public_id, "failed to delete hosted image");
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn book_not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::not_found("Book not found"),
        other => other.into(),
    }
}
