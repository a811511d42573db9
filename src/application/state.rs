use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{AccountService, BookService};
use crate::domain::media::MediaStore;
use crate::domain::repositories::{BookRepository, UserRepository};
use crate::infrastructure::database::Database;
use crate::infrastructure::media::{CloudinaryConfig, CloudinaryMediaStore};
use crate::infrastructure::repositories::books::SqlBookRepository;
use crate::infrastructure::repositories::users::SqlUserRepository;
use crate::infrastructure::tokens::TokenIssuer;

/// Secrets and collaborator settings, built once at startup.
pub struct AppStateConfig {
    pub jwt_secret: String,
    pub cloudinary: CloudinaryConfig,
}

#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<dyn UserRepository>,
    pub book_repo: Arc<dyn BookRepository>,
    pub tokens: Arc<TokenIssuer>,
    pub account_service: AccountService,
    pub book_service: BookService,
}

impl AppState {
    /// Build the full application state from a database connection and config.
    pub fn from_database(database: &Database, config: AppStateConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .build()?;
        let media: Arc<dyn MediaStore> =
            Arc::new(CloudinaryMediaStore::new(http_client, config.cloudinary));

        Ok(Self::with_media(database, &config.jwt_secret, media))
    }

    /// Same as [`AppState::from_database`] with an explicit media store.
    pub fn with_media(database: &Database, jwt_secret: &str, media: Arc<dyn MediaStore>) -> Self {
        let pool = database.clone_pool();

        let user_repo: Arc<dyn UserRepository> = Arc::new(SqlUserRepository::new(pool.clone()));
        let book_repo: Arc<dyn BookRepository> = Arc::new(SqlBookRepository::new(pool));
        let tokens = Arc::new(TokenIssuer::new(jwt_secret.as_bytes()));

        let account_service = AccountService::new(Arc::clone(&user_repo));
        let book_service = BookService::new(Arc::clone(&book_repo), media);

        Self {
            user_repo,
            book_repo,
            tokens,
            account_service,
            book_service,
        }
    }
}
