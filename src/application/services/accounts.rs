use std::sync::Arc;

use tracing::debug;

use crate::application::errors::AppError;
use crate::domain::RepositoryError;
use crate::domain::repositories::UserRepository;
use crate::domain::users::{MIN_PASSWORD_LEN, MIN_USERNAME_LEN, NewUser, User};
use crate::infrastructure::passwords::{hash_password, verify_password};

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Registration and password login over the user store.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Validates, checks email then username for an existing account, hashes
    /// the password and stores the user. The unique indexes make the insert
    /// itself the final word on duplicates, so a concurrent registration that
    /// slips past the pre-check still gets the same conflict message.
    pub async fn register(&self, registration: Registration) -> Result<User, AppError> {
        let username = registration.username.trim().to_string();
        let email = registration.email.trim().to_lowercase();
        let password = registration.password;

        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::validation("All fields are required"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(
                "Password should be at least 6 characters long",
            ));
        }
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(AppError::validation(
                "Username should be at least 3 characters long",
            ));
        }

        if self.users.email_exists(&email).await? {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }
        if self.users.username_exists(&username).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let password_hash = hash_password(&password).await?;
        let user = self
            .users
            .insert(NewUser::new(username, email, password_hash))
            .await?;

        Ok(user)
    }

    /// Unknown email and wrong password both surface as `InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("All fields are required"));
        }

        let user = match self.users.get_by_email(&email).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound) => {
                debug!("login attempted for unknown email");
                return Err(AppError::InvalidCredentials);
            }
            Err(err) => return Err(err.into()),
        };

        if !verify_password(password, &user.password_hash).await? {
            debug!(user.id = %user.id, "login attempted with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }
}
