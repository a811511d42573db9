use thiserror::Error;

/// bcrypt work factor for stored passwords.
pub const PASSWORD_HASH_COST: u32 = 10;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Salted one-way hash, computed on the blocking pool.
pub async fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    let plaintext = plaintext.to_owned();
    let hashed =
        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, PASSWORD_HASH_COST)).await??;
    Ok(hashed)
}

/// Compares a candidate password against a stored hash. A malformed stored
/// hash is an error, not a mismatch.
pub async fn verify_password(plaintext: &str, password_hash: &str) -> Result<bool, PasswordError> {
    let plaintext = plaintext.to_owned();
    let password_hash = password_hash.to_owned();
    let matches =
        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &password_hash)).await??;
    Ok(matches)
}
