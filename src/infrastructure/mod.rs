pub mod client;
pub mod database;
pub mod media;
pub mod passwords;
pub mod repositories;
pub mod tokens;
