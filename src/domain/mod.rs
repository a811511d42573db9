pub mod books;
pub mod errors;
pub mod ids;
pub mod listing;
pub mod media;
pub mod repositories;
pub mod users;

pub use errors::RepositoryError;
