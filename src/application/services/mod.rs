mod accounts;
mod books;

pub use accounts::{AccountService, Registration};
pub use books::{BookService, BookSubmission};
