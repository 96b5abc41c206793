use thiserror::Error;

use crate::book::BookKind;

/// Errors raised while building books or operating on the catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// A required text attribute was empty at construction
    #[error("required field `{field}` is empty")]
    EmptyField {
        /// Name of the first empty field
        field: &'static str,
    },
    /// The ISBN given at construction was below zero
    #[error("ISBN {isbn} is negative")]
    NegativeIsbn {
        /// The rejected ISBN
        isbn: i64,
    },
    /// Another book on the same shelf already uses this ISBN
    #[error("ISBN {isbn} already belongs to a different book")]
    DuplicateIsbn {
        /// The contested ISBN
        isbn: u64,
    },
    /// No entry on the shelf matched the lookup
    #[error("no matching {kind} was found")]
    BookNotFound {
        /// Shelf that was searched
        kind: BookKind,
    },
    /// Every matching copy is already checked out
    #[error("every copy of \"{title}\" by {author} is already borrowed")]
    NotBorrowable {
        /// Requested title
        title: String,
        /// Requested author
        author: String,
    },
    /// No matching copy is currently checked out
    #[error("no copy of \"{title}\" by {author} is checked out")]
    NotReturnable {
        /// Requested title
        title: String,
        /// Requested author
        author: String,
    },
    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, LibraryError>;
