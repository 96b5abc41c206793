//! One kind's insertion-ordered collection.
//!
//! Every operation family (add, remove, search, borrow/return) is written once
//! here and instantiated per kind by the catalog. Lookups are linear scans in
//! stored order; nothing is ever sorted.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    availability::Availability,
    book::CatalogItem,
    error::{LibraryError, Result},
    events::Circulation,
};

/// Which attribute a search compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SearchBy {
    /// Match on the exact title
    Title,
    /// Match on the exact author
    Author,
}

/// What a successful borrow or return did to the chosen copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CirculationOutcome {
    /// Position of the copy on its shelf
    pub position: usize,
    /// ISBN of the copy
    pub isbn: u64,
    /// State before the action
    pub from: Availability,
    /// State after the action
    pub to: Availability,
}

/// Insertion-ordered collection of one kind of book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shelf<T> {
    /// Copies in the order they were added
    items: Vec<T>,
}

impl<T> Default for Shelf<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: CatalogItem> Shelf<T> {
    /// Create an empty shelf
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies in stored order
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of copies on the shelf
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the shelf holds no copies
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a copy.
    ///
    /// A copy may share its ISBN only with copies of the same work, i.e. with
    /// the same title and author.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::DuplicateIsbn` if a different work on this shelf
    /// already uses the ISBN. The shelf is unchanged.
    pub fn add(&mut self, item: T) -> Result<()> {
        let book = item.book();
        let clash = self.items.iter().map(CatalogItem::book).any(|existing| {
            existing.isbn() == book.isbn() && !existing.is_same_work(book.title(), book.author())
        });

        if clash {
            debug!(kind = %T::KIND, isbn = book.isbn(), title = book.title(), "isbn already taken");
            return Err(LibraryError::DuplicateIsbn { isbn: book.isbn() });
        }

        self.items.push(item);
        Ok(())
    }

    /// Take the first copy of a work off the shelf, keeping the others in order.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::BookNotFound` if no copy has this title and author.
    pub fn remove(&mut self, title: &str, author: &str) -> Result<T> {
        let position = self
            .items
            .iter()
            .position(|item| item.book().is_same_work(title, author))
            .ok_or(LibraryError::BookNotFound { kind: T::KIND })?;

        Ok(self.items.remove(position))
    }

    /// Every copy whose title or author equals `query`, in stored order.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::BookNotFound` if nothing matches.
    pub fn search(&self, query: &str, by: SearchBy) -> Result<Vec<&T>> {
        let matches: Vec<&T> = self
            .items
            .iter()
            .filter(|item| match by {
                SearchBy::Title => item.book().title() == query,
                SearchBy::Author => item.book().author() == query,
            })
            .collect();

        debug!(kind = %T::KIND, query, by = ?by, hits = matches.len(), "shelf search");

        if matches.is_empty() {
            return Err(LibraryError::BookNotFound { kind: T::KIND });
        }
        Ok(matches)
    }

    /// Borrow or return one copy of a work.
    ///
    /// Among the copies with this title and author, the first one in stored
    /// order whose state admits `action` is moved to its next state.
    ///
    /// # Errors
    ///
    /// - `LibraryError::BookNotFound` if no copy has this title and author
    /// - `LibraryError::NotBorrowable` if borrowing and every copy is out
    /// - `LibraryError::NotReturnable` if returning and no copy is out
    pub fn circulate(
        &mut self,
        title: &str,
        author: &str,
        action: Circulation,
    ) -> Result<CirculationOutcome> {
        let mut copies = self
            .items
            .iter_mut()
            .enumerate()
            .filter(|(_, item)| item.book().is_same_work(title, author))
            .peekable();

        if copies.peek().is_none() {
            return Err(LibraryError::BookNotFound { kind: T::KIND });
        }

        let chosen = copies.find_map(|(position, item)| {
            item.book().availability().apply(action).map(|next| (position, item, next))
        });

        let Some((position, item, to)) = chosen else {
            debug!(kind = %T::KIND, title, author, %action, "no copy in the required state");
            let (title, author) = (title.to_string(), author.to_string());
            return Err(match action {
                Circulation::Borrow => LibraryError::NotBorrowable { title, author },
                Circulation::Return => LibraryError::NotReturnable { title, author },
            });
        };

        let book = item.book_mut();
        let from = book.availability();
        book.set_availability(to);

        Ok(CirculationOutcome { position, isbn: book.isbn(), from, to })
    }

    /// Number of copies currently on the shelf and ready to borrow
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.items.iter().filter(|item| item.book().is_available()).count()
    }
}
