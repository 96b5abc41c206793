use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::{
    book::{Book, BookKind, CatalogItem, Entry, EntryRef, FictionBook, Textbook},
    config::CatalogConfig,
    error::Result,
    events::{CatalogEvent, Circulation},
    history::{CirculationHistory, CirculationRecord, TimeStamp},
    observers::CatalogObserver,
    shelf::{SearchBy, Shelf},
};

/// Every entry in the catalog, grouped by kind in stored order
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogListing<'a> {
    /// Textbook shelf
    pub textbooks: &'a [Textbook],
    /// Fiction shelf
    pub fiction_books: &'a [FictionBook],
}

/// Copy counts for one shelf
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShelfStats {
    /// Copies on the shelf, borrowed or not
    pub total: usize,
    /// Copies ready to borrow
    pub available: usize,
    /// Copies checked out
    pub borrowed: usize,
}

impl ShelfStats {
    /// Count the copies on a shelf
    fn of<T: CatalogItem>(shelf: &Shelf<T>) -> Self {
        let total = shelf.len();
        let available = shelf.available_count();
        Self { total, available, borrowed: total.saturating_sub(available) }
    }
}

/// Copy counts for the whole catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    /// Textbook shelf counts
    pub textbooks: ShelfStats,
    /// Fiction shelf counts
    pub fiction_books: ShelfStats,
}

/// In-memory library catalog holding one shelf per kind of book
pub struct Catalog {
    /// Name of the library
    name: String,
    /// Textbook shelf
    textbooks: Shelf<Textbook>,
    /// Fiction shelf
    fiction_books: Shelf<FictionBook>,
    /// Record of successful borrows and returns
    history: CirculationHistory,
    /// Registered catalog observers
    observers: Vec<Box<dyn CatalogObserver>>,
}

// Manual implementation of Debug for Catalog
impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("name", &self.name)
            .field("textbooks", &self.textbooks)
            .field("fiction_books", &self.fiction_books)
            .field("history", &self.history)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(&CatalogConfig::default())
    }
}

/// Summary fields of a copy, used to build events and history records
fn identify(book: &Book) -> (String, String, u64) {
    (book.title().to_string(), book.author().to_string(), book.isbn())
}

impl Catalog {
    /// Create an empty catalog from its configuration
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            name: config.name.clone(),
            textbooks: Shelf::new(),
            fiction_books: Shelf::new(),
            history: CirculationHistory::with_capacity(config.max_history_size),
            observers: Vec::new(),
        }
    }

    /// Name of the library
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register an observer to be notified of catalog changes
    pub fn register_observer(&mut self, observer: Box<dyn CatalogObserver>) {
        self.observers.push(observer);
    }

    /// Tell every observer about a change
    fn notify(&self, event: &CatalogEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }

    /// Place a copy on the shelf for its kind.
    ///
    /// # Errors
    ///
    /// Returns a `LibraryError::DuplicateIsbn` if a different work on that
    /// shelf already uses the copy's ISBN. The rejected copy is dropped and
    /// the catalog is unchanged.
    pub fn add(&mut self, entry: impl Into<Entry>) -> Result<()> {
        let entry = entry.into();
        let kind = entry.kind();
        let (title, author, isbn) = identify(entry.book());

        match entry {
            Entry::Textbook(item) => self.textbooks.add(item)?,
            Entry::FictionBook(item) => self.fiction_books.add(item)?,
        }

        self.notify(&CatalogEvent::Added { kind, title, author, isbn });
        Ok(())
    }

    /// Take the first copy with this title and author off its shelf and hand
    /// it to the caller.
    ///
    /// # Errors
    ///
    /// Returns a `LibraryError::BookNotFound` if the shelf has no such copy
    pub fn remove(&mut self, title: &str, author: &str, kind: BookKind) -> Result<Entry> {
        let entry = match kind {
            BookKind::Textbook => self.textbooks.remove(title, author).map(CatalogItem::into_entry),
            BookKind::FictionBook => {
                self.fiction_books.remove(title, author).map(CatalogItem::into_entry)
            }
        }?;

        let (title, author, isbn) = identify(entry.book());
        self.notify(&CatalogEvent::Removed { kind, title, author, isbn });
        Ok(entry)
    }

    /// Every copy of the given kind whose title (or author) equals `query`,
    /// in stored order.
    ///
    /// # Errors
    ///
    /// Returns a `LibraryError::BookNotFound` if nothing matches
    pub fn search(&self, query: &str, kind: BookKind, by: SearchBy) -> Result<Vec<EntryRef<'_>>> {
        let hits = match kind {
            BookKind::Textbook => {
                self.textbooks.search(query, by)?.into_iter().map(CatalogItem::entry_ref).collect()
            }
            BookKind::FictionBook => self
                .fiction_books
                .search(query, by)?
                .into_iter()
                .map(CatalogItem::entry_ref)
                .collect(),
        };
        Ok(hits)
    }

    /// Both shelves in stored order
    #[must_use]
    pub fn list_all(&self) -> CatalogListing<'_> {
        CatalogListing {
            textbooks: self.textbooks.items(),
            fiction_books: self.fiction_books.items(),
        }
    }

    /// Borrow or return the first suitable copy with this title and author.
    ///
    /// # Errors
    ///
    /// - `LibraryError::BookNotFound` if the shelf holds no such copy
    /// - `LibraryError::NotBorrowable` if borrowing and every copy is out
    /// - `LibraryError::NotReturnable` if returning and no copy is out
    pub fn borrow_or_return(
        &mut self,
        title: &str,
        author: &str,
        kind: BookKind,
        action: Circulation,
    ) -> Result<()> {
        let outcome = match kind {
            BookKind::Textbook => self.textbooks.circulate(title, author, action),
            BookKind::FictionBook => self.fiction_books.circulate(title, author, action),
        }?;

        debug!(%kind, title, author, %action, position = outcome.position, "copy chosen");

        self.history.push(CirculationRecord {
            kind,
            title: title.to_string(),
            author: author.to_string(),
            isbn: outcome.isbn,
            from: outcome.from,
            to: outcome.to,
            action,
            timestamp: TimeStamp::now(),
        });

        self.notify(&CatalogEvent::Circulated {
            kind,
            title: title.to_string(),
            author: author.to_string(),
            isbn: outcome.isbn,
            action,
        });
        Ok(())
    }

    /// Borrow the first available copy
    ///
    /// # Errors
    ///
    /// See [`Catalog::borrow_or_return`]
    pub fn borrow(&mut self, title: &str, author: &str, kind: BookKind) -> Result<()> {
        self.borrow_or_return(title, author, kind, Circulation::Borrow)
    }

    /// Return the first borrowed copy
    ///
    /// # Errors
    ///
    /// See [`Catalog::borrow_or_return`]
    pub fn return_book(&mut self, title: &str, author: &str, kind: BookKind) -> Result<()> {
        self.borrow_or_return(title, author, kind, Circulation::Return)
    }

    /// Textbook shelf
    #[must_use]
    pub fn textbooks(&self) -> &Shelf<Textbook> {
        &self.textbooks
    }

    /// Fiction shelf
    #[must_use]
    pub fn fiction_books(&self) -> &Shelf<FictionBook> {
        &self.fiction_books
    }

    /// Record of successful borrows and returns, oldest first
    #[must_use]
    pub fn history(&self) -> &CirculationHistory {
        &self.history
    }

    /// Copy counts per shelf
    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            textbooks: ShelfStats::of(&self.textbooks),
            fiction_books: ShelfStats::of(&self.fiction_books),
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} Textbook(s), {} Fiction Book(s)",
            self.name,
            self.textbooks.len(),
            self.fiction_books.len()
        )
    }
}

// Include tests module
#[cfg(test)]
mod tests;
