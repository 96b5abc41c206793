//! Book records and the two kinds of catalog item.
//!
//! Every item embeds a shared [`Book`] record. Construction validates all
//! text attributes in declaration order before the ISBN, so a book that
//! exists always has non-empty text and a non-negative ISBN.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    availability::Availability,
    error::{LibraryError, Result},
};

/// The two fixed categories of book, each kept on its own shelf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum BookKind {
    /// Course material
    Textbook,
    /// Novels and stories
    FictionBook,
}

impl fmt::Display for BookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Textbook => f.write_str("Textbook"),
            Self::FictionBook => f.write_str("Fiction Book"),
        }
    }
}

/// Fail with `EmptyField` naming the first empty attribute, if any
fn ensure_filled(fields: &[(&'static str, &str)]) -> Result<()> {
    fields
        .iter()
        .find(|(_, value)| value.is_empty())
        .map_or(Ok(()), |&(field, _)| Err(LibraryError::EmptyField { field }))
}

/// Fail with `NegativeIsbn` unless the ISBN fits the unsigned range
fn ensure_isbn(isbn: i64) -> Result<u64> {
    u64::try_from(isbn).map_err(|_| LibraryError::NegativeIsbn { isbn })
}

/// Attributes shared by every catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Title of the work
    title: String,
    /// Author of the work
    author: String,
    /// Genre of the work
    genre: String,
    /// ISBN; equal for every copy of the same work
    isbn: u64,
    /// Whether this copy is on the shelf
    availability: Availability,
}

impl Book {
    /// Title of the work
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Author of the work
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Genre of the work
    #[must_use]
    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// ISBN of the work
    #[must_use]
    pub fn isbn(&self) -> u64 {
        self.isbn
    }

    /// Current circulation state of this copy
    #[must_use]
    pub fn availability(&self) -> Availability {
        self.availability
    }

    /// Whether this copy can be borrowed right now
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.availability.is_available()
    }

    /// Whether this copy has the given title and author
    #[must_use]
    pub fn is_same_work(&self, title: &str, author: &str) -> bool {
        self.title == title && self.author == author
    }

    /// Only the shelf's borrow and return paths move a copy between states.
    pub(crate) fn set_availability(&mut self, availability: Availability) {
        self.availability = availability;
    }

    /// Two-line description of the shared attributes
    #[must_use]
    pub fn details(&self) -> String {
        format!(
            "\t{} is made by {}; its genre is {}.\n\tIts ISBN is {}.",
            self.title, self.author, self.genre, self.isbn
        )
    }

    /// One-line availability statement
    #[must_use]
    pub fn availability_text(&self) -> String {
        format!("\t{} is {}.", self.title, self.availability.get_description())
    }
}

/// Behaviour every kind of catalog item provides to its shelf
pub trait CatalogItem {
    /// The shelf this kind lives on
    const KIND: BookKind;

    /// Shared record
    fn book(&self) -> &Book;

    /// Shared record, mutably
    fn book_mut(&mut self) -> &mut Book;

    /// The kind-specific line of the detail text
    fn kind_details(&self) -> String;

    /// Borrowed, kind-erased view of this item
    fn entry_ref(&self) -> EntryRef<'_>;

    /// Owned, kind-erased form of this item
    fn into_entry(self) -> Entry;

    /// Full detail text: the shared lines followed by the kind line
    fn details(&self) -> String {
        format!("{}\n{}", self.book().details(), self.kind_details())
    }
}

/// A book assigned to a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Textbook {
    /// Shared record
    #[serde(flatten)]
    book: Book,
    /// Course the textbook is used for
    course: String,
    /// Edition of the textbook
    edition: String,
}

impl Textbook {
    /// Build a textbook, validating every attribute.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::EmptyField` for the first empty text attribute
    /// (title, author, genre, course, edition), otherwise
    /// `LibraryError::NegativeIsbn` when `isbn` is below zero.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: i64,
        genre: impl Into<String>,
        course: impl Into<String>,
        edition: impl Into<String>,
    ) -> Result<Self> {
        let (title, author, genre) = (title.into(), author.into(), genre.into());
        let (course, edition) = (course.into(), edition.into());

        ensure_filled(&[
            ("title", &title),
            ("author", &author),
            ("genre", &genre),
            ("course", &course),
            ("edition", &edition),
        ])?;
        let isbn = ensure_isbn(isbn)?;

        Ok(Self {
            book: Book { title, author, genre, isbn, availability: Availability::default() },
            course,
            edition,
        })
    }

    /// Course the textbook is used for
    #[must_use]
    pub fn course(&self) -> &str {
        &self.course
    }

    /// Edition of the textbook
    #[must_use]
    pub fn edition(&self) -> &str {
        &self.edition
    }
}

impl CatalogItem for Textbook {
    const KIND: BookKind = BookKind::Textbook;

    fn book(&self) -> &Book {
        &self.book
    }

    fn book_mut(&mut self) -> &mut Book {
        &mut self.book
    }

    fn kind_details(&self) -> String {
        format!(
            "\tThis is a Textbook. The Course it's for is {} and the Edition is {}.",
            self.course, self.edition
        )
    }

    fn entry_ref(&self) -> EntryRef<'_> {
        EntryRef::Textbook(self)
    }

    fn into_entry(self) -> Entry {
        Entry::Textbook(self)
    }
}

/// A work of fiction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FictionBook {
    /// Shared record
    #[serde(flatten)]
    book: Book,
    /// Protagonist of the story
    main_character: String,
    /// Where the story takes place
    setting: String,
}

impl FictionBook {
    /// Build a fiction book, validating every attribute.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::EmptyField` for the first empty text attribute
    /// (title, author, genre, main character, setting), otherwise
    /// `LibraryError::NegativeIsbn` when `isbn` is below zero.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: i64,
        genre: impl Into<String>,
        main_character: impl Into<String>,
        setting: impl Into<String>,
    ) -> Result<Self> {
        let (title, author, genre) = (title.into(), author.into(), genre.into());
        let (main_character, setting) = (main_character.into(), setting.into());

        ensure_filled(&[
            ("title", &title),
            ("author", &author),
            ("genre", &genre),
            ("main character", &main_character),
            ("setting", &setting),
        ])?;
        let isbn = ensure_isbn(isbn)?;

        Ok(Self {
            book: Book { title, author, genre, isbn, availability: Availability::default() },
            main_character,
            setting,
        })
    }

    /// Protagonist of the story
    #[must_use]
    pub fn main_character(&self) -> &str {
        &self.main_character
    }

    /// Where the story takes place
    #[must_use]
    pub fn setting(&self) -> &str {
        &self.setting
    }
}

impl CatalogItem for FictionBook {
    const KIND: BookKind = BookKind::FictionBook;

    fn book(&self) -> &Book {
        &self.book
    }

    fn book_mut(&mut self) -> &mut Book {
        &mut self.book
    }

    fn kind_details(&self) -> String {
        format!(
            "\tThis is a Fiction Book. The Main Character is {} and the setting is {}.",
            self.main_character, self.setting
        )
    }

    fn entry_ref(&self) -> EntryRef<'_> {
        EntryRef::FictionBook(self)
    }

    fn into_entry(self) -> Entry {
        Entry::FictionBook(self)
    }
}

/// An owned catalog item of either kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Entry {
    /// A textbook
    Textbook(Textbook),
    /// A fiction book
    FictionBook(FictionBook),
}

impl Entry {
    /// Shelf this entry belongs on
    #[must_use]
    pub fn kind(&self) -> BookKind {
        self.as_entry_ref().kind()
    }

    /// Shared record
    #[must_use]
    pub fn book(&self) -> &Book {
        match self {
            Self::Textbook(item) => item.book(),
            Self::FictionBook(item) => item.book(),
        }
    }

    /// Borrowed view of this entry
    #[must_use]
    pub fn as_entry_ref(&self) -> EntryRef<'_> {
        match self {
            Self::Textbook(item) => item.entry_ref(),
            Self::FictionBook(item) => item.entry_ref(),
        }
    }
}

impl From<Textbook> for Entry {
    fn from(item: Textbook) -> Self {
        Self::Textbook(item)
    }
}

impl From<FictionBook> for Entry {
    fn from(item: FictionBook) -> Self {
        Self::FictionBook(item)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_entry_ref().fmt(f)
    }
}

/// A borrowed catalog item of either kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum EntryRef<'a> {
    /// A textbook
    Textbook(&'a Textbook),
    /// A fiction book
    FictionBook(&'a FictionBook),
}

impl<'a> EntryRef<'a> {
    /// Shelf this entry belongs on
    #[must_use]
    pub fn kind(self) -> BookKind {
        match self {
            Self::Textbook(_) => BookKind::Textbook,
            Self::FictionBook(_) => BookKind::FictionBook,
        }
    }

    /// Shared record
    #[must_use]
    pub fn book(self) -> &'a Book {
        match self {
            Self::Textbook(item) => item.book(),
            Self::FictionBook(item) => item.book(),
        }
    }

    /// Full detail text for the entry
    #[must_use]
    pub fn details(self) -> String {
        match self {
            Self::Textbook(item) => item.details(),
            Self::FictionBook(item) => item.details(),
        }
    }
}

impl fmt::Display for EntryRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.details(), self.book().availability_text())
    }
}
