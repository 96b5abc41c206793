//! In-memory library catalog for textbooks and fiction books.
//!
//! This crate keeps one insertion-ordered shelf per kind of book and
//! supports adding, removing, searching, listing, borrowing and returning
//! copies. Borrow and return pick the first suitable copy in shelf order.

pub mod availability;
pub mod book;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod observers;
pub mod render;
pub mod shelf;

pub use availability::Availability;
pub use book::{Book, BookKind, CatalogItem, Entry, EntryRef, FictionBook, Textbook};
pub use catalog::{Catalog, CatalogListing, CatalogStats, ShelfStats};
pub use config::CatalogConfig;
pub use error::{LibraryError, Result};
pub use events::{CatalogEvent, Circulation};
pub use observers::{CatalogObserver, EventLogger};
pub use render::CatalogReport;
pub use shelf::{SearchBy, Shelf};
