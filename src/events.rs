use std::fmt;

use serde::{Deserialize, Serialize};

use crate::book::BookKind;

/// Circulation actions that move a copy between shelf and patron
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Circulation {
    /// Check a copy out of the library
    Borrow,
    /// Bring a checked-out copy back
    Return,
}

impl fmt::Display for Circulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Borrow => f.write_str("borrow"),
            Self::Return => f.write_str("return"),
        }
    }
}

/// Events emitted by the catalog after a successful mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CatalogEvent {
    /// A copy was placed on a shelf
    Added {
        /// Shelf the copy went to
        kind: BookKind,
        /// Title of the copy
        title: String,
        /// Author of the copy
        author: String,
        /// ISBN of the copy
        isbn: u64,
    },
    /// A copy was taken off a shelf for good
    Removed {
        /// Shelf the copy came from
        kind: BookKind,
        /// Title of the copy
        title: String,
        /// Author of the copy
        author: String,
        /// ISBN of the copy
        isbn: u64,
    },
    /// A copy changed hands through a borrow or return
    Circulated {
        /// Shelf holding the copy
        kind: BookKind,
        /// Title of the copy
        title: String,
        /// Author of the copy
        author: String,
        /// ISBN of the copy
        isbn: u64,
        /// What happened to it
        action: Circulation,
    },
}
