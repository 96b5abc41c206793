use serde::{Deserialize, Serialize};

use crate::events::Circulation;

/// Represents whether a copy is on the shelf or checked out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Availability {
    /// Copy is on the shelf and can be borrowed
    #[default]
    Available,
    /// Copy is checked out and can be returned
    Borrowed,
}

impl Availability {
    /// Get a human-readable description of the current state
    #[must_use]
    pub fn get_description(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Borrowed => "not available",
        }
    }

    /// Whether the copy can currently be borrowed
    #[must_use]
    pub fn is_available(self) -> bool {
        self == Self::Available
    }

    /// The state a circulation action would move this copy into.
    ///
    /// Returns `None` when the action is not a valid transition from the
    /// current state (borrowing a borrowed copy, returning one on the shelf).
    #[must_use]
    pub fn apply(self, action: Circulation) -> Option<Self> {
        match (self, action) {
            (Self::Available, Circulation::Borrow) => Some(Self::Borrowed),
            (Self::Borrowed, Circulation::Return) => Some(Self::Available),
            _ => None,
        }
    }
}
