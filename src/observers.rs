use tracing::info;

use crate::events::CatalogEvent;

/// Trait for catalog change observation
pub trait CatalogObserver {
    /// Called after every successful mutation of the catalog
    fn on_event(&self, event: &CatalogEvent);
}

/// Logs every catalog change as a structured `tracing` event.
///
/// The crate installs no subscriber. Events reach whichever subscriber the
/// embedding process sets up and are discarded when there is none.
#[derive(Debug)]
pub struct EventLogger;

impl CatalogObserver for EventLogger {
    fn on_event(&self, event: &CatalogEvent) {
        match event {
            CatalogEvent::Added { kind, title, author, isbn } => {
                info!(%kind, title = title.as_str(), author = author.as_str(), isbn, "book added");
            }
            CatalogEvent::Removed { kind, title, author, isbn } => {
                info!(%kind, title = title.as_str(), author = author.as_str(), isbn, "book removed");
            }
            CatalogEvent::Circulated { kind, title, author, isbn, action } => {
                info!(
                    %kind,
                    title = title.as_str(),
                    author = author.as_str(),
                    isbn,
                    %action,
                    "copy circulated"
                );
            }
        }
    }
}
