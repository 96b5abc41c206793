use crate::{
    availability::Availability,
    book::{BookKind, CatalogItem, EntryRef},
    catalog::{CatalogListing, CatalogStats, ShelfStats},
    history::CirculationHistory,
};

/// Text reports over catalog contents
#[derive(Debug)]
pub struct CatalogReport;

impl CatalogReport {
    /// Details and availability of one entry, followed by a blank line
    #[must_use]
    pub fn entry_block(entry: EntryRef<'_>) -> String {
        format!("{entry}\n\n")
    }

    /// Heading plus one block per entry
    fn section(heading: &str, entries: &[EntryRef<'_>]) -> String {
        let mut text = format!("\n{heading}\n\n");
        for entry in entries {
            text.push_str(&Self::entry_block(*entry));
        }
        text
    }

    /// Both shelves, textbooks first, in stored order
    #[must_use]
    pub fn listing(listing: &CatalogListing<'_>) -> String {
        let mut text = Self::section(
            &format!("There are {} {}(s):", listing.textbooks.len(), BookKind::Textbook),
            &listing.textbooks.iter().map(CatalogItem::entry_ref).collect::<Vec<_>>(),
        );
        text.push_str(&Self::section(
            &format!("There are {} {}(s):", listing.fiction_books.len(), BookKind::FictionBook),
            &listing.fiction_books.iter().map(CatalogItem::entry_ref).collect::<Vec<_>>(),
        ));
        text
    }

    /// Matches of a title or author search
    #[must_use]
    pub fn search_results(kind: BookKind, hits: &[EntryRef<'_>]) -> String {
        Self::section(
            &format!("There are {} {kind}(s) with this title or author:", hits.len()),
            hits,
        )
    }

    /// Format an availability state for display
    fn format_state(state: Availability) -> &'static str {
        match state {
            Availability::Available => "📚 Available",
            Availability::Borrowed => "📖 Borrowed",
        }
    }

    /// Generate a markdown table of the circulation history
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn history_table(history: &CirculationHistory) -> String {
        if history.is_empty() {
            return "No circulation recorded yet.".to_string();
        }

        let mut table = String::from("| # | Kind | Title | Author | ISBN | Action | From | To |\n");
        table.push_str("|---|------|-------|--------|------|--------|------|----|\n");

        for (i, record) in history.records().enumerate() {
            table.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
                i + 1,
                record.kind,
                record.title,
                record.author,
                record.isbn,
                record.action,
                Self::format_state(record.from),
                Self::format_state(record.to)
            ));
        }

        table.push_str(&format!(
            "\n{} of at most {} records kept.",
            history.len(),
            history.capacity()
        ));
        table
    }

    /// Copy counts per shelf
    #[must_use]
    pub fn stats(stats: &CatalogStats) -> String {
        let line = |kind: BookKind, shelf: &ShelfStats| {
            format!(
                "  {kind}: {} total, {} available, {} borrowed\n",
                shelf.total, shelf.available, shelf.borrowed
            )
        };

        let mut text = String::from("=== Catalog Statistics ===\n");
        text.push_str(&line(BookKind::Textbook, &stats.textbooks));
        text.push_str(&line(BookKind::FictionBook, &stats.fiction_books));
        text
    }
}
