use std::{cell::RefCell, rc::Rc};

use crate::{
    availability::Availability,
    book::{BookKind, CatalogItem, Entry, FictionBook, Textbook},
    catalog::{Catalog, ShelfStats},
    config::CatalogConfig,
    error::LibraryError,
    events::{CatalogEvent, Circulation},
    observers::CatalogObserver,
    shelf::SearchBy,
};

/// Helper to build a textbook that is known to be valid
#[allow(clippy::expect_used)]
fn textbook(title: &str, author: &str, isbn: i64) -> Textbook {
    Textbook::new(title, author, isbn, "Math", "MAT101", "3rd").expect("valid textbook")
}

/// Helper to build a fiction book that is known to be valid
#[allow(clippy::expect_used)]
fn fiction(title: &str, author: &str, isbn: i64) -> FictionBook {
    FictionBook::new(title, author, isbn, "Sci-Fi", "Paul", "Arrakis").expect("valid fiction book")
}

/// Observer that keeps every event it sees
#[derive(Debug, Default, Clone)]
struct Recorder(Rc<RefCell<Vec<CatalogEvent>>>);

impl CatalogObserver for Recorder {
    fn on_event(&self, event: &CatalogEvent) {
        self.0.borrow_mut().push(event.clone());
    }
}

/// Availability of every textbook, in shelf order
fn textbook_states(catalog: &Catalog) -> Vec<Availability> {
    catalog.textbooks().items().iter().map(|t| t.book().availability()).collect()
}

#[test]
fn test_new_catalog_is_empty() {
    let catalog = Catalog::default();
    let listing = catalog.list_all();
    assert!(listing.textbooks.is_empty());
    assert!(listing.fiction_books.is_empty());
    assert_eq!(catalog.name(), "Library");
}

#[test]
fn test_same_work_same_isbn_is_another_copy() {
    let mut catalog = Catalog::default();
    assert!(catalog.add(textbook("Calculus", "Smith", 111)).is_ok());
    assert!(catalog.add(textbook("Calculus", "Smith", 111)).is_ok());
    assert_eq!(catalog.textbooks().len(), 2);
}

#[test]
fn test_duplicate_isbn_leaves_catalog_unchanged() {
    let mut catalog = Catalog::default();
    assert!(catalog.add(textbook("Calculus", "Smith", 111)).is_ok());

    let result = catalog.add(textbook("Algebra", "Smith", 111));
    assert_eq!(result, Err(LibraryError::DuplicateIsbn { isbn: 111 }));
    assert_eq!(catalog.textbooks().len(), 1);
}

#[test]
fn test_kinds_never_compare_isbns() {
    let mut catalog = Catalog::default();
    assert!(catalog.add(fiction("Dune", "Herbert", 222)).is_ok());

    let result =
        Textbook::new("Physics", "Jones", 222, "Sci", "PHY101", "1st").map(|t| catalog.add(t));
    assert_eq!(result, Ok(Ok(())));
    assert_eq!(catalog.fiction_books().len(), 1);
    assert_eq!(catalog.textbooks().len(), 1);
}

#[test]
fn test_first_fit_borrow_across_copies() {
    let mut catalog = Catalog::default();
    assert!(catalog.add(textbook("Calculus", "Smith", 111)).is_ok());
    assert!(catalog.add(textbook("Calculus", "Smith", 111)).is_ok());

    assert!(catalog.borrow("Calculus", "Smith", BookKind::Textbook).is_ok());
    assert_eq!(textbook_states(&catalog), vec![Availability::Borrowed, Availability::Available]);

    assert!(catalog.borrow("Calculus", "Smith", BookKind::Textbook).is_ok());
    assert_eq!(textbook_states(&catalog), vec![Availability::Borrowed, Availability::Borrowed]);

    let result = catalog.borrow("Calculus", "Smith", BookKind::Textbook);
    assert_eq!(
        result,
        Err(LibraryError::NotBorrowable {
            title: "Calculus".to_string(),
            author: "Smith".to_string()
        })
    );
}

#[test]
fn test_borrow_then_return_sole_copy() {
    let mut catalog = Catalog::default();
    assert!(catalog.add(fiction("Dune", "Herbert", 222)).is_ok());

    assert!(catalog.borrow("Dune", "Herbert", BookKind::FictionBook).is_ok());
    assert!(catalog.borrow("Dune", "Herbert", BookKind::FictionBook).is_err());

    assert!(catalog.return_book("Dune", "Herbert", BookKind::FictionBook).is_ok());
    let again = catalog.return_book("Dune", "Herbert", BookKind::FictionBook);
    assert_eq!(
        again,
        Err(LibraryError::NotReturnable { title: "Dune".to_string(), author: "Herbert".to_string() })
    );

    let copy = catalog.fiction_books().items().first().map(|b| b.book().is_available());
    assert_eq!(copy, Some(true));
}

#[test]
fn test_return_under_wrong_kind_is_not_found() {
    let mut catalog = Catalog::default();
    assert!(catalog.add(fiction("Dune", "Herbert", 222)).is_ok());
    assert!(catalog.borrow("Dune", "Herbert", BookKind::FictionBook).is_ok());

    let result = catalog.return_book("Dune", "Herbert", BookKind::Textbook);
    assert_eq!(result, Err(LibraryError::BookNotFound { kind: BookKind::Textbook }));
}

#[test]
fn test_lookups_on_empty_catalog_miss() {
    let mut catalog = Catalog::default();
    let missing = LibraryError::BookNotFound { kind: BookKind::Textbook };

    assert_eq!(catalog.remove("Calculus", "Smith", BookKind::Textbook).err(), Some(missing.clone()));
    assert_eq!(
        catalog.search("Calculus", BookKind::Textbook, SearchBy::Title).err(),
        Some(missing.clone())
    );
    assert_eq!(catalog.borrow("Calculus", "Smith", BookKind::Textbook), Err(missing.clone()));
    assert_eq!(catalog.return_book("Calculus", "Smith", BookKind::Textbook), Err(missing));
}

#[test]
fn test_work_must_match_title_and_author() {
    let mut catalog = Catalog::default();
    assert!(catalog.add(textbook("Calculus", "Smith", 111)).is_ok());
    let missing = LibraryError::BookNotFound { kind: BookKind::Textbook };

    assert_eq!(catalog.remove("Calculus", "Jones", BookKind::Textbook).err(), Some(missing.clone()));
    assert_eq!(catalog.borrow("Algebra", "Smith", BookKind::Textbook), Err(missing.clone()));
    assert!(catalog.borrow("Calculus", "Smith", BookKind::Textbook).is_ok());
    assert_eq!(catalog.return_book("Calculus", "Jones", BookKind::Textbook), Err(missing));

    assert_eq!(textbook_states(&catalog), vec![Availability::Borrowed]);
    assert_eq!(catalog.history().len(), 1);
}

#[test]
fn test_search_by_author_keeps_insertion_order() {
    let mut catalog = Catalog::default();
    assert!(catalog.add(textbook("Calculus", "Smith", 111)).is_ok());
    assert!(catalog.add(textbook("Physics", "Jones", 333)).is_ok());
    assert!(catalog.add(textbook("Algebra", "Smith", 444)).is_ok());

    let hits = catalog.search("Smith", BookKind::Textbook, SearchBy::Author);
    let titles: Option<Vec<&str>> =
        hits.ok().map(|hits| hits.iter().map(|e| e.book().title()).collect());
    assert_eq!(titles, Some(vec!["Calculus", "Algebra"]));

    let missing = catalog.search("Nobody", BookKind::Textbook, SearchBy::Author);
    assert_eq!(missing.err(), Some(LibraryError::BookNotFound { kind: BookKind::Textbook }));
}

#[test]
fn test_search_is_exact_match() {
    let mut catalog = Catalog::default();
    assert!(catalog.add(fiction("Dune", "Herbert", 222)).is_ok());

    assert!(catalog.search("Dune", BookKind::FictionBook, SearchBy::Title).is_ok());
    assert!(catalog.search("dune", BookKind::FictionBook, SearchBy::Title).is_err());
    assert!(catalog.search("Du", BookKind::FictionBook, SearchBy::Title).is_err());
    // a title query never matches on author
    assert!(catalog.search("Herbert", BookKind::FictionBook, SearchBy::Title).is_err());
}

#[test]
fn test_remove_hands_back_the_entry() {
    let mut catalog = Catalog::default();
    assert!(catalog.add(textbook("Calculus", "Smith", 111)).is_ok());
    assert!(catalog.add(textbook("Physics", "Jones", 333)).is_ok());

    let removed = catalog.remove("Calculus", "Smith", BookKind::Textbook);
    assert!(matches!(removed, Ok(Entry::Textbook(ref t)) if t.book().isbn() == 111));

    let remaining: Vec<&str> =
        catalog.textbooks().items().iter().map(|t| t.book().title()).collect();
    assert_eq!(remaining, vec!["Physics"]);
}

#[test]
fn test_history_records_only_successes() {
    let mut catalog = Catalog::default();
    assert!(catalog.add(textbook("Calculus", "Smith", 111)).is_ok());

    assert!(catalog.borrow("Calculus", "Smith", BookKind::Textbook).is_ok());
    assert!(catalog.borrow("Calculus", "Smith", BookKind::Textbook).is_err());
    assert!(catalog.return_book("Calculus", "Smith", BookKind::Textbook).is_ok());

    let actions: Vec<(Circulation, Availability, Availability)> =
        catalog.history().records().map(|r| (r.action, r.from, r.to)).collect();
    assert_eq!(
        actions,
        vec![
            (Circulation::Borrow, Availability::Available, Availability::Borrowed),
            (Circulation::Return, Availability::Borrowed, Availability::Available),
        ]
    );
}

#[test]
fn test_history_respects_configured_size() {
    let config = CatalogConfig { name: "Branch".to_string(), max_history_size: 1 };
    let mut catalog = Catalog::new(&config);
    assert!(catalog.add(textbook("Calculus", "Smith", 111)).is_ok());

    assert!(catalog.borrow("Calculus", "Smith", BookKind::Textbook).is_ok());
    assert!(catalog.return_book("Calculus", "Smith", BookKind::Textbook).is_ok());

    assert_eq!(catalog.history().len(), 1);
    let last = catalog.history().records().next().map(|r| r.action);
    assert_eq!(last, Some(Circulation::Return));
}

#[test]
fn test_observers_see_successful_mutations() {
    let recorder = Recorder::default();
    let mut catalog = Catalog::default();
    catalog.register_observer(Box::new(recorder.clone()));

    assert!(catalog.add(fiction("Dune", "Herbert", 222)).is_ok());
    assert!(catalog.add(fiction("Emma", "Austen", 222)).is_err());
    assert!(catalog.borrow("Dune", "Herbert", BookKind::FictionBook).is_ok());
    assert!(catalog.remove("Dune", "Herbert", BookKind::FictionBook).is_ok());
    assert!(catalog.remove("Dune", "Herbert", BookKind::FictionBook).is_err());

    let (kind, isbn) = (BookKind::FictionBook, 222);
    let (title, author) = ("Dune".to_string(), "Herbert".to_string());
    assert_eq!(
        *recorder.0.borrow(),
        vec![
            CatalogEvent::Added { kind, title: title.clone(), author: author.clone(), isbn },
            CatalogEvent::Circulated {
                kind,
                title: title.clone(),
                author: author.clone(),
                isbn,
                action: Circulation::Borrow,
            },
            CatalogEvent::Removed { kind, title, author, isbn },
        ]
    );
}

#[test]
fn test_stats_count_borrowed_copies() {
    let mut catalog = Catalog::default();
    assert!(catalog.add(textbook("Calculus", "Smith", 111)).is_ok());
    assert!(catalog.add(textbook("Calculus", "Smith", 111)).is_ok());
    assert!(catalog.add(fiction("Dune", "Herbert", 222)).is_ok());
    assert!(catalog.borrow("Calculus", "Smith", BookKind::Textbook).is_ok());

    let stats = catalog.stats();
    assert_eq!(stats.textbooks, ShelfStats { total: 2, available: 1, borrowed: 1 });
    assert_eq!(stats.fiction_books, ShelfStats { total: 1, available: 1, borrowed: 0 });
}

#[test]
fn test_display_summarises_shelves() {
    let mut catalog = Catalog::default();
    assert!(catalog.add(fiction("Dune", "Herbert", 222)).is_ok());
    assert_eq!(catalog.to_string(), "Library: 0 Textbook(s), 1 Fiction Book(s)");
}
