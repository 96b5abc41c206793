use std::{
    cell::RefCell,
    error::Error,
    io::{self, BufRead, Write},
    path::PathBuf,
    rc::Rc,
};

use clap::Parser;
use colored::Colorize;
use library_catalog::{
    BookKind, Catalog, CatalogConfig, CatalogEvent, CatalogObserver, CatalogReport, Circulation,
    EventLogger, FictionBook, LibraryError, SearchBy, Textbook,
};

/// Command-line arguments for the interactive catalog
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Name of the library shown in the greeting
    #[arg(short, long)]
    name: Option<String>,

    /// JSON configuration file; flags given here override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of borrow/return records to keep (0 disables history)
    #[arg(long)]
    history_size: Option<usize>,

    /// Print listings, search results and history as JSON
    #[arg(long)]
    json: bool,

    /// Echo every catalog change as it happens
    #[arg(short, long)]
    verbose: bool,
}

/// Queues a line per catalog change for the session to print
#[derive(Debug, Clone, Default)]
struct ConsoleEcho {
    /// Lines not yet written to the session output
    pending: Rc<RefCell<Vec<String>>>,
}

impl ConsoleEcho {
    /// Take every queued line, oldest first
    fn drain(&self) -> Vec<String> {
        self.pending.borrow_mut().drain(..).collect()
    }
}

impl CatalogObserver for ConsoleEcho {
    fn on_event(&self, event: &CatalogEvent) {
        let line = match event {
            CatalogEvent::Added { kind, title, author, isbn } => {
                format!("LOGGER: added {kind} \"{title}\" by {author} (ISBN {isbn})")
            }
            CatalogEvent::Removed { kind, title, author, isbn } => {
                format!("LOGGER: removed {kind} \"{title}\" by {author} (ISBN {isbn})")
            }
            CatalogEvent::Circulated { kind, title, author, isbn, action } => {
                format!("LOGGER: {action} of {kind} \"{title}\" by {author} (ISBN {isbn})")
            }
        };
        self.pending.borrow_mut().push(line);
    }
}

/// Message shown when a book of this kind has an empty field
fn empty_field_message(kind: BookKind) -> &'static str {
    match kind {
        BookKind::Textbook => "Empty title, author, genre, course, or edition is invalid.",
        BookKind::FictionBook => {
            "Empty title, author, genre, main character, or setting is invalid."
        }
    }
}

/// Message shown when an operation is refused
fn describe(error: &LibraryError, kind: BookKind) -> String {
    match error {
        LibraryError::EmptyField { .. } => {
            format!("{}\nThe book has not been added.", empty_field_message(kind))
        }
        LibraryError::NegativeIsbn { .. } => {
            "Negative ISBN is invalid.\nThe book has not been added.".to_string()
        }
        LibraryError::DuplicateIsbn { .. } => {
            "Books that aren't the same book cannot have the same ISBN.".to_string()
        }
        LibraryError::BookNotFound { .. } => "Book was not found.".to_string(),
        LibraryError::NotBorrowable { .. } => "This book is not available at this time.".to_string(),
        LibraryError::NotReturnable { .. } => {
            "This book cannot be returned, as all matches are already present.\n\
             It is likely that this book does not belong to this library."
                .to_string()
        }
        LibraryError::Config(message) => message.clone(),
    }
}

/// One interactive session over a catalog
struct Session<R, W> {
    /// The catalog being operated on
    catalog: Catalog,
    /// Where answers are read from
    input: R,
    /// Where prompts and reports go
    output: W,
    /// Whether reports are printed as JSON
    json: bool,
    /// Echo of catalog changes, when verbose
    echo: Option<ConsoleEcho>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Create a session over a catalog
    fn new(catalog: Catalog, input: R, output: W, json: bool) -> Self {
        Self { catalog, input, output, json, echo: None }
    }

    /// Echo every catalog change after the operation that caused it
    fn with_echo(mut self) -> Self {
        let echo = ConsoleEcho::default();
        self.catalog.register_observer(Box::new(echo.clone()));
        self.echo = Some(echo);
        self
    }

    /// Write out queued change lines
    fn flush_echo(&mut self) -> io::Result<()> {
        let lines = self.echo.as_ref().map(ConsoleEcho::drain).unwrap_or_default();
        for line in lines {
            writeln!(self.output, "{}", line.dimmed())?;
        }
        Ok(())
    }

    /// Read one line without its line ending; end of input is `UnexpectedEof`
    fn read_line(&mut self) -> io::Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Ask for free text
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.read_line()
    }

    /// Report a refused operation
    fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "\n{}\n", format!("ERROR: {message}").red())
    }

    /// Report a completed operation
    fn success(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "\n{}\n", message.green())
    }

    /// Ask until one of the numbered options is picked
    fn choose<T: Copy>(&mut self, question: &str, options: &[(&str, T)]) -> io::Result<T> {
        loop {
            writeln!(self.output, "\n{question}")?;
            for (number, (label, _)) in (1..).zip(options) {
                writeln!(self.output, "\t{number}. {label}")?;
            }
            let answer = self.ask("Selection: ")?;
            let picked = answer
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i));
            if let Some(&(_, value)) = picked {
                return Ok(value);
            }
            writeln!(self.output, "\n{}", "ERROR: Invalid choice; please try again.".red())?;
        }
    }

    /// Ask which kind of book an operation is about
    fn choose_kind(&mut self, verb: &str) -> io::Result<BookKind> {
        self.choose(
            &format!("What type of book would you like to {verb}?"),
            &[("Textbook", BookKind::Textbook), ("Fiction Book", BookKind::FictionBook)],
        )
    }

    /// Ask until an integer ISBN is given
    fn ask_isbn(&mut self) -> io::Result<i64> {
        loop {
            if let Ok(isbn) = self.ask("ISBN (enter an integer): ")?.trim().parse() {
                return Ok(isbn);
            }
            writeln!(self.output, "{}", "ERROR: ISBN must be an integer; please try again.".red())?;
        }
    }

    /// Ask for the title and author identifying a work
    fn ask_work(&mut self) -> io::Result<(String, String)> {
        writeln!(self.output, "\nWhat is the title of the book?")?;
        let title = self.read_line()?;
        writeln!(self.output, "\nWhat is the author of the book?")?;
        let author = self.read_line()?;
        Ok((title, author))
    }

    /// Print a value as pretty JSON
    fn print_json(&mut self, value: &impl serde::Serialize) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(self.output, "{json}")
    }

    /// Run the menu loop until the user leaves or input ends
    fn run(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "{}\n",
            format!("Welcome to the {}! What would you like to do today?", self.catalog.name())
                .bold()
        )?;

        loop {
            match self.step() {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }

    /// Show the menu and carry out one choice; `false` means leave
    fn step(&mut self) -> io::Result<bool> {
        writeln!(self.output, "Please pick a number.")?;
        for (number, label) in (1..).zip([
            "Add a Book",
            "Remove a Book",
            "Search for a Book",
            "Display all Books",
            "Borrow a Book",
            "Return a Book",
            "Show circulation history",
            "Leave",
        ]) {
            writeln!(self.output, "\t{number}. {label}")?;
        }

        match self.ask("Selection: ")?.trim() {
            "1" => self.add()?,
            "2" => self.remove()?,
            "3" => self.search()?,
            "4" => self.display()?,
            "5" => self.circulate(Circulation::Borrow)?,
            "6" => self.circulate(Circulation::Return)?,
            "7" => self.history()?,
            "8" => {
                writeln!(self.output, "\nGoodbye!")?;
                return Ok(false);
            }
            _ => self.error("Invalid choice; please try again.")?,
        }
        self.flush_echo()?;
        Ok(true)
    }

    /// Collect a new book's fields and add it
    fn add(&mut self) -> io::Result<()> {
        let kind = self.choose_kind("add")?;
        let title = self.ask("\nTitle: ")?;
        let author = self.ask("Author: ")?;
        let isbn = self.ask_isbn()?;
        let genre = self.ask("Genre: ")?;

        let outcome = match kind {
            BookKind::Textbook => {
                let course = self.ask("\nCourse: ")?;
                let edition = self.ask("Edition: ")?;
                Textbook::new(title, author, isbn, genre, course, edition)
                    .and_then(|book| self.catalog.add(book))
            }
            BookKind::FictionBook => {
                let main_character = self.ask("\nMain Character: ")?;
                let setting = self.ask("Setting: ")?;
                FictionBook::new(title, author, isbn, genre, main_character, setting)
                    .and_then(|book| self.catalog.add(book))
            }
        };

        match outcome {
            Ok(()) => self.success("The book has been added successfully!"),
            Err(e) => self.error(&describe(&e, kind)),
        }
    }

    /// Remove the first copy of a work
    fn remove(&mut self) -> io::Result<()> {
        let kind = self.choose_kind("remove")?;
        let (title, author) = self.ask_work()?;

        match self.catalog.remove(&title, &author, kind) {
            Ok(_) => self.success("The book was successfully removed!"),
            Err(e) => self.error(&describe(&e, kind)),
        }
    }

    /// Search one shelf by title or author
    fn search(&mut self) -> io::Result<()> {
        let kind = self.choose_kind("search for")?;
        let by = self.choose(
            "Would you like to search by title or author?",
            &[("Title", SearchBy::Title), ("Author", SearchBy::Author)],
        )?;
        let query = match by {
            SearchBy::Title => self.ask("\nWhat is the title of the book?\n")?,
            SearchBy::Author => self.ask("\nWhat is the author of the book?\n")?,
        };

        let report = match self.catalog.search(&query, kind, by) {
            Ok(hits) if self.json => Ok(serde_json::to_string_pretty(&hits)?),
            Ok(hits) => Ok(CatalogReport::search_results(kind, &hits)),
            Err(e) => Err(describe(&e, kind)),
        };

        match report {
            Ok(text) => writeln!(self.output, "{text}"),
            Err(message) => self.error(&message),
        }
    }

    /// Show every book on both shelves
    fn display(&mut self) -> io::Result<()> {
        let text = if self.json {
            serde_json::to_string_pretty(&self.catalog.list_all())?
        } else {
            CatalogReport::listing(&self.catalog.list_all())
        };
        writeln!(self.output, "{text}")
    }

    /// Borrow or return one copy
    fn circulate(&mut self, action: Circulation) -> io::Result<()> {
        let kind = self.choose_kind(&action.to_string())?;
        let (title, author) = self.ask_work()?;

        match self.catalog.borrow_or_return(&title, &author, kind, action) {
            Ok(()) => match action {
                Circulation::Borrow => self.success("The book has been borrowed successfully!"),
                Circulation::Return => self.success("The book has been returned successfully!"),
            },
            Err(e) => self.error(&describe(&e, kind)),
        }
    }

    /// Show the circulation history and copy counts
    fn history(&mut self) -> io::Result<()> {
        if self.json {
            let records: Vec<_> = self.catalog.history().records().collect();
            let stats = self.catalog.stats();
            let capacity = self.catalog.history().capacity();
            return self.print_json(
                &serde_json::json!({ "history": records, "capacity": capacity, "stats": stats }),
            );
        }

        let table = CatalogReport::history_table(self.catalog.history());
        let stats = CatalogReport::stats(&self.catalog.stats());
        writeln!(self.output, "\n{table}\n\n{stats}")
    }
}

/// Parse arguments, build the catalog and run the menu on stdin/stdout
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => CatalogConfig::from_file(path)?,
        None => CatalogConfig::default(),
    };
    if let Some(name) = args.name {
        config.name = name;
    }
    if let Some(size) = args.history_size {
        config.max_history_size = size;
    }

    // No subscriber is installed here; `EventLogger` output reaches whatever
    // subscriber an embedding process sets up and is dropped otherwise.
    let mut catalog = Catalog::new(&config);
    catalog.register_observer(Box::new(EventLogger));

    let stdin = io::stdin();
    let mut session = Session::new(catalog, stdin.lock(), io::stdout(), args.json);
    if args.verbose {
        session = session.with_echo();
    }
    session.run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Drive a session with scripted input and return everything it printed
    #[allow(clippy::expect_used)]
    fn run_script(lines: &[&str], json: bool) -> String {
        colored::control::set_override(false);
        let input = Cursor::new(lines.join("\n"));
        let mut output = Vec::new();
        Session::new(Catalog::default(), input, &mut output, json).run().expect("session runs");
        String::from_utf8(output).expect("utf-8 output")
    }

    /// Drive a verbose session, which echoes catalog changes into the output
    #[allow(clippy::expect_used)]
    fn run_verbose_script(lines: &[&str]) -> String {
        colored::control::set_override(false);
        let input = Cursor::new(lines.join("\n"));
        let mut output = Vec::new();
        Session::new(Catalog::default(), input, &mut output, false)
            .with_echo()
            .run()
            .expect("session runs");
        String::from_utf8(output).expect("utf-8 output")
    }

    /// Input lines adding the Calculus textbook
    const ADD_CALCULUS: [&str; 8] = ["1", "1", "Calculus", "Smith", "111", "Math", "MAT101", "3rd"];

    #[test]
    fn test_add_then_borrow_twice() {
        let mut script = ADD_CALCULUS.to_vec();
        script.extend(["5", "1", "Calculus", "Smith", "5", "1", "Calculus", "Smith", "8"]);
        let output = run_script(&script, false);

        assert!(output.contains("The book has been added successfully!"));
        assert!(output.contains("The book has been borrowed successfully!"));
        assert!(output.contains("ERROR: This book is not available at this time."));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_invalid_choices_are_retried() {
        let output = run_script(&["9", "2", "3", "1", "Nothing", "Nobody", "8"], false);

        assert!(output.contains("ERROR: Invalid choice; please try again."));
        assert!(output.contains("ERROR: Book was not found."));
    }

    #[test]
    fn test_non_integer_isbn_is_retried() {
        let output = run_script(
            &["1", "2", "Dune", "Herbert", "abc", "-4", "Sci-Fi", "Paul", "Arrakis", "8"],
            false,
        );

        assert!(output.contains("ERROR: ISBN must be an integer; please try again."));
        assert!(output.contains("ERROR: Negative ISBN is invalid."));
    }

    #[test]
    fn test_return_of_present_book_is_refused() {
        let mut script = ADD_CALCULUS.to_vec();
        script.extend(["6", "1", "Calculus", "Smith"]);
        let output = run_script(&script, false);

        assert!(output.contains("This book cannot be returned, as all matches are already present."));
        // input ran out without choosing Leave
        assert!(!output.contains("Goodbye!"));
    }

    #[test]
    fn test_display_as_json() {
        let mut script = ADD_CALCULUS.to_vec();
        script.extend(["4", "8"]);
        let output = run_script(&script, true);

        assert!(output.contains("\"textbooks\": ["));
        assert!(output.contains("\"title\": \"Calculus\""));
        assert!(output.contains("\"fiction_books\": []"));
    }

    #[test]
    fn test_empty_field_message_names_kind_fields() {
        let output =
            run_script(&["1", "2", "", "Herbert", "222", "Sci-Fi", "Paul", "Arrakis", "8"], false);
        assert!(output.contains("Empty title, author, genre, main character, or setting is invalid."));
    }

    #[test]
    fn test_verbose_echo_follows_each_change() {
        let mut script = ADD_CALCULUS.to_vec();
        script.extend(["5", "1", "Calculus", "Smith", "5", "1", "Calculus", "Smith", "8"]);
        let output = run_verbose_script(&script);

        let added = "LOGGER: added Textbook \"Calculus\" by Smith (ISBN 111)";
        let borrowed = "LOGGER: borrow of Textbook \"Calculus\" by Smith (ISBN 111)";
        assert_eq!(output.matches(added).count(), 1);
        // the refused second borrow echoes nothing
        assert_eq!(output.matches(borrowed).count(), 1);

        let confirmed = output.find("The book has been added successfully!");
        assert!(confirmed.is_some_and(|at| output.find(added).is_some_and(|echo| echo > at)));
    }

    #[test]
    fn test_quiet_session_has_no_echo() {
        let mut script = ADD_CALCULUS.to_vec();
        script.push("8");
        assert!(!run_script(&script, false).contains("LOGGER:"));
    }

    #[test]
    fn test_history_as_json_reports_capacity() {
        let mut script = ADD_CALCULUS.to_vec();
        script.extend(["5", "1", "Calculus", "Smith", "7", "8"]);
        let output = run_script(&script, true);

        assert!(output.contains("\"capacity\": 100"));
        assert!(output.contains("\"action\": \"Borrow\""));
    }
}
