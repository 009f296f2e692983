use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::bail;
use colored::Colorize;
use serde::Serialize;

use shelf_sdk::{
    Book, BookId, Command as LibraryCommand, JsonDirStore, LedgerEntry, Library, LibraryConfig,
    LibraryError, LedgerReader, ProjectionBuilder, Session, UserId, CONFIG_FILE_NAME,
};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut session = open_session(cli.config, cli.data_dir)?;
    let format = cli.format;
    match cli.command {
        Command::Book(args) => match args.action {
            BookAction::Add { id, title } => {
                execute(&mut session, LibraryCommand::add_book(&id, &title)?, &format)
            }
            BookAction::List { available, issued } => {
                cmd_book_list(session.library(), available, issued, &format)
            }
        },
        Command::User(args) => match args.action {
            UserAction::Add { id, name } => {
                execute(&mut session, LibraryCommand::add_user(&id, &name)?, &format)
            }
            UserAction::List => cmd_user_list(session.library(), &format),
        },
        Command::Issue(args) => execute(
            &mut session,
            LibraryCommand::issue_book(&args.book, &args.user)?,
            &format,
        ),
        Command::Return(args) => {
            execute(&mut session, LibraryCommand::return_book(&args.book)?, &format)
        }
        Command::Ledger(args) => cmd_ledger(session.library(), args, &format),
        Command::Status(_) => cmd_status(session.library(), &format),
        Command::Verify(_) => cmd_verify(session.library(), &format),
    }
}

fn open_session(
    config: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> anyhow::Result<Session<JsonDirStore>> {
    let mut config = match config {
        Some(path) => LibraryConfig::load(&path)?,
        None => LibraryConfig::load_or_default(Path::new(CONFIG_FILE_NAME))?,
    };
    if let Some(dir) = data_dir {
        config = config.with_data_dir(dir);
    }
    tracing::debug!(data_dir = %config.data_dir.display(), "opening library");
    Ok(Session::open(config.open_store())?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn execute(
    session: &mut Session<JsonDirStore>,
    command: LibraryCommand,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let outcome = session.execute(command)?;
    match format {
        OutputFormat::Json => match outcome.record() {
            Some(record) => print_json(record),
            None => print_json(&serde_json::json!({ "message": outcome.to_string() })),
        },
        OutputFormat::Text => {
            println!("{} {}", "✓".green().bold(), outcome);
            Ok(())
        }
    }
}

fn cmd_book_list(
    library: &Library,
    available: bool,
    issued: bool,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let books: BTreeMap<&BookId, &Book> = if available {
        library.books().available().collect()
    } else if issued {
        library.books().issued().collect()
    } else {
        library.books().iter().collect()
    };

    if let OutputFormat::Json = format {
        return print_json(&books);
    }
    if books.is_empty() {
        println!("No books.");
        return Ok(());
    }
    for (id, book) in books {
        let status = match book.holder() {
            None => "available".green(),
            Some(user) => {
                let name = library.users().name_of(user).unwrap_or("?");
                format!("issued to {user} ({name})").yellow()
            }
        };
        println!("{}  {}  {}", id.as_str().bold(), book.title, status);
    }
    Ok(())
}

fn cmd_user_list(library: &Library, format: &OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Json = format {
        return print_json(library.users());
    }
    if library.users().is_empty() {
        println!("No users.");
        return Ok(());
    }
    for (id, name) in library.users().iter() {
        let on_loan = library
            .books()
            .issued()
            .filter(|(_, book)| book.holder() == Some(id))
            .count();
        println!("{}  {}  {}", id.as_str().bold(), name, format!("{on_loan} on loan").dimmed());
    }
    Ok(())
}

fn cmd_ledger(library: &Library, args: LedgerArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut entries = match (&args.book, &args.user) {
        (Some(book), _) => library.book_history(&BookId::parse(book).map_err(LibraryError::from)?)?,
        (None, Some(user)) => library.user_history(&UserId::parse(user).map_err(LibraryError::from)?)?,
        (None, None) if args.from.is_some() || args.to.is_some() => {
            let to = args.to.unwrap_or_else(|| library.ledger().len());
            library.ledger_range(args.from.unwrap_or(1), to)?
        }
        (None, None) => ProjectionBuilder::entries(library.ledger()),
    };
    if let Some(limit) = args.limit {
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
    }

    if let OutputFormat::Json = format {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }
    print!("{}", render_ledger(&entries));
    Ok(())
}

const LEDGER_HEADERS: [&str; 6] = ["#", "Book ID", "Book Title", "User ID", "User Name", "Action"];

/// Fixed-width table of ledger entries, one line per record plus a header.
pub fn render_ledger(entries: &[LedgerEntry]) -> String {
    let rows: Vec<[String; 6]> = entries
        .iter()
        .map(|e| {
            [
                e.seq.to_string(),
                e.record.book_id.to_string(),
                e.record.book_title.clone(),
                e.record.user_id.to_string(),
                e.record.user_name.clone(),
                e.record.action.to_string(),
            ]
        })
        .collect();

    let mut widths = LEDGER_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = LEDGER_HEADERS.map(String::from);
    for row in std::iter::once(&header).chain(rows.iter()) {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn cmd_status(library: &Library, format: &OutputFormat) -> anyhow::Result<()> {
    let summary = library.summary();
    if let OutputFormat::Json = format {
        return print_json(&summary);
    }

    println!(
        "Books: {} ({} available, {} issued)",
        summary.books.to_string().bold(),
        summary.available.to_string().green(),
        summary.issued.to_string().yellow()
    );
    println!("Users: {}", summary.users.to_string().bold());
    println!(
        "Ledger: {} records ({} issued, {} returned)",
        summary.ledger.records.to_string().bold(),
        summary.ledger.issued,
        summary.ledger.returned
    );
    if let Some(last) = library.ledger().last() {
        println!(
            "Last: {} '{}' ({}) by {}",
            last.action, last.book_title, last.book_id, last.user_name
        );
    }

    println!("\n{}", "Ready to issue".bold());
    if summary.available == 0 || summary.users == 0 {
        println!("  {}", "No available books or users to issue.".yellow());
    } else {
        for (id, book) in library.books().available() {
            println!("  {}  {}", id.as_str().cyan(), book.title);
        }
    }

    println!("\n{}", "On loan".bold());
    if summary.issued == 0 {
        println!("  No books currently issued.");
    } else {
        for (id, book) in library.books().issued() {
            let holder = book.holder().map(UserId::as_str).unwrap_or("?");
            println!("  {}  {} → {}", id.as_str().cyan(), book.title, holder.yellow());
        }
    }
    Ok(())
}

fn cmd_verify(library: &Library, format: &OutputFormat) -> anyhow::Result<()> {
    let report = library.verify();
    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text if report.is_valid() => {
            println!("{} Ledger verified ({} records)", "✓".green().bold(), library.ledger().len());
            println!("  Issue/return order: {}", "valid".green());
            println!("  Returns: {}", "attributed".green());
            println!("  Catalog: {}", "consistent".green());
        }
        OutputFormat::Text => {
            for v in &report.violations {
                let at = if v.seq == 0 { "catalog".to_string() } else { format!("#{}", v.seq) };
                println!("{} {:?} at {}: {}", "✗".red().bold(), v.kind, at, v.description);
            }
        }
    }
    if !report.is_valid() {
        bail!("{} integrity violation(s) found", report.violations.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use shelf_sdk::{Action, TransactionRecord};

    use super::*;

    fn entry(seq: u64, book: &str, title: &str, action: Action) -> LedgerEntry {
        let record = TransactionRecord::issued(
            BookId::parse(book).unwrap(),
            title,
            UserId::parse("U1").unwrap(),
            "Ann",
        );
        LedgerEntry {
            seq,
            record: TransactionRecord { action, ..record },
        }
    }

    #[test]
    fn ledger_table_aligns_columns() {
        let table = render_ledger(&[
            entry(1, "B1", "Dune", Action::Issued),
            entry(2, "B1", "Dune", Action::Returned),
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "#  Book ID  Book Title  User ID  User Name  Action");
        assert_eq!(lines[1], "1  B1       Dune        U1       Ann        Issued");
        assert_eq!(lines[2], "2  B1       Dune        U1       Ann        Returned");
    }

    #[test]
    fn ledger_table_widens_for_long_titles() {
        let table = render_ledger(&[entry(1, "B1", "The Left Hand of Darkness", Action::Issued)]);
        let header = table.lines().next().unwrap();
        let row = table.lines().nth(1).unwrap();
        assert_eq!(header.find("User ID"), row.find("U1"));
    }

    #[test]
    fn commands_persist_into_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().to_path_buf();
        let run = |args: &[&str]| {
            let mut argv = vec!["shelf", "--data-dir", data.to_str().unwrap()];
            argv.extend_from_slice(args);
            run_command(<Cli as clap::Parser>::try_parse_from(argv).unwrap())
        };

        run(&["book", "add", "B1", "Dune"]).unwrap();
        run(&["user", "add", "U1", "Ann"]).unwrap();
        run(&["issue", "B1", "U1"]).unwrap();

        let err = run(&["issue", "B1", "U1"]).unwrap_err();
        let lib_err = err.downcast_ref::<LibraryError>().unwrap();
        assert!(lib_err.is_warning());

        run(&["return", "B1"]).unwrap();
        run(&["verify"]).unwrap();

        let reopened = Session::open(JsonDirStore::new(&data)).unwrap();
        assert_eq!(reopened.library().ledger().len(), 2);
    }

    #[test]
    fn ledger_range_is_validated() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().to_str().unwrap();
        let run = |args: &[&str]| {
            let mut argv = vec!["shelf", "--data-dir", data];
            argv.extend_from_slice(args);
            run_command(<Cli as clap::Parser>::try_parse_from(argv).unwrap())
        };

        run(&["book", "add", "B1", "Dune"]).unwrap();
        run(&["user", "add", "U1", "Ann"]).unwrap();
        run(&["issue", "B1", "U1"]).unwrap();
        run(&["ledger", "--from", "1"]).unwrap();

        let err = run(&["ledger", "--from", "1", "--to", "5"]).unwrap_err();
        let lib_err = err.downcast_ref::<LibraryError>().unwrap();
        assert!(matches!(lib_err, LibraryError::Ledger(_)));
        assert!(lib_err.is_warning());
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("typo-shelf.toml");
        let cli = <Cli as clap::Parser>::try_parse_from([
            "shelf",
            "--config",
            missing.to_str().unwrap(),
            "status",
        ])
        .unwrap();
        let err = run_command(cli).unwrap_err();
        let lib_err = err.downcast_ref::<LibraryError>().unwrap();
        assert!(matches!(lib_err, LibraryError::Config(_)));
        assert!(!lib_err.is_warning());
    }

    #[test]
    fn blank_input_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let cli = <Cli as clap::Parser>::try_parse_from([
            "shelf",
            "--data-dir",
            dir.path().to_str().unwrap(),
            "book",
            "add",
            "B1",
            " ",
        ])
        .unwrap();
        let err = run_command(cli).unwrap_err();
        let lib_err = err.downcast_ref::<LibraryError>().unwrap();
        assert!(matches!(lib_err, LibraryError::MissingInput(_)));
        assert!(!dir.path().join("books.json").exists());
    }
}
