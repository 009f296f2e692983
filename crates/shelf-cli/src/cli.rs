use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "shelf",
    about = "Shelf — library book issuing ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Directory holding books.json, users.json and ledger.json
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to ./shelf.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add or list books
    Book(BookArgs),
    /// Add or list users
    User(UserArgs),
    /// Issue an available book to a user
    Issue(IssueArgs),
    /// Return an issued book
    Return(ReturnArgs),
    /// Show the transaction ledger
    Ledger(LedgerArgs),
    /// Show counts and what can be issued or returned
    Status(StatusArgs),
    /// Check the ledger against the catalog
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct BookArgs {
    #[command(subcommand)]
    pub action: BookAction,
}

#[derive(Subcommand)]
pub enum BookAction {
    /// Add a book to the catalog
    Add { id: String, title: String },
    /// List books
    List {
        /// Only books on the shelf
        #[arg(long, conflicts_with = "issued")]
        available: bool,
        /// Only books on loan
        #[arg(long)]
        issued: bool,
    },
}

#[derive(Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub action: UserAction,
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Register a user
    Add { id: String, name: String },
    /// List users
    List,
}

#[derive(Args)]
pub struct IssueArgs {
    pub book: String,
    pub user: String,
}

#[derive(Args)]
pub struct ReturnArgs {
    pub book: String,
}

#[derive(Args)]
pub struct LedgerArgs {
    /// Show only the most recent N records
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    /// First sequence number to show (1-based)
    #[arg(long, conflicts_with_all = ["book", "user"])]
    pub from: Option<u64>,
    /// Last sequence number to show
    #[arg(long, conflicts_with_all = ["book", "user"])]
    pub to: Option<u64>,
    /// Only records for this book
    #[arg(long, conflicts_with = "user")]
    pub book: Option<String>,
    /// Only records for this user
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Args)]
pub struct VerifyArgs {}
