use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "libris")]
#[command(about = "Catalog books, patrons and loans for a small library", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the catalog files (defaults to $LIBRIS_HOME, then the platform data dir)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print listings as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage books
    #[command(subcommand)]
    Book(BookCommand),

    /// Manage users
    #[command(subcommand)]
    User(UserCommand),

    /// Lend a copy of a book to a user
    Borrow {
        user_id: String,
        isbn: String,

        /// Borrow date as Y-M-D (defaults to today)
        #[arg(long)]
        on: Option<String>,

        /// Due date as Y-M-D (defaults to the configured loan period)
        #[arg(long)]
        due: Option<String>,
    },

    /// Close a loan and post any late fee
    Return {
        record_id: String,

        /// Return date as Y-M-D (defaults to today)
        #[arg(long)]
        on: Option<String>,

        /// Late fee per day (defaults to the configured rate)
        #[arg(long)]
        fee: Option<f64>,
    },

    /// List borrow records
    #[command(alias = "ls")]
    Records(RecordArgs),

    /// Show catalog totals
    Report,

    /// Show how many copies of a book are on the shelf
    Available { isbn: String },

    /// Get or set configuration
    Config {
        /// Configuration key (late-fee, loan-days, books-file, users-file, records-file)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookCommand {
    /// Add a new title
    Add {
        isbn: String,
        title: String,
        author: String,
        year: u32,
        copies: u32,
    },

    /// Remove a title
    #[command(alias = "rm")]
    Remove { isbn: String },

    /// Show one title
    Show { isbn: String },

    /// List every title
    #[command(alias = "ls")]
    List,

    /// Add copies to an existing title
    Restock { isbn: String, copies: u32 },
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Register a user (plain patron unless --student or --teacher is given)
    Add {
        id: String,
        name: String,

        /// Register as a student with this major
        #[arg(long, conflicts_with = "teacher")]
        student: Option<String>,

        /// Register as a teacher in this department
        #[arg(long)]
        teacher: Option<String>,
    },

    /// Remove a user
    #[command(alias = "rm")]
    Remove { id: String },

    /// Show one user
    Show { id: String },

    /// List every user
    #[command(alias = "ls")]
    List,

    /// Add a manual charge to a user's balance
    Charge { id: String, amount: f64 },

    /// Record a payment against a user's balance
    Pay { id: String, amount: f64 },
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Only loans that are still open
    #[arg(long, conflicts_with = "returned")]
    pub active: bool,

    /// Only loans that have been returned
    #[arg(long)]
    pub returned: bool,

    /// Only loans for this user
    #[arg(long)]
    pub user: Option<String>,

    /// Only loans of this book
    #[arg(long)]
    pub isbn: Option<String>,
}
