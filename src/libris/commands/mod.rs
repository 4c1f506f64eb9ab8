//! # Commands
//!
//! Business logic for each user-facing operation, one module per area. A command takes the
//! [`Library`](crate::catalog::Library) plus typed arguments and returns a [`CmdResult`]:
//! the entities it touched or listed and the messages a UI should show. Commands never
//! print and never touch storage; loading and saving belong to the API.

use crate::catalog::{CatalogSummary, ReturnReceipt};
use crate::config::LibrisConfig;
use crate::error::{LibrisError, Result};
use crate::model::{Book, BorrowRecord, User, DELIMITER};

pub mod books;
pub mod config;
pub mod loans;
pub mod report;
pub mod users;

#[derive(Debug, Clone, PartialEq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub books: Vec<Book>,
    pub users: Vec<User>,
    pub records: Vec<BorrowRecord>,
    pub summary: Option<CatalogSummary>,
    pub receipt: Option<ReturnReceipt>,
    pub config: Option<LibrisConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_books(mut self, books: Vec<Book>) -> Self {
        self.books = books;
        self
    }

    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = users;
        self
    }

    pub fn with_records(mut self, records: Vec<BorrowRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn with_summary(mut self, summary: CatalogSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn with_receipt(mut self, receipt: ReturnReceipt) -> Self {
        self.receipt = Some(receipt);
        self
    }

    pub fn with_config(mut self, config: LibrisConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_level(&self, level: MessageLevel) -> bool {
        self.messages.iter().any(|m| m.level == level)
    }
}

/// Money coming in from a caller: charges, payments and per-day late fees.
pub(crate) fn check_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(LibrisError::Format(format!(
            "amount must be a non-negative number: {}",
            amount
        )));
    }
    Ok(())
}

/// Text stored as one field of a collection line. The files have no escaping.
pub(crate) fn check_field(name: &str, value: &str) -> Result<()> {
    if value.contains([DELIMITER, '\n', '\r']) {
        return Err(LibrisError::Format(format!(
            "{} must not contain '{}' or line breaks: \"{}\"",
            name,
            DELIMITER,
            value.escape_debug()
        )));
    }
    Ok(())
}

/// A field that identifies an entity: non-blank as well as storable.
pub(crate) fn check_key(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LibrisError::Format(format!("{} must not be empty", name)));
    }
    check_field(name, value)
}
