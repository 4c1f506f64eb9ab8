//! # Domain Model
//!
//! The three record entities the catalog owns: [`Book`], [`User`] and [`BorrowRecord`],
//! plus the approximate [`Date`] triple loans are stamped with.
//!
//! Every entity knows how to turn itself into one line of a collection file and back,
//! through the [`LineCodec`] trait. The formats are comma separated with no escaping, so
//! text fields must not contain the delimiter:
//!
//! ```text
//! books.csv    isbn,title,author,year,copiesTotal,copiesAvailable
//! users.csv    STUDENT,id,name,major,fees
//!              TEACHER,id,name,department,fees
//!              USER,id,name,STUDENT|TEACHER|OTHER,fees
//! records.csv  id,user,isbn,Y-M-D,Y-M-D,RETURNED,Y-M-D
//!              id,user,isbn,Y-M-D,Y-M-D,NOT_RETURNED
//! ```
//!
//! Entities hold no references to each other. A record names its user and book by key and
//! the catalog resolves those keys when it needs them.

use crate::error::{LibrisError, Result};
use std::str::{FromStr, Split};

pub mod book;
pub mod date;
pub mod record;
pub mod user;

pub use book::Book;
pub use date::Date;
pub use record::{BorrowRecord, LoanState};
pub use user::{Profile, User, UserType};

pub const DELIMITER: char = ',';

/// One-line text encoding used by the collection files.
pub trait LineCodec: Sized {
    fn encode(&self) -> String;

    fn decode(line: &str) -> Result<Self>;
}

/// Cursor over the delimited fields of a single line.
pub(crate) struct Fields<'a> {
    line: &'a str,
    parts: Split<'a, char>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(line: &'a str) -> Self {
        Self {
            line,
            parts: line.split(DELIMITER),
        }
    }

    /// Next field, which must be present.
    pub(crate) fn text(&mut self, name: &str) -> Result<&'a str> {
        self.parts
            .next()
            .ok_or_else(|| self.error(format!("missing {}", name)))
    }

    /// Next field parsed as a number; `None` when the line has run out of fields.
    pub(crate) fn number<T: FromStr>(&mut self, name: &str) -> Result<Option<T>> {
        match self.parts.next() {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| self.error(format!("invalid {} '{}'", name, raw))),
        }
    }

    pub(crate) fn date(&mut self, name: &str) -> Result<Date> {
        let raw = self.text(name)?;
        raw.parse()
            .map_err(|_| self.error(format!("invalid {} '{}'", name, raw)))
    }

    pub(crate) fn error(&self, reason: String) -> LibrisError {
        LibrisError::Format(format!("{} in line '{}'", reason, self.line))
    }
}
