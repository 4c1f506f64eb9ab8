use super::{Date, Fields, LineCodec, DELIMITER};
use crate::error::Result;
use serde::Serialize;
use std::fmt;

const RETURNED: &str = "RETURNED";
const NOT_RETURNED: &str = "NOT_RETURNED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "returned_on", rename_all = "lowercase")]
pub enum LoanState {
    Active,
    Returned(Date),
}

/// One loan of one copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorrowRecord {
    record_id: String,
    user_id: String,
    isbn: String,
    borrowed_on: Date,
    due_on: Date,
    state: LoanState,
}

impl BorrowRecord {
    pub fn new(
        record_id: impl Into<String>,
        user_id: impl Into<String>,
        isbn: impl Into<String>,
        borrowed_on: Date,
        due_on: Date,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            user_id: user_id.into(),
            isbn: isbn.into(),
            borrowed_on,
            due_on,
            state: LoanState::Active,
        }
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn borrowed_on(&self) -> Date {
        self.borrowed_on
    }

    pub fn due_on(&self) -> Date {
        self.due_on
    }

    pub fn state(&self) -> LoanState {
        self.state
    }

    pub fn is_returned(&self) -> bool {
        matches!(self.state, LoanState::Returned(_))
    }

    pub fn returned_on(&self) -> Option<Date> {
        match self.state {
            LoanState::Returned(date) => Some(date),
            LoanState::Active => None,
        }
    }

    /// Closes the loan. The record does not refuse a second call; the catalog does.
    pub fn mark_returned(&mut self, date: Date) {
        self.state = LoanState::Returned(date);
    }

    /// Approximate days past due at return, 0 while the loan is open.
    pub fn days_late(&self) -> i64 {
        match self.state {
            LoanState::Active => 0,
            LoanState::Returned(date) => self.due_on.days_until(&date).max(0),
        }
    }
}

impl LineCodec for BorrowRecord {
    fn encode(&self) -> String {
        let mut fields = vec![
            self.record_id.clone(),
            self.user_id.clone(),
            self.isbn.clone(),
            self.borrowed_on.to_string(),
            self.due_on.to_string(),
        ];
        match self.state {
            LoanState::Returned(date) => {
                fields.push(RETURNED.to_string());
                fields.push(date.to_string());
            }
            LoanState::Active => fields.push(NOT_RETURNED.to_string()),
        }
        fields.join(&DELIMITER.to_string())
    }

    fn decode(line: &str) -> Result<Self> {
        let mut fields = Fields::new(line);
        let record_id = fields.text("record id")?;
        let user_id = fields.text("user id")?;
        let isbn = fields.text("isbn")?;
        let borrowed_on = fields.date("borrowed date")?;
        let due_on = fields.date("due date")?;

        let mut record = BorrowRecord::new(record_id, user_id, isbn, borrowed_on, due_on);
        match fields.text("return flag")? {
            RETURNED => record.mark_returned(fields.date("return date")?),
            NOT_RETURNED => {}
            other => return Err(fields.error(format!("unknown return flag '{}'", other))),
        }
        Ok(record)
    }
}

impl fmt::Display for BorrowRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<18}{}", "Record ID:", self.record_id)?;
        writeln!(f, "{:<18}{}", "User ID:", self.user_id)?;
        writeln!(f, "{:<18}{}", "ISBN:", self.isbn)?;
        writeln!(f, "{:<18}{}", "Borrowed Date:", self.borrowed_on.padded())?;
        writeln!(f, "{:<18}{}", "Due Date:", self.due_on.padded())?;
        match self.state {
            LoanState::Returned(date) => {
                writeln!(f, "{:<18}YES", "Returned:")?;
                writeln!(f, "{:<18}{}", "Return Date:", date.padded())?;
            }
            LoanState::Active => {
                writeln!(f, "{:<18}NO", "Returned:")?;
                writeln!(f, "{:<18}N/A", "Return Date:")?;
            }
        }
        write!(f, "{:<18}{}", "Days Late:", self.days_late())
    }
}
