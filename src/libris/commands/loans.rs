use crate::catalog::Library;
use crate::commands::{check_amount, CmdMessage, CmdResult};
use crate::error::{LibrisError, Result};
use crate::model::Date;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordStatusFilter {
    #[default]
    All,
    Active,
    Returned,
}

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub status: RecordStatusFilter,
    pub user_id: Option<String>,
    pub isbn: Option<String>,
}

pub fn borrow(
    library: &mut Library,
    user_id: &str,
    isbn: &str,
    borrowed_on: Date,
    due_on: Date,
) -> Result<CmdResult> {
    if due_on.day_number() < borrowed_on.day_number() {
        return Err(LibrisError::Format(format!(
            "due date {} is before borrow date {}",
            due_on.padded(),
            borrowed_on.padded()
        )));
    }
    let record = library
        .borrow_book(user_id, isbn, borrowed_on, due_on)?
        .clone();
    let remaining = library.available_copies(isbn).unwrap_or(0);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{}: {} borrowed {}, due {} ({} left on the shelf)",
        record.record_id(),
        user_id,
        isbn,
        due_on.padded(),
        remaining
    )));
    Ok(result.with_records(vec![record]))
}

pub fn return_book(
    library: &mut Library,
    record_id: &str,
    returned_on: Date,
    late_fee_per_day: f64,
) -> Result<CmdResult> {
    check_amount(late_fee_per_day)?;
    let receipt = library.return_book(record_id, returned_on, late_fee_per_day)?;
    let record = library
        .search_record(record_id)
        .cloned()
        .ok_or_else(|| LibrisError::RecordNotFound(record_id.to_string()))?;

    let mut result = CmdResult::default();
    if receipt.days_late > 0 {
        result.add_message(CmdMessage::success(format!(
            "{} returned {} day(s) late: ${:.2} fee",
            record_id, receipt.days_late, receipt.fee
        )));
        if !receipt.fee_posted {
            result.add_message(CmdMessage::warning(format!(
                "User {} is no longer registered; fee not posted",
                record.user_id()
            )));
        }
    } else {
        result.add_message(CmdMessage::success(format!("{} returned on time", record_id)));
    }
    if !receipt.book_restocked {
        result.add_message(CmdMessage::warning(format!(
            "Book {} could not be restocked",
            record.isbn()
        )));
    }
    Ok(result.with_records(vec![record]).with_receipt(receipt))
}

pub fn list(library: &Library, filter: &RecordFilter) -> Result<CmdResult> {
    let records = library
        .records()
        .iter()
        .filter(|r| match filter.status {
            RecordStatusFilter::All => true,
            RecordStatusFilter::Active => !r.is_returned(),
            RecordStatusFilter::Returned => r.is_returned(),
        })
        .filter(|r| filter.user_id.as_deref().map_or(true, |id| r.user_id() == id))
        .filter(|r| filter.isbn.as_deref().map_or(true, |isbn| r.isbn() == isbn))
        .cloned()
        .collect();

    let mut result = CmdResult::default().with_records(records);
    if result.records.is_empty() {
        result.add_message(CmdMessage::info("No matching borrow records."));
    }
    Ok(result)
}
