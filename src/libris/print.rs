use colored::Colorize;
use libris::api::{CatalogSummary, MessageLevel};
use libris::commands::CmdMessage;
use libris::model::{Book, BorrowRecord, LoanState, Profile, User};
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TITLE_WIDTH: usize = 32;
const NAME_WIDTH: usize = 24;
const SEPARATOR: &str = "--------------------------------------------------";

pub(crate) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// Load and save diagnostics go to stderr so listings stay clean.
pub(crate) fn eprint_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
            _ => eprintln!("{}", message.content),
        }
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> libris::error::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_full<T: std::fmt::Display>(items: &[T]) {
    for item in items {
        println!("{}", SEPARATOR);
        println!("{}", item);
    }
    if !items.is_empty() {
        println!("{}", SEPARATOR);
    }
}

pub(crate) fn print_books(books: &[Book]) {
    if books.is_empty() {
        return;
    }
    println!(
        "{}",
        format!(
            "{:<16}{}{:<6}{}",
            "ISBN",
            pad("Title", TITLE_WIDTH),
            "Year",
            "Shelf"
        )
        .bold()
    );
    for book in books {
        let shelf = format!("{}/{}", book.copies_available(), book.copies_total());
        let shelf = if book.copies_available() == 0 {
            shelf.red()
        } else {
            shelf.normal()
        };
        println!(
            "{:<16}{}{:<6}{}",
            book.isbn(),
            pad(&format!("{} ({})", book.title(), book.author()), TITLE_WIDTH),
            book.year(),
            shelf
        );
    }
}

pub(crate) fn print_users(users: &[User]) {
    if users.is_empty() {
        return;
    }
    println!(
        "{}",
        format!("{:<12}{}{:<10}{:>10}", "ID", pad("Name", NAME_WIDTH), "Type", "Fees").bold()
    );
    for user in users {
        let detail = match user.profile() {
            Profile::Student { major } => format!("{} ({})", user.name(), major),
            Profile::Teacher { department } => format!("{} ({})", user.name(), department),
            Profile::Base { .. } => user.name().to_string(),
        };
        let fees = format!("{:>10}", format!("${:.2}", user.fees_due()));
        let fees = if user.fees_due() > 0.0 {
            fees.yellow()
        } else {
            fees.normal()
        };
        println!(
            "{:<12}{}{:<10}{}",
            user.id(),
            pad(&detail, NAME_WIDTH),
            user.user_type().label(),
            fees
        );
    }
}

pub(crate) fn print_records(records: &[BorrowRecord]) {
    if records.is_empty() {
        return;
    }
    println!(
        "{}",
        format!(
            "{:<8}{:<12}{:<16}{:<12}{:<12}{}",
            "Record", "User", "ISBN", "Borrowed", "Due", "Status"
        )
        .bold()
    );
    for record in records {
        let status = match record.state() {
            LoanState::Active => "on loan".yellow(),
            LoanState::Returned(date) if record.days_late() > 0 => format!(
                "returned {} ({} late)",
                date.padded(),
                record.days_late()
            )
            .red(),
            LoanState::Returned(date) => format!("returned {}", date.padded()).normal(),
        };
        println!(
            "{:<8}{:<12}{:<16}{:<12}{:<12}{}",
            record.record_id(),
            record.user_id(),
            record.isbn(),
            record.borrowed_on().padded(),
            record.due_on().padded(),
            status
        );
    }
}

pub(crate) fn print_summary(summary: &CatalogSummary) {
    println!("Total Books: {}", summary.total_books);
    println!("Total Users: {}", summary.total_users);
    println!("Borrowed Books: {}", summary.borrowed_count);
    println!("Fees Outstanding: ${:.2}", summary.fees_outstanding);
}

/// Pads or truncates to a display width, leaving one column of space.
fn pad(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut current = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if current + w > width.saturating_sub(2) {
            out.push('…');
            current += 1;
            break;
        }
        out.push(c);
        current += w;
    }
    let padding = width.saturating_sub(out.width().max(current));
    format!("{}{}", out, " ".repeat(padding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_fills_to_width() {
        assert_eq!(pad("abc", 6), "abc   ");
    }

    #[test]
    fn pad_truncates_long_text() {
        let padded = pad("a very long title indeed", 10);
        assert_eq!(padded.width(), 10);
        assert!(padded.contains('…'));
    }
}
