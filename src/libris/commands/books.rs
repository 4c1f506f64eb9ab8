use crate::catalog::Library;
use crate::commands::{check_field, check_key, CmdMessage, CmdResult};
use crate::error::{LibrisError, Result};
use crate::model::Book;

pub fn add(library: &mut Library, book: Book) -> Result<CmdResult> {
    check_key("isbn", book.isbn())?;
    check_field("title", book.title())?;
    check_field("author", book.author())?;
    library.add_book(book.clone())?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Book added: {} ({})",
        book.title(),
        book.isbn()
    )));
    Ok(result.with_books(vec![book]))
}

/// Removes a title. Open loans on it are left in place and reported as a warning.
pub fn remove(library: &mut Library, isbn: &str) -> Result<CmdResult> {
    let open_loans = library.active_loans_for_book(isbn);
    let book = library.remove_book(isbn)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Book removed: {} ({})",
        book.title(),
        book.isbn()
    )));
    if open_loans > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} open loan(s) still reference {}",
            open_loans, isbn
        )));
    }
    Ok(result.with_books(vec![book]))
}

pub fn show(library: &Library, isbn: &str) -> Result<CmdResult> {
    let book = library
        .search_book(isbn)
        .ok_or_else(|| LibrisError::BookNotFound(isbn.to_string()))?;
    Ok(CmdResult::default().with_books(vec![book.clone()]))
}

pub fn list(library: &Library) -> Result<CmdResult> {
    let mut result = CmdResult::default().with_books(library.books().to_vec());
    if result.books.is_empty() {
        result.add_message(CmdMessage::info("No books in the catalog."));
    }
    Ok(result)
}

pub fn restock(library: &mut Library, isbn: &str, copies: u32) -> Result<CmdResult> {
    let book = library.add_copies(isbn, copies)?.clone();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Added {} copies of {}: {}/{} available",
        copies,
        book.isbn(),
        book.copies_available(),
        book.copies_total()
    )));
    Ok(result.with_books(vec![book]))
}
