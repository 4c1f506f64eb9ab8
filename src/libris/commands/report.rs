use crate::catalog::Library;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{LibrisError, Result};

pub fn summary(library: &Library) -> Result<CmdResult> {
    Ok(CmdResult::default().with_summary(library.summary()))
}

pub fn availability(library: &Library, isbn: &str) -> Result<CmdResult> {
    let available = library
        .available_copies(isbn)
        .ok_or_else(|| LibrisError::BookNotFound(isbn.to_string()))?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "{}: {} cop{} available",
        isbn,
        available,
        if available == 1 { "y" } else { "ies" }
    )));
    Ok(result)
}
