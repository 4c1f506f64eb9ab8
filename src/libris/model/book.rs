use super::{Fields, LineCodec, DELIMITER};
use crate::error::{LibrisError, Result};
use serde::Serialize;
use std::fmt;

/// A catalog title and its copy counters.
///
/// `copies_available` never exceeds `copies_total`; the counters only move through
/// [`Book::borrow_one`], [`Book::return_one`] and [`Book::add_copies`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    isbn: String,
    title: String,
    author: String,
    year: u32,
    copies_total: u32,
    copies_available: u32,
}

impl Book {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        year: u32,
        copies_total: u32,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            year,
            copies_total,
            copies_available: copies_total,
        }
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn copies_total(&self) -> u32 {
        self.copies_total
    }

    pub fn copies_available(&self) -> u32 {
        self.copies_available
    }

    /// Adds `n` copies to the shelf. Returns false, leaving the counters alone, when the
    /// total would overflow.
    pub fn add_copies(&mut self, n: u32) -> bool {
        match self.copies_total.checked_add(n) {
            Some(total) => {
                self.copies_total = total;
                self.copies_available += n;
                true
            }
            None => false,
        }
    }

    /// Takes one copy off the shelf. Returns false, leaving the counters alone, when none
    /// is available.
    pub fn borrow_one(&mut self) -> bool {
        if self.copies_available == 0 {
            return false;
        }
        self.copies_available -= 1;
        true
    }

    /// Puts one copy back. Returns false when every copy is already on the shelf.
    pub fn return_one(&mut self) -> bool {
        if self.copies_available < self.copies_total {
            self.copies_available += 1;
            return true;
        }
        false
    }
}

impl LineCodec for Book {
    fn encode(&self) -> String {
        [
            self.isbn.clone(),
            self.title.clone(),
            self.author.clone(),
            self.year.to_string(),
            self.copies_total.to_string(),
            self.copies_available.to_string(),
        ]
        .join(&DELIMITER.to_string())
    }

    /// Missing trailing numbers read as 0. Available copies come from their own field.
    fn decode(line: &str) -> Result<Self> {
        let mut fields = Fields::new(line);
        let isbn = fields.text("isbn")?;
        if isbn.is_empty() {
            return Err(fields.error("empty isbn".to_string()));
        }
        let title = fields.text("title")?;
        let author = fields.text("author")?;
        let year = fields.number("year")?.unwrap_or(0);
        let copies_total = fields.number("copies total")?.unwrap_or(0);
        let copies_available = fields.number("copies available")?.unwrap_or(0);

        if copies_available > copies_total {
            return Err(LibrisError::Format(format!(
                "{} available copies exceed {} total in line '{}'",
                copies_available, copies_total, line
            )));
        }

        let mut book = Book::new(isbn, title, author, year, copies_total);
        book.copies_available = copies_available;
        Ok(book)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ISBN: {}", self.isbn)?;
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "Year: {}", self.year)?;
        writeln!(f, "Total Copies: {}", self.copies_total)?;
        write!(f, "Available Copies: {}", self.copies_available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Book {
        Book::new("978-0", "Dune", "Frank Herbert", 1965, 2)
    }

    #[test]
    fn new_book_has_every_copy_available() {
        let book = sample();
        assert_eq!(book.copies_total(), 2);
        assert_eq!(book.copies_available(), 2);
    }

    #[test]
    fn borrow_fails_when_shelf_is_empty() {
        let mut book = sample();
        assert!(book.borrow_one());
        assert!(book.borrow_one());
        assert!(!book.borrow_one());
        assert_eq!(book.copies_available(), 0);
        assert_eq!(book.copies_total(), 2);
    }

    #[test]
    fn return_fails_when_shelf_is_full() {
        let mut book = sample();
        assert!(!book.return_one());
        assert_eq!(book.copies_available(), 2);

        book.borrow_one();
        assert!(book.return_one());
        assert!(!book.return_one());
        assert_eq!(book.copies_available(), 2);
    }

    #[test]
    fn add_copies_moves_both_counters() {
        let mut book = sample();
        book.borrow_one();
        assert!(book.add_copies(3));
        assert_eq!(book.copies_total(), 5);
        assert_eq!(book.copies_available(), 4);

        assert!(book.add_copies(0));
        assert_eq!(book.copies_total(), 5);
    }

    #[test]
    fn add_copies_refuses_to_overflow() {
        let mut book = sample();
        book.borrow_one();
        assert!(!book.add_copies(u32::MAX));
        assert_eq!(book.copies_total(), 2);
        assert_eq!(book.copies_available(), 1);

        assert!(book.add_copies(u32::MAX - 2));
        assert_eq!(book.copies_total(), u32::MAX);
        assert_eq!(book.copies_available(), u32::MAX - 1);
    }

    #[test]
    fn counters_stay_in_bounds_across_mixed_operations() {
        let mut book = Book::new("1", "T", "A", 2000, 1);
        let ops = [0, 0, 1, 1, 2, 0, 0, 0, 1, 1, 1, 1];
        for op in ops {
            match op {
                0 => {
                    book.borrow_one();
                }
                1 => {
                    book.return_one();
                }
                _ => {
                    book.add_copies(1);
                }
            }
            assert!(book.copies_available() <= book.copies_total());
        }
    }

    #[test]
    fn encodes_six_fields() {
        let mut book = sample();
        book.borrow_one();
        assert_eq!(book.encode(), "978-0,Dune,Frank Herbert,1965,2,1");
    }

    #[test]
    fn decode_restores_every_field() {
        let mut book = sample();
        book.borrow_one();
        let decoded = Book::decode(&book.encode()).unwrap();
        assert_eq!(decoded, book);
        assert_eq!(decoded.copies_available(), 1);
    }

    #[test]
    fn decode_defaults_missing_numbers_to_zero() {
        let book = Book::decode("978-0,Dune,Frank Herbert,1965").unwrap();
        assert_eq!(book.year(), 1965);
        assert_eq!(book.copies_total(), 0);
        assert_eq!(book.copies_available(), 0);

        let bare = Book::decode("978-0,Dune,Frank Herbert").unwrap();
        assert_eq!(bare.year(), 0);
    }

    #[test]
    fn decode_rejects_malformed_lines() {
        assert!(Book::decode("just-an-isbn").is_err());
        assert!(Book::decode("978-0,Dune,Herbert,nineteen").is_err());
        assert!(Book::decode(",Dune,Herbert,1965,1,1").is_err());
        assert!(Book::decode("978-0,Dune,Herbert,1965,1,2").is_err());
    }

    #[test]
    fn display_lists_fields() {
        let text = sample().to_string();
        assert!(text.contains("Title: Dune"));
        assert!(text.contains("Available Copies: 2"));
    }
}
