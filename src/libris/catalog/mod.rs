//! # Catalog
//!
//! [`Library`] is the aggregate that owns every book, user and borrow record. It is the
//! only place the three collections meet: records name their user and book by key, and
//! the library resolves those keys by linear scan when an operation needs them.
//!
//! ## Loan lifecycle
//!
//! ```text
//! borrow_book ──► Active ──return_book──► Returned
//!   book.borrow_one()        book.return_one()        (best effort)
//!   new REC<n> record        user.add_fees(late fee)  (best effort)
//! ```
//!
//! A returned record is final; a second return fails with `AlreadyReturned`.
//!
//! Removing a book or user does not look at open loans. Callers that care can ask
//! [`Library::active_loans_for_book`] / [`Library::active_loans_for_user`] first.

use crate::error::{LibrisError, Result};
use crate::model::{Book, BorrowRecord, Date, User};
use serde::Serialize;

pub mod persist;

pub use persist::{LoadReport, ParseFailure};

const RECORD_PREFIX: &str = "REC";

#[derive(Debug, Default)]
pub struct Library {
    books: Vec<Book>,
    users: Vec<User>,
    records: Vec<BorrowRecord>,
}

/// Outcome of a successful return.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnReceipt {
    pub record_id: String,
    pub days_late: i64,
    pub fee: f64,
    /// False when the book is gone from the catalog or was already fully shelved.
    pub book_restocked: bool,
    /// False when no fee was due or the user is gone from the catalog.
    pub fee_posted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub total_books: usize,
    pub total_users: usize,
    pub borrowed_count: usize,
    pub fees_outstanding: f64,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn records(&self) -> &[BorrowRecord] {
        &self.records
    }

    // --- Books ---

    pub fn add_book(&mut self, book: Book) -> Result<()> {
        if self.search_book(book.isbn()).is_some() {
            return Err(LibrisError::DuplicateBook(book.isbn().to_string()));
        }
        self.books.push(book);
        Ok(())
    }

    pub fn remove_book(&mut self, isbn: &str) -> Result<Book> {
        let pos = self
            .books
            .iter()
            .position(|b| b.isbn() == isbn)
            .ok_or_else(|| LibrisError::BookNotFound(isbn.to_string()))?;
        Ok(self.books.remove(pos))
    }

    pub fn search_book(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.isbn() == isbn)
    }

    pub fn search_book_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.isbn() == isbn)
    }

    /// Adds `n` copies to an existing title. Returns the updated book.
    pub fn add_copies(&mut self, isbn: &str, n: u32) -> Result<&Book> {
        let book = self
            .search_book_mut(isbn)
            .ok_or_else(|| LibrisError::BookNotFound(isbn.to_string()))?;
        if !book.add_copies(n) {
            return Err(LibrisError::TooManyCopies {
                isbn: isbn.to_string(),
                requested: n,
            });
        }
        Ok(book)
    }

    // --- Users ---

    pub fn add_user(&mut self, user: User) -> Result<()> {
        if self.search_user(user.id()).is_some() {
            return Err(LibrisError::DuplicateUser(user.id().to_string()));
        }
        self.users.push(user);
        Ok(())
    }

    pub fn remove_user(&mut self, id: &str) -> Result<User> {
        let pos = self
            .users
            .iter()
            .position(|u| u.id() == id)
            .ok_or_else(|| LibrisError::UserNotFound(id.to_string()))?;
        Ok(self.users.remove(pos))
    }

    pub fn search_user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id() == id)
    }

    pub fn search_user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id() == id)
    }

    /// Posts a manual charge to a user's balance.
    pub fn charge_fees(&mut self, user_id: &str, amount: f64) -> Result<&User> {
        let user = self
            .search_user_mut(user_id)
            .ok_or_else(|| LibrisError::UserNotFound(user_id.to_string()))?;
        user.add_fees(amount);
        Ok(user)
    }

    pub fn pay_fees(&mut self, user_id: &str, amount: f64) -> Result<&User> {
        let user = self
            .search_user_mut(user_id)
            .ok_or_else(|| LibrisError::UserNotFound(user_id.to_string()))?;
        user.pay_fees(amount)?;
        Ok(user)
    }

    // --- Loans ---

    pub fn search_record(&self, record_id: &str) -> Option<&BorrowRecord> {
        self.records.iter().find(|r| r.record_id() == record_id)
    }

    /// Lends one copy of `isbn` to `user_id` and returns the new record.
    pub fn borrow_book(
        &mut self,
        user_id: &str,
        isbn: &str,
        borrowed_on: Date,
        due_on: Date,
    ) -> Result<&BorrowRecord> {
        if self.search_user(user_id).is_none() {
            return Err(LibrisError::UserNotFound(user_id.to_string()));
        }
        let book = self
            .search_book_mut(isbn)
            .ok_or_else(|| LibrisError::BookNotFound(isbn.to_string()))?;
        if !book.borrow_one() {
            return Err(LibrisError::NoCopiesAvailable(isbn.to_string()));
        }

        let record_id = self.next_record_id();
        let record = BorrowRecord::new(record_id, user_id, isbn, borrowed_on, due_on);
        self.records.push(record);
        let index = self.records.len() - 1;
        Ok(&self.records[index])
    }

    /// Closes a loan, restocks the book and posts any late fee.
    ///
    /// Only the record has to exist. A book or user removed since the loan was opened is
    /// skipped, and the receipt says which side effects happened.
    pub fn return_book(
        &mut self,
        record_id: &str,
        returned_on: Date,
        late_fee_per_day: f64,
    ) -> Result<ReturnReceipt> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.record_id() == record_id)
            .ok_or_else(|| LibrisError::RecordNotFound(record_id.to_string()))?;
        if record.is_returned() {
            return Err(LibrisError::AlreadyReturned(record_id.to_string()));
        }
        record.mark_returned(returned_on);

        let days_late = record.days_late();
        let isbn = record.isbn().to_string();
        let user_id = record.user_id().to_string();

        let book_restocked = self
            .search_book_mut(&isbn)
            .map(Book::return_one)
            .unwrap_or(false);

        let fee = days_late as f64 * late_fee_per_day;
        let mut fee_posted = false;
        if days_late > 0 {
            if let Some(user) = self.search_user_mut(&user_id) {
                user.add_fees(fee);
                fee_posted = true;
            }
        }

        Ok(ReturnReceipt {
            record_id: record_id.to_string(),
            days_late,
            fee,
            book_restocked,
            fee_posted,
        })
    }

    pub fn active_loans_for_book(&self, isbn: &str) -> usize {
        self.active_records().filter(|r| r.isbn() == isbn).count()
    }

    pub fn active_loans_for_user(&self, user_id: &str) -> usize {
        self.active_records()
            .filter(|r| r.user_id() == user_id)
            .count()
    }

    pub fn active_records(&self) -> impl Iterator<Item = &BorrowRecord> {
        self.records.iter().filter(|r| !r.is_returned())
    }

    // --- Reporting ---

    pub fn total_books(&self) -> usize {
        self.books.len()
    }

    pub fn total_users(&self) -> usize {
        self.users.len()
    }

    /// Number of loans still open.
    pub fn borrowed_count(&self) -> usize {
        self.active_records().count()
    }

    pub fn available_copies(&self, isbn: &str) -> Option<u32> {
        self.search_book(isbn).map(Book::copies_available)
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            total_books: self.total_books(),
            total_users: self.total_users(),
            borrowed_count: self.borrowed_count(),
            fees_outstanding: self.users.iter().map(User::fees_due).sum(),
        }
    }

    /// `REC` followed by the count of records ever created, skipping any id a hand-edited
    /// records file may already use.
    fn next_record_id(&self) -> String {
        let mut n = self.records.len() + 1;
        loop {
            let id = format!("{}{}", RECORD_PREFIX, n);
            if self.search_record(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Library {
        let mut lib = Library::new();
        lib.add_book(Book::new("ISBN1", "T", "A", 2020, 2)).unwrap();
        lib.add_user(User::other("U1", "Name")).unwrap();
        lib
    }

    #[test]
    fn borrow_and_late_return_end_to_end() {
        let mut lib = library();

        let record = lib
            .borrow_book(
                "U1",
                "ISBN1",
                Date::new(2025, 1, 1),
                Date::new(2025, 1, 10),
            )
            .unwrap();
        assert_eq!(record.record_id(), "REC1");
        assert!(!record.is_returned());
        assert_eq!(lib.available_copies("ISBN1"), Some(1));
        assert_eq!(lib.borrowed_count(), 1);

        let receipt = lib.return_book("REC1", Date::new(2025, 1, 15), 1.0).unwrap();
        assert_eq!(receipt.days_late, 5);
        assert_eq!(receipt.fee, 5.0);
        assert!(receipt.book_restocked);
        assert!(receipt.fee_posted);

        assert_eq!(lib.available_copies("ISBN1"), Some(2));
        assert_eq!(lib.search_record("REC1").unwrap().days_late(), 5);
        assert_eq!(lib.search_user("U1").unwrap().fees_due(), 5.0);
        assert_eq!(lib.borrowed_count(), 0);
    }

    #[test]
    fn duplicate_keys_are_rejected_and_existing_entries_kept() {
        let mut lib = library();

        let err = lib
            .add_book(Book::new("ISBN1", "Other", "B", 1999, 9))
            .unwrap_err();
        assert!(matches!(err, LibrisError::DuplicateBook(_)));
        assert_eq!(lib.search_book("ISBN1").unwrap().title(), "T");
        assert_eq!(lib.total_books(), 1);

        let err = lib.add_user(User::student("U1", "Someone", "Art")).unwrap_err();
        assert!(matches!(err, LibrisError::DuplicateUser(_)));
        assert_eq!(lib.search_user("U1").unwrap().name(), "Name");
        assert_eq!(lib.total_users(), 1);
    }

    #[test]
    fn remove_requires_existing_key() {
        let mut lib = library();
        assert!(matches!(
            lib.remove_book("nope"),
            Err(LibrisError::BookNotFound(_))
        ));
        assert_eq!(lib.remove_book("ISBN1").unwrap().isbn(), "ISBN1");
        assert_eq!(lib.total_books(), 0);

        assert!(matches!(
            lib.remove_user("nope"),
            Err(LibrisError::UserNotFound(_))
        ));
        assert_eq!(lib.remove_user("U1").unwrap().id(), "U1");
        assert_eq!(lib.total_users(), 0);
    }

    #[test]
    fn borrow_fails_for_missing_keys_or_empty_shelf() {
        let mut lib = library();
        let (b, d) = (Date::new(2025, 1, 1), Date::new(2025, 1, 10));

        assert!(matches!(
            lib.borrow_book("ghost", "ISBN1", b, d),
            Err(LibrisError::UserNotFound(_))
        ));
        assert!(matches!(
            lib.borrow_book("U1", "ghost", b, d),
            Err(LibrisError::BookNotFound(_))
        ));

        lib.borrow_book("U1", "ISBN1", b, d).unwrap();
        lib.borrow_book("U1", "ISBN1", b, d).unwrap();
        assert!(matches!(
            lib.borrow_book("U1", "ISBN1", b, d),
            Err(LibrisError::NoCopiesAvailable(_))
        ));
        assert_eq!(lib.available_copies("ISBN1"), Some(0));
        assert_eq!(lib.records().len(), 2);
    }

    #[test]
    fn record_ids_are_sequential() {
        let mut lib = library();
        let (b, d) = (Date::new(2025, 1, 1), Date::new(2025, 1, 10));
        lib.borrow_book("U1", "ISBN1", b, d).unwrap();
        lib.return_book("REC1", d, 0.0).unwrap();
        let second = lib.borrow_book("U1", "ISBN1", b, d).unwrap();
        assert_eq!(second.record_id(), "REC2");
    }

    #[test]
    fn second_return_fails() {
        let mut lib = library();
        lib.borrow_book(
            "U1",
            "ISBN1",
            Date::new(2025, 1, 1),
            Date::new(2025, 1, 10),
        )
        .unwrap();
        lib.return_book("REC1", Date::new(2025, 1, 20), 1.0).unwrap();

        let err = lib
            .return_book("REC1", Date::new(2025, 2, 20), 1.0)
            .unwrap_err();
        assert!(matches!(err, LibrisError::AlreadyReturned(_)));
        assert_eq!(lib.search_user("U1").unwrap().fees_due(), 10.0);
        assert_eq!(lib.available_copies("ISBN1"), Some(2));
    }

    #[test]
    fn return_of_unknown_record_fails() {
        let mut lib = library();
        assert!(matches!(
            lib.return_book("REC9", Date::new(2025, 1, 1), 1.0),
            Err(LibrisError::RecordNotFound(_))
        ));
    }

    #[test]
    fn return_tolerates_removed_book_and_user() {
        let mut lib = library();
        lib.borrow_book(
            "U1",
            "ISBN1",
            Date::new(2025, 1, 1),
            Date::new(2025, 1, 10),
        )
        .unwrap();
        assert_eq!(lib.active_loans_for_book("ISBN1"), 1);
        assert_eq!(lib.active_loans_for_user("U1"), 1);
        lib.remove_book("ISBN1").unwrap();
        lib.remove_user("U1").unwrap();

        let receipt = lib.return_book("REC1", Date::new(2025, 1, 12), 2.0).unwrap();
        assert_eq!(receipt.days_late, 2);
        assert_eq!(receipt.fee, 4.0);
        assert!(!receipt.book_restocked);
        assert!(!receipt.fee_posted);
        assert!(lib.search_record("REC1").unwrap().is_returned());
    }

    #[test]
    fn on_time_return_posts_nothing() {
        let mut lib = library();
        lib.borrow_book(
            "U1",
            "ISBN1",
            Date::new(2025, 1, 1),
            Date::new(2025, 1, 10),
        )
        .unwrap();
        let receipt = lib.return_book("REC1", Date::new(2025, 1, 9), 1.0).unwrap();
        assert_eq!(receipt.days_late, 0);
        assert!(!receipt.fee_posted);
        assert_eq!(lib.search_user("U1").unwrap().fees_due(), 0.0);
    }

    #[test]
    fn fee_charge_and_payment_by_id() {
        let mut lib = library();
        lib.charge_fees("U1", 3.0).unwrap();
        assert!(matches!(
            lib.pay_fees("U1", 4.0),
            Err(LibrisError::Overpayment { .. })
        ));
        assert_eq!(lib.pay_fees("U1", 3.0).unwrap().fees_due(), 0.0);
        assert!(matches!(
            lib.charge_fees("ghost", 1.0),
            Err(LibrisError::UserNotFound(_))
        ));
    }

    #[test]
    fn add_copies_by_isbn() {
        let mut lib = library();
        assert_eq!(lib.add_copies("ISBN1", 3).unwrap().copies_total(), 5);
        assert_eq!(lib.available_copies("ISBN1"), Some(5));
        assert!(lib.add_copies("ghost", 1).is_err());

        assert!(matches!(
            lib.add_copies("ISBN1", u32::MAX),
            Err(LibrisError::TooManyCopies { .. })
        ));
        assert_eq!(lib.search_book("ISBN1").unwrap().copies_total(), 5);
        assert_eq!(lib.available_copies("ghost"), None);
    }

    #[test]
    fn summary_counts_everything() {
        let mut lib = library();
        lib.add_user(User::teacher("T1", "Grace", "CS")).unwrap();
        lib.charge_fees("T1", 1.25).unwrap();
        lib.borrow_book(
            "U1",
            "ISBN1",
            Date::new(2025, 1, 1),
            Date::new(2025, 1, 10),
        )
        .unwrap();

        let summary = lib.summary();
        assert_eq!(summary.total_books, 1);
        assert_eq!(summary.total_users, 2);
        assert_eq!(summary.borrowed_count, 1);
        assert_eq!(summary.fees_outstanding, 1.25);
    }
}
