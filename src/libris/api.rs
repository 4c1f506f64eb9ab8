//! # API Facade
//!
//! [`LibrisApi`] is the single entry point a UI talks to. It owns the store and the
//! in-memory [`Library`], loads every collection when opened, dispatches each operation to
//! its command, and writes the collections back on [`LibrisApi::save`].
//!
//! ## Load and save
//!
//! - A collection that does not exist yet starts empty.
//! - Lines that fail to decode are skipped and reported as warnings.
//! - A collection that exists but cannot be read is left out of the session: it starts
//!   empty in memory and is never written back, so a later save cannot clobber it.
//!
//! The API holds no business logic and never prints. Mutating calls mark the session
//! dirty; [`LibrisApi::save_if_dirty`] is what a shell calls on exit.
//!
//! Generic over [`CatalogStore`]: `LibrisApi<FileStore>` in production,
//! `LibrisApi<InMemoryStore>` in tests.

use crate::catalog::Library;
use crate::commands::{self, CmdMessage, CmdResult};
use crate::config::LibrisConfig;
use crate::error::{LibrisError, Result};
use crate::model::{Book, Date, User};
use crate::store::{CatalogStore, Collection};
use std::io;
use std::path::PathBuf;

pub struct LibrisApi<S: CatalogStore> {
    store: S,
    library: Library,
    config: LibrisConfig,
    config_dir: PathBuf,
    unloaded: Vec<Collection>,
    dirty: bool,
}

impl<S: CatalogStore> LibrisApi<S> {
    /// Loads the catalog from `store`. The returned result carries any load diagnostics.
    pub fn open(store: S, config: LibrisConfig, config_dir: PathBuf) -> (Self, CmdResult) {
        let mut library = Library::new();
        let mut unloaded = Vec::new();
        let mut result = CmdResult::default();

        for collection in Collection::ALL {
            match library.load(&store, collection) {
                Ok(report) => {
                    for failure in &report.failures {
                        result.add_message(CmdMessage::warning(format!(
                            "Skipped {} line {} ({}): {}",
                            collection, failure.line_number, failure.reason, failure.line
                        )));
                    }
                }
                Err(LibrisError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    result.add_message(CmdMessage::error(format!(
                        "Could not load {}; it will not be saved this session: {}",
                        collection, e
                    )));
                    unloaded.push(collection);
                }
            }
        }

        let api = Self {
            store,
            library,
            config,
            config_dir,
            unloaded,
            dirty: false,
        };
        (api, result)
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn config(&self) -> &LibrisConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mutate<F>(&mut self, op: F) -> Result<CmdResult>
    where
        F: FnOnce(&mut Library) -> Result<CmdResult>,
    {
        let result = op(&mut self.library)?;
        self.dirty = true;
        Ok(result)
    }

    // --- Books ---

    pub fn add_book(&mut self, book: Book) -> Result<CmdResult> {
        self.mutate(|lib| commands::books::add(lib, book))
    }

    pub fn remove_book(&mut self, isbn: &str) -> Result<CmdResult> {
        self.mutate(|lib| commands::books::remove(lib, isbn))
    }

    pub fn restock(&mut self, isbn: &str, copies: u32) -> Result<CmdResult> {
        self.mutate(|lib| commands::books::restock(lib, isbn, copies))
    }

    pub fn show_book(&self, isbn: &str) -> Result<CmdResult> {
        commands::books::show(&self.library, isbn)
    }

    pub fn list_books(&self) -> Result<CmdResult> {
        commands::books::list(&self.library)
    }

    // --- Users ---

    pub fn add_user(&mut self, user: User) -> Result<CmdResult> {
        self.mutate(|lib| commands::users::add(lib, user))
    }

    pub fn remove_user(&mut self, id: &str) -> Result<CmdResult> {
        self.mutate(|lib| commands::users::remove(lib, id))
    }

    pub fn show_user(&self, id: &str) -> Result<CmdResult> {
        commands::users::show(&self.library, id)
    }

    pub fn list_users(&self) -> Result<CmdResult> {
        commands::users::list(&self.library)
    }

    pub fn charge_fees(&mut self, id: &str, amount: f64) -> Result<CmdResult> {
        self.mutate(|lib| commands::users::charge(lib, id, amount))
    }

    pub fn pay_fees(&mut self, id: &str, amount: f64) -> Result<CmdResult> {
        self.mutate(|lib| commands::users::pay(lib, id, amount))
    }

    // --- Loans ---

    /// Without an explicit due date the loan runs for the configured loan period.
    pub fn borrow_book(
        &mut self,
        user_id: &str,
        isbn: &str,
        borrowed_on: Date,
        due_on: Option<Date>,
    ) -> Result<CmdResult> {
        let due_on = match due_on {
            Some(date) => date,
            None => borrowed_on
                .add_calendar_days(self.config.loan_period_days)
                .ok_or_else(|| {
                    LibrisError::Format(format!(
                        "{} is not a calendar date; give a due date explicitly",
                        borrowed_on.padded()
                    ))
                })?,
        };
        self.mutate(|lib| commands::loans::borrow(lib, user_id, isbn, borrowed_on, due_on))
    }

    /// Without an explicit rate the configured late fee applies.
    pub fn return_book(
        &mut self,
        record_id: &str,
        returned_on: Date,
        late_fee_per_day: Option<f64>,
    ) -> Result<CmdResult> {
        let fee = late_fee_per_day.unwrap_or(self.config.late_fee_per_day);
        self.mutate(|lib| commands::loans::return_book(lib, record_id, returned_on, fee))
    }

    pub fn list_records(&self, filter: &commands::loans::RecordFilter) -> Result<CmdResult> {
        commands::loans::list(&self.library, filter)
    }

    // --- Reports ---

    pub fn summary(&self) -> Result<CmdResult> {
        commands::report::summary(&self.library)
    }

    pub fn availability(&self, isbn: &str) -> Result<CmdResult> {
        commands::report::availability(&self.library, isbn)
    }

    pub fn config_action(&mut self, action: ConfigAction) -> Result<CmdResult> {
        let result = commands::config::run(&self.config_dir, action)?;
        if let Some(config) = &result.config {
            self.config = config.clone();
        }
        Ok(result)
    }

    // --- Persistence ---

    /// Writes every loaded collection back to the store.
    pub fn save(&mut self) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        for collection in Collection::ALL {
            if self.unloaded.contains(&collection) {
                result.add_message(CmdMessage::warning(format!(
                    "Left {} untouched because it failed to load",
                    collection
                )));
                continue;
            }
            self.library.save(&mut self.store, collection)?;
        }
        self.dirty = false;
        Ok(result)
    }

    pub fn save_if_dirty(&mut self) -> Result<CmdResult> {
        if !self.dirty {
            return Ok(CmdResult::default());
        }
        self.save()
    }
}

pub use crate::catalog::{CatalogSummary, ReturnReceipt};
pub use crate::commands::config::ConfigAction;
pub use crate::commands::loans::{RecordFilter, RecordStatusFilter};
pub use crate::commands::MessageLevel;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use tempfile::TempDir;

    fn open(store: InMemoryStore) -> (TempDir, LibrisApi<InMemoryStore>, CmdResult) {
        let dir = TempDir::new().unwrap();
        let (api, result) = LibrisApi::open(store, LibrisConfig::default(), dir.path().into());
        (dir, api, result)
    }

    #[test]
    fn fresh_store_opens_empty_and_quiet() {
        let (_dir, api, result) = open(InMemoryStore::new());
        assert!(result.messages.is_empty());
        assert_eq!(api.library().total_books(), 0);
        assert!(!api.is_dirty());
    }

    #[test]
    fn malformed_lines_become_warnings() {
        let store = InMemoryStore::new()
            .with_lines(Collection::Books, ["ISBN1,T,A,2020,1,1", "garbage"])
            .with_lines(Collection::Users, ["ADMIN,X,Y,Z,0"]);
        let (_dir, api, result) = open(store);
        assert_eq!(result.messages.len(), 2);
        assert!(result.has_level(MessageLevel::Warning));
        assert_eq!(api.library().total_books(), 1);
    }

    #[test]
    fn mutations_mark_dirty_and_save_writes_all_collections() {
        let (_dir, mut api, _) = open(InMemoryStore::new());
        api.add_book(Book::new("ISBN1", "T", "A", 2020, 2)).unwrap();
        api.add_user(User::other("U1", "Name")).unwrap();
        api.borrow_book(
            "U1",
            "ISBN1",
            Date::new(2025, 1, 1),
            Some(Date::new(2025, 1, 10)),
        )
        .unwrap();
        assert!(api.is_dirty());

        api.save_if_dirty().unwrap();
        assert!(!api.is_dirty());
        assert_eq!(
            api.store().lines(Collection::Books).unwrap(),
            ["ISBN1,T,A,2020,2,1".to_string()]
        );
        assert_eq!(
            api.store().lines(Collection::Users).unwrap(),
            ["USER,U1,Name,OTHER,0".to_string()]
        );
        assert_eq!(
            api.store().lines(Collection::Records).unwrap(),
            ["REC1,U1,ISBN1,2025-1-1,2025-1-10,NOT_RETURNED".to_string()]
        );
    }

    #[test]
    fn failed_mutation_does_not_mark_dirty() {
        let (_dir, mut api, _) = open(InMemoryStore::new());
        assert!(api.remove_book("ghost").is_err());
        assert!(!api.is_dirty());
    }

    #[test]
    fn borrow_defaults_due_date_from_loan_period() {
        let (_dir, mut api, _) = open(InMemoryStore::new());
        api.add_book(Book::new("ISBN1", "T", "A", 2020, 1)).unwrap();
        api.add_user(User::other("U1", "Name")).unwrap();

        let result = api
            .borrow_book("U1", "ISBN1", Date::new(2025, 1, 25), None)
            .unwrap();
        assert_eq!(result.records[0].due_on(), Date::new(2025, 2, 8));
    }

    #[test]
    fn return_defaults_to_configured_fee() {
        let (_dir, mut api, _) = open(InMemoryStore::new());
        api.add_book(Book::new("ISBN1", "T", "A", 2020, 1)).unwrap();
        api.add_user(User::other("U1", "Name")).unwrap();
        api.borrow_book(
            "U1",
            "ISBN1",
            Date::new(2025, 1, 1),
            Some(Date::new(2025, 1, 10)),
        )
        .unwrap();

        let result = api.return_book("REC1", Date::new(2025, 1, 14), None).unwrap();
        assert_eq!(result.receipt.as_ref().unwrap().fee, 1.0);
        assert_eq!(api.library().search_user("U1").unwrap().fees_due(), 1.0);
    }

    #[test]
    fn invalid_late_fee_leaves_the_user_intact_across_save() {
        let (dir, mut api, _) = open(InMemoryStore::new());
        api.add_book(Book::new("ISBN1", "T", "A", 2020, 1)).unwrap();
        api.add_user(User::other("U1", "Name")).unwrap();
        api.borrow_book(
            "U1",
            "ISBN1",
            Date::new(2025, 1, 1),
            Some(Date::new(2025, 1, 10)),
        )
        .unwrap();
        api.save().unwrap();

        assert!(api.return_book("REC1", Date::new(2025, 1, 15), Some(-1.0)).is_err());
        assert!(api.return_book("REC1", Date::new(2025, 1, 15), Some(f64::NAN)).is_err());
        assert!(!api.is_dirty());

        let (reopened, result) =
            LibrisApi::open(api.store, LibrisConfig::default(), dir.path().into());
        assert!(result.messages.is_empty());
        assert_eq!(reopened.library().search_user("U1").unwrap().fees_due(), 0.0);
        assert_eq!(reopened.library().borrowed_count(), 1);
    }

    #[test]
    fn text_with_delimiters_is_refused_before_it_reaches_the_files() {
        let (_dir, mut api, _) = open(InMemoryStore::new());
        assert!(api
            .add_book(Book::new("ISBN2", "Dune, Part One", "Herbert", 1965, 1))
            .is_err());
        assert!(api.add_user(User::other("U1", "Lovelace, Ada")).is_err());
        assert!(!api.is_dirty());
        assert_eq!(api.library().total_books(), 0);
    }

    #[test]
    fn restock_beyond_the_copy_limit_is_an_error() {
        let (_dir, mut api, _) = open(InMemoryStore::new());
        api.add_book(Book::new("ISBN1", "T", "A", 2020, 1)).unwrap();
        assert!(matches!(
            api.restock("ISBN1", u32::MAX),
            Err(LibrisError::TooManyCopies { .. })
        ));
        assert_eq!(api.library().available_copies("ISBN1"), Some(1));
    }

    #[test]
    fn config_changes_apply_to_the_session() {
        let (_dir, mut api, _) = open(InMemoryStore::new());
        api.config_action(ConfigAction::Set("late-fee".into(), "2".into()))
            .unwrap();
        assert_eq!(api.config().late_fee_per_day, 2.0);
    }

    #[test]
    fn unreadable_collection_is_never_overwritten() {
        let store = InMemoryStore::new()
            .with_lines(Collection::Books, ["ISBN1,T,A,2020,1,1"])
            .with_lines(Collection::Users, ["USER,U1,Name,OTHER,0"])
            .with_unreadable(Collection::Users);
        let (_dir, mut api, result) = open(store);
        assert!(result.messages[0].content.contains("Could not load users"));
        assert!(result.has_level(MessageLevel::Error));

        api.restock("ISBN1", 1).unwrap();
        let saved = api.save().unwrap();
        assert!(saved.has_level(MessageLevel::Warning));
        assert_eq!(
            api.store().lines(Collection::Users).unwrap(),
            ["USER,U1,Name,OTHER,0".to_string()]
        );
        assert_eq!(
            api.store().lines(Collection::Books).unwrap(),
            ["ISBN1,T,A,2020,2,2".to_string()]
        );
    }

    #[test]
    fn save_failure_is_reported() {
        let mut store = InMemoryStore::new();
        store.set_simulate_write_error(true);
        let (_dir, mut api, _) = open(store);
        api.add_user(User::other("U1", "Name")).unwrap();
        assert!(api.save().is_err());
        assert!(api.is_dirty());
    }
}
