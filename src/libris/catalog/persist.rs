use super::Library;
use crate::error::Result;
use crate::model::{Book, BorrowRecord, LineCodec, User};
use crate::store::{CatalogStore, Collection};
use serde::Serialize;
use std::collections::HashSet;

/// A line that was skipped while loading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseFailure {
    /// 1-based line number in the collection
    pub line_number: usize,
    pub line: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub collection: Collection,
    pub loaded: usize,
    pub failures: Vec<ParseFailure>,
}

impl LoadReport {
    fn new(collection: Collection) -> Self {
        Self {
            collection,
            loaded: 0,
            failures: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Decodes every non-blank line, skipping lines that are not UTF-8, fail to parse or repeat
/// a key.
fn decode_lines<T, K>(collection: Collection, lines: &[Vec<u8>], key: K) -> (Vec<T>, LoadReport)
where
    T: LineCodec,
    K: Fn(&T) -> String,
{
    let mut report = LoadReport::new(collection);
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                report.failures.push(ParseFailure {
                    line_number: i + 1,
                    line: String::from_utf8_lossy(raw).into_owned(),
                    reason: format!("not valid UTF-8: {}", e),
                });
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let reason = match T::decode(line) {
            Ok(item) => {
                let k = key(&item);
                if seen.insert(k.clone()) {
                    items.push(item);
                    continue;
                }
                format!("duplicate key '{}'", k)
            }
            Err(e) => e.to_string(),
        };
        report.failures.push(ParseFailure {
            line_number: i + 1,
            line: line.to_string(),
            reason,
        });
    }

    report.loaded = items.len();
    (items, report)
}

fn encode_all<T: LineCodec>(items: &[T]) -> Vec<String> {
    items.iter().map(T::encode).collect()
}

impl Library {
    /// Replaces the books with the stored collection. If the collection cannot be read,
    /// nothing in memory changes.
    pub fn load_books<S: CatalogStore>(&mut self, store: &S) -> Result<LoadReport> {
        let lines = store.read_lines(Collection::Books)?;
        let (books, report) = decode_lines(Collection::Books, &lines, |b: &Book| {
            b.isbn().to_string()
        });
        self.books = books;
        Ok(report)
    }

    pub fn load_users<S: CatalogStore>(&mut self, store: &S) -> Result<LoadReport> {
        let lines = store.read_lines(Collection::Users)?;
        let (users, report) = decode_lines(Collection::Users, &lines, |u: &User| {
            u.id().to_string()
        });
        self.users = users;
        Ok(report)
    }

    pub fn load_records<S: CatalogStore>(&mut self, store: &S) -> Result<LoadReport> {
        let lines = store.read_lines(Collection::Records)?;
        let (records, report) = decode_lines(Collection::Records, &lines, |r: &BorrowRecord| {
            r.record_id().to_string()
        });
        self.records = records;
        Ok(report)
    }

    pub fn load<S: CatalogStore>(
        &mut self,
        store: &S,
        collection: Collection,
    ) -> Result<LoadReport> {
        match collection {
            Collection::Books => self.load_books(store),
            Collection::Users => self.load_users(store),
            Collection::Records => self.load_records(store),
        }
    }

    pub fn save_books<S: CatalogStore>(&self, store: &mut S) -> Result<()> {
        store.write_lines(Collection::Books, &encode_all(&self.books))
    }

    pub fn save_users<S: CatalogStore>(&self, store: &mut S) -> Result<()> {
        store.write_lines(Collection::Users, &encode_all(&self.users))
    }

    pub fn save_records<S: CatalogStore>(&self, store: &mut S) -> Result<()> {
        store.write_lines(Collection::Records, &encode_all(&self.records))
    }

    pub fn save<S: CatalogStore>(&self, store: &mut S, collection: Collection) -> Result<()> {
        match collection {
            Collection::Books => self.save_books(store),
            Collection::Users => self.save_users(store),
            Collection::Records => self.save_records(store),
        }
    }
}
