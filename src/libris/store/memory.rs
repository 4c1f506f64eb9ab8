use super::{CatalogStore, Collection};
use crate::error::{LibrisError, Result};
use std::collections::{HashMap, HashSet};
use std::io;

/// In-memory store for tests. A collection that was never written reads as missing,
/// the same as an absent file.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: HashMap<Collection, Vec<String>>,
    unreadable: HashSet<Collection>,
    simulate_write_error: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lines<I, L>(mut self, collection: Collection, lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.collections
            .insert(collection, lines.into_iter().map(Into::into).collect());
        self
    }

    /// Make a collection fail to read with something other than "not found".
    pub fn with_unreadable(mut self, collection: Collection) -> Self {
        self.unreadable.insert(collection);
        self
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    pub fn lines(&self, collection: Collection) -> Option<&[String]> {
        self.collections.get(&collection).map(Vec::as_slice)
    }
}

impl CatalogStore for InMemoryStore {
    fn read_lines(&self, collection: Collection) -> Result<Vec<Vec<u8>>> {
        if self.unreadable.contains(&collection) {
            return Err(LibrisError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} collection is unreadable", collection),
            )));
        }
        let lines = self.collections.get(&collection).ok_or_else(|| {
            LibrisError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no {} collection", collection),
            ))
        })?;
        Ok(lines.iter().map(|line| line.as_bytes().to_vec()).collect())
    }

    fn write_lines(&mut self, collection: Collection, lines: &[String]) -> Result<()> {
        if self.simulate_write_error {
            return Err(LibrisError::Io(io::Error::other("simulated write error")));
        }
        self.collections.insert(collection, lines.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_collection_reads_as_missing() {
        let store = InMemoryStore::new();
        assert!(store.read_lines(Collection::Books).is_err());
    }

    #[test]
    fn simulated_write_error_keeps_old_lines() {
        let mut store = InMemoryStore::new().with_lines(Collection::Books, ["old"]);
        store.set_simulate_write_error(true);
        assert!(store
            .write_lines(Collection::Books, &["new".to_string()])
            .is_err());
        assert_eq!(store.lines(Collection::Books).unwrap(), ["old".to_string()]);
    }
}
