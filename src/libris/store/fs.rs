use super::{CatalogStore, Collection};
use crate::config::LibrisConfig;
use crate::error::{LibrisError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct FileStore {
    root: PathBuf,
    books_file: String,
    users_file: String,
    records_file: String,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        let defaults = LibrisConfig::default();
        Self {
            root,
            books_file: defaults.books_file,
            users_file: defaults.users_file,
            records_file: defaults.records_file,
        }
    }

    pub fn with_config(mut self, config: &LibrisConfig) -> Self {
        self.books_file = config.books_file.clone();
        self.users_file = config.users_file.clone();
        self.records_file = config.records_file.clone();
        self
    }

    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        let name = match collection {
            Collection::Books => &self.books_file,
            Collection::Users => &self.users_file,
            Collection::Records => &self.records_file,
        };
        self.root.join(name)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(LibrisError::Io)?;
        }
        Ok(())
    }
}

impl CatalogStore for FileStore {
    fn read_lines(&self, collection: Collection) -> Result<Vec<Vec<u8>>> {
        let path = self.collection_path(collection);
        let content = fs::read(path).map_err(LibrisError::Io)?;
        let mut lines: Vec<Vec<u8>> = content
            .split(|b| *b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line).to_vec())
            .collect();
        if lines.last().is_some_and(Vec::is_empty) {
            lines.pop();
        }
        Ok(lines)
    }

    fn write_lines(&mut self, collection: Collection, lines: &[String]) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let path = self.collection_path(collection);

        let mut content = String::new();
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }

        // Atomic write
        let tmp_file = self.root.join(format!(".{}.tmp", collection));
        fs::write(&tmp_file, content).map_err(LibrisError::Io)?;
        fs::rename(&tmp_file, &path).map_err(LibrisError::Io)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_then_read_lines() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf());

        let lines = vec!["a,b".to_string(), "c,d".to_string()];
        store.write_lines(Collection::Books, &lines).unwrap();

        assert_eq!(
            store.read_lines(Collection::Books).unwrap(),
            [b"a,b".to_vec(), b"c,d".to_vec()]
        );
        let on_disk = fs::read_to_string(dir.path().join("books.csv")).unwrap();
        assert_eq!(on_disk, "a,b\nc,d\n");
    }

    #[test]
    fn reads_crlf_and_invalid_utf8_lines_without_failing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("books.csv"), b"a,b\r\nCaf\xe9\nlast").unwrap();
        let store = FileStore::new(dir.path().to_path_buf());

        let lines = store.read_lines(Collection::Books).unwrap();
        assert_eq!(lines, [b"a,b".to_vec(), b"Caf\xe9".to_vec(), b"last".to_vec()]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        assert!(matches!(
            store.read_lines(Collection::Users),
            Err(LibrisError::Io(_))
        ));
    }

    #[test]
    fn honors_configured_file_names() {
        let dir = TempDir::new().unwrap();
        let config = LibrisConfig {
            records_file: "loans.txt".to_string(),
            ..LibrisConfig::default()
        };
        let mut store = FileStore::new(dir.path().to_path_buf()).with_config(&config);
        store
            .write_lines(Collection::Records, &["x".to_string()])
            .unwrap();
        assert!(dir.path().join("loans.txt").exists());
        assert!(!dir.path().join(".records.tmp").exists());
    }

    #[test]
    fn creates_missing_data_dir_on_write() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("data");
        let mut store = FileStore::new(nested.clone());
        store.write_lines(Collection::Users, &[]).unwrap();
        assert!(nested.join("users.csv").exists());
    }
}
