use crate::error::{LibrisError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LATE_FEE_PER_DAY: f64 = 0.25;
const DEFAULT_LOAN_PERIOD_DAYS: u32 = 14;

pub const CONFIG_KEYS: [&str; 5] = [
    "late-fee",
    "loan-days",
    "books-file",
    "users-file",
    "records-file",
];

/// Configuration for libris, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibrisConfig {
    /// Fee posted per approximate day a return is late
    #[serde(default = "default_late_fee")]
    pub late_fee_per_day: f64,

    /// Days between borrowing and the default due date
    #[serde(default = "default_loan_period")]
    pub loan_period_days: u32,

    #[serde(default = "default_books_file")]
    pub books_file: String,

    #[serde(default = "default_users_file")]
    pub users_file: String,

    #[serde(default = "default_records_file")]
    pub records_file: String,
}

fn default_late_fee() -> f64 {
    DEFAULT_LATE_FEE_PER_DAY
}

fn default_loan_period() -> u32 {
    DEFAULT_LOAN_PERIOD_DAYS
}

fn default_books_file() -> String {
    "books.csv".to_string()
}

fn default_users_file() -> String {
    "users.csv".to_string()
}

fn default_records_file() -> String {
    "records.csv".to_string()
}

impl Default for LibrisConfig {
    fn default() -> Self {
        Self {
            late_fee_per_day: DEFAULT_LATE_FEE_PER_DAY,
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
            books_file: default_books_file(),
            users_file: default_users_file(),
            records_file: default_records_file(),
        }
    }
}

impl LibrisConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(LibrisError::Io)?;
        let config: LibrisConfig =
            serde_json::from_str(&content).map_err(LibrisError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(LibrisError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(LibrisError::Serialization)?;
        fs::write(config_path, content).map_err(LibrisError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "late-fee" => format!("{:.2}", self.late_fee_per_day),
            "loan-days" => self.loan_period_days.to_string(),
            "books-file" => self.books_file.clone(),
            "users-file" => self.users_file.clone(),
            "records-file" => self.records_file.clone(),
            other => return Err(unknown_key(other)),
        };
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "late-fee" => {
                let fee: f64 = value
                    .parse()
                    .map_err(|_| LibrisError::Config(format!("invalid late fee: {}", value)))?;
                if !fee.is_finite() || fee < 0.0 {
                    return Err(LibrisError::Config(format!(
                        "late fee must be a non-negative amount: {}",
                        value
                    )));
                }
                self.late_fee_per_day = fee;
            }
            "loan-days" => {
                self.loan_period_days = value
                    .parse()
                    .map_err(|_| LibrisError::Config(format!("invalid loan days: {}", value)))?;
            }
            "books-file" => self.books_file = file_name(value)?,
            "users-file" => self.users_file = file_name(value)?,
            "records-file" => self.records_file = file_name(value)?,
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn file_name(value: &str) -> Result<String> {
    if value.is_empty() || value.contains(['/', '\\']) {
        return Err(LibrisError::Config(format!(
            "file name must be a plain name inside the data directory: {}",
            value
        )));
    }
    Ok(value.to_string())
}

fn unknown_key(key: &str) -> LibrisError {
    LibrisError::Config(format!(
        "unknown config key '{}' (expected one of: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
