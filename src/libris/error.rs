use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibrisError {
    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Borrow record not found: {0}")]
    RecordNotFound(String),

    #[error("A book with ISBN {0} already exists")]
    DuplicateBook(String),

    #[error("A user with ID {0} already exists")]
    DuplicateUser(String),

    #[error("No copies of {0} are available")]
    NoCopiesAvailable(String),

    #[error("Adding {requested} copies to {isbn} exceeds the copy limit")]
    TooManyCopies { isbn: String, requested: u32 },

    #[error("Borrow record {0} has already been returned")]
    AlreadyReturned(String),

    #[error("Payment of {amount:.2} exceeds amount owed ({owed:.2})")]
    Overpayment { amount: f64, owed: f64 },

    #[error("Format error: {0}")]
    Format(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LibrisError>;
