//! # Libris Architecture
//!
//! Libris keeps a small library's catalog: the books on its shelves, the people allowed to
//! borrow them, and the loans between the two. It is a library first; the `libris` binary is
//! one client of it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs, print.rs)                     │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Loads the catalog, dispatches to commands, saves         │
//! │  - Applies configured defaults (loan period, late fee)      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One function per operation, returns CmdResult            │
//! │  - Messages for the UI instead of printing                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Catalog (catalog/) and Model (model/)                      │
//! │  - Library: books, users, borrow records and their rules    │
//! │  - Line codecs for the flat comma-separated files           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - CatalogStore trait: read and write lines per collection  │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing below the CLI layer writes to stdout/stderr or exits the process.
//!
//! ## Testing
//!
//! - Model and catalog rules are unit tested next to the code.
//! - Commands and the API run against `InMemoryStore`.
//! - `tests/` drives the real binary against a temporary data directory.

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
