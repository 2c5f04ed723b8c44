//! Cookie database layer.
//!
//! Provides SQLite connection management and schema migrations backing
//! [`SqliteCookieJar`](crate::managers::sqlite_cookie_jar::SqliteCookieJar).
//!
//! # Usage
//!
//! ```no_run
//! use cookie_history::database::Database;
//!
//! // Open a persistent database
//! let db = Database::open("cookies.db").expect("failed to open database");
//!
//! // Or use an in-memory database for testing
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
