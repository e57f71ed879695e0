//! gittools database layer.
//!
//! Provides SQLite connection management and schema migrations for the
//! sync key-value store.
//!
//! # Usage
//!
//! ```no_run
//! use gittools::database::Database;
//!
//! let db = Database::open("gittools.db").expect("failed to open database");
//! let conn = db.connection();
//! # let _ = conn;
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
