//! plauder-db – Datenbank-Abstraktion
//!
//! Repository-Traits fuer Benutzer, Nachrichten und Kanaele sowie deren
//! SQLite-Implementierung. Die Geschaeftslogik kennt nur die Traits.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use repository::{
    ChannelRepository, DatabaseConfig, DbResult, MessageRepository, UserRepository,
};
pub use sqlite::SqliteDb;
