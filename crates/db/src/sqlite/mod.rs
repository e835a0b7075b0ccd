//! SQLite-Backend-Implementierungen fuer alle Repository-Traits

pub mod channels;
pub mod messages;
pub mod pool;
pub mod users;

pub use pool::SqliteDb;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::DbResult;

/// Speicherformat fuer Zeitstempel (feste Breite, sortierbar)
const ZEIT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

pub(crate) fn zeit_schreiben(zeit: &DateTime<Utc>) -> String {
    zeit.format(ZEIT_FORMAT).to_string()
}

pub(crate) fn zeit_lesen(wert: &str, feld: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(wert)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::intern(format!("Ungueltiger Zeitstempel in {feld} '{wert}': {e}")))
}

pub(crate) fn id_lesen<T: From<Uuid>>(wert: &str, feld: &str) -> DbResult<T> {
    Uuid::parse_str(wert)
        .map(T::from)
        .map_err(|e| DbError::intern(format!("Ungueltige UUID in {feld} '{wert}': {e}")))
}
