//! Fehler der Persistenzschicht
//!
//! Die Services oberhalb unterscheiden nur drei Faelle: Datensatz fehlt,
//! E-Mail vergeben, alles andere ist ein Speicherfehler.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// Benutzer, Kanal oder Nachricht existiert nicht
    #[error("Nicht gefunden: {0}")]
    NichtGefunden(String),

    /// UNIQUE-Constraint verletzt (users.email)
    #[error("Bereits vorhanden: {0}")]
    Eindeutigkeit(String),

    /// Gespeicherter Wert laesst sich nicht in den Domaenentyp uebersetzen
    #[error("Ungueltiger Datensatz: {0}")]
    UngueltigeDaten(String),

    #[error("SQLite: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration fehlgeschlagen: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Datenbank: {0}")]
    Intern(String),
}

impl DbError {
    pub fn nicht_gefunden(was: impl Into<String>) -> Self {
        Self::NichtGefunden(was.into())
    }

    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Doppelte E-Mail, egal ob schon gemappt oder noch als SQLite-Fehler
    pub fn ist_eindeutigkeit(&self) -> bool {
        match self {
            Self::Eindeutigkeit(_) => true,
            Self::Sqlx(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}
