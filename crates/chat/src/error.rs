//! Fehlertypen fuer das Chat-Crate

use thiserror::Error;

use plauder_core::types::UserId;

/// Chat-Fehlertypen
#[derive(Debug, Error)]
pub enum ChatError {
    /// Nachricht verletzt Formregeln (Ziel, Inhalt, Datei-URL)
    #[error("Ungueltige Nachricht: {0}")]
    UngueltigeNachricht(String),

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    #[error("Benutzer nicht gefunden: {0}")]
    BenutzerNichtGefunden(String),

    #[error("Kanal nicht gefunden: {0}")]
    KanalNichtGefunden(String),

    /// Kanal-Erstellung mit unbekannten Mitgliedern
    #[error("Unbekannte Mitglieder: {}", format_ids(.0))]
    UngueltigeMitglieder(Vec<UserId>),

    #[error("Keine Berechtigung: {0}")]
    KeineBerechtigung(String),

    #[error("Datei zu gross: {size} Bytes (Maximum: {max} Bytes)")]
    DateiZuGross { size: usize, max: usize },

    #[error("Dateityp nicht erlaubt: {0}")]
    DateitypNichtErlaubt(String),

    #[error("Speicher-Fehler: {0}")]
    SpeicherFehler(String),

    #[error("Datenbank-Fehler: {0}")]
    DatenbankFehler(#[from] plauder_db::DbError),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),
}

fn format_ids(ids: &[UserId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ChatError {
    /// Gibt true zurueck wenn der Fehler beim Speichern entstand (nicht bei der Validierung)
    pub fn ist_persistenzfehler(&self) -> bool {
        matches!(self, Self::DatenbankFehler(_) | Self::Io(_) | Self::SpeicherFehler(_))
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
