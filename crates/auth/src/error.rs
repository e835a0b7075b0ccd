//! Fehlertypen fuer den Auth-Service

use thiserror::Error;

/// Alle moeglichen Fehler im Auth-Service
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Passwort ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    // --- Eingaben ---
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    // --- Authentifizierung ---
    #[error("Kein Benutzer mit dieser E-Mail gefunden")]
    EmailUnbekannt,

    #[error("Passwort falsch")]
    FalschesPasswort,

    #[error("Keine Anmeldedaten uebermittelt")]
    NichtAngemeldet,

    // --- Session ---
    #[error("Session nicht gefunden oder abgelaufen")]
    SessionUngueltig,

    #[error("Session abgelaufen")]
    SessionAbgelaufen,

    // --- Benutzerverwaltung ---
    #[error("E-Mail bereits registriert: {0}")]
    EmailVergeben(String),

    #[error("Benutzer nicht gefunden: {0}")]
    BenutzerNichtGefunden(String),

    // --- Datenbank ---
    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] plauder_db::DbError),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Gibt true zurueck wenn der Fehler auf fehlende oder ungueltige Credentials zurueckgeht
    pub fn ist_nicht_authentifiziert(&self) -> bool {
        matches!(
            self,
            Self::NichtAngemeldet | Self::SessionUngueltig | Self::SessionAbgelaufen
        )
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;
