//! Fehlertypen fuer den Live-Layer

use plauder_auth::AuthError;
use plauder_chat::ChatError;
use plauder_protocol::{FehlerCode, ServerEvent, WireError};
use thiserror::Error;

/// Fehlertyp fuer Live-Verbindungen und Zustellung
#[derive(Debug, Error)]
pub enum RealtimeError {
    /// Authentifizierungsfehler beim Verbindungsaufbau
    #[error("Authentifizierungsfehler: {0}")]
    Auth(#[from] AuthError),

    /// Validierung oder Speichern der Nachricht fehlgeschlagen
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Ungueltiger Frame (JSON, Groesse)
    #[error("Protokollfehler: {0}")]
    Protokoll(#[from] WireError),

    /// Event passt nicht zum Ziel der Nachricht
    #[error("Falsches Event: {0}")]
    FalschesEvent(String),

    /// Push an eine Verbindung fehlgeschlagen (wird nur geloggt)
    #[error("Zustellung fehlgeschlagen: {0}")]
    ZustellungFehlgeschlagen(String),
}

impl RealtimeError {
    /// Fehler-Code fuer das `error`-Event an den Absender
    pub fn fehler_code(&self) -> FehlerCode {
        match self {
            Self::Protokoll(_) => FehlerCode::InvalidFrame,
            Self::FalschesEvent(_) => FehlerCode::InvalidMessage,
            Self::Auth(_) => FehlerCode::Forbidden,
            Self::ZustellungFehlgeschlagen(_) => FehlerCode::InternalError,
            Self::Chat(e) => match e {
                ChatError::UngueltigeNachricht(_)
                | ChatError::UngueltigeEingabe(_)
                | ChatError::UngueltigeMitglieder(_)
                | ChatError::DateiZuGross { .. }
                | ChatError::DateitypNichtErlaubt(_) => FehlerCode::InvalidMessage,
                ChatError::BenutzerNichtGefunden(_) | ChatError::KanalNichtGefunden(_) => {
                    FehlerCode::NotFound
                }
                ChatError::KeineBerechtigung(_) => FehlerCode::Forbidden,
                ChatError::SpeicherFehler(_)
                | ChatError::DatenbankFehler(_)
                | ChatError::Io(_) => FehlerCode::InternalError,
            },
        }
    }

    /// Baut das `error`-Event; interne Details bleiben im Log
    pub fn als_event(&self) -> ServerEvent {
        let code = self.fehler_code();
        let message = match code {
            FehlerCode::InternalError => "Interner Serverfehler".to_string(),
            _ => self.to_string(),
        };
        ServerEvent::fehler(code, message)
    }
}

/// Result-Typ fuer den Live-Layer
pub type RealtimeResult<T> = Result<T, RealtimeError>;
