//! Fehlertypen fuer die REST-Schnittstelle
//!
//! Jeder Fehler wird zu einer JSON-Antwort
//! `{ "error": { "code": <HTTP-Status>, "message": "..." } }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use plauder_auth::AuthError;
use plauder_chat::ChatError;
use plauder_realtime::RealtimeError;
use serde_json::json;
use thiserror::Error;

/// Alle Fehler, die ein REST-Handler zurueckgeben kann
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("Ungueltige Anfrage: {0}")]
    UngueltigeAnfrage(String),

    #[error("Nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error("Interner Fehler: {0}")]
    Intern(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<RealtimeError> for ApiError {
    fn from(e: RealtimeError) -> Self {
        match e {
            RealtimeError::Chat(c) => Self::Chat(c),
            RealtimeError::Auth(a) => Self::Auth(a),
            RealtimeError::FalschesEvent(msg) => Self::UngueltigeAnfrage(msg),
            andere => Self::Intern(andere.to_string()),
        }
    }
}

impl ApiError {
    /// HTTP-Statuscode des Fehlers
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Auth(e) => match e {
                AuthError::UngueltigeEingabe(_) => StatusCode::BAD_REQUEST,
                AuthError::EmailUnbekannt | AuthError::BenutzerNichtGefunden(_) => {
                    StatusCode::NOT_FOUND
                }
                AuthError::FalschesPasswort
                | AuthError::NichtAngemeldet
                | AuthError::SessionUngueltig
                | AuthError::SessionAbgelaufen => StatusCode::UNAUTHORIZED,
                AuthError::EmailVergeben(_) => StatusCode::CONFLICT,
                AuthError::PasswortHashing(_) | AuthError::Datenbank(_) | AuthError::Intern(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Chat(e) => match e {
                ChatError::UngueltigeNachricht(_)
                | ChatError::UngueltigeEingabe(_)
                | ChatError::UngueltigeMitglieder(_)
                | ChatError::DateitypNichtErlaubt(_) => StatusCode::BAD_REQUEST,
                ChatError::DateiZuGross { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                ChatError::BenutzerNichtGefunden(_) | ChatError::KanalNichtGefunden(_) => {
                    StatusCode::NOT_FOUND
                }
                ChatError::KeineBerechtigung(_) => StatusCode::FORBIDDEN,
                ChatError::SpeicherFehler(_) | ChatError::DatenbankFehler(_) | ChatError::Io(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::UngueltigeAnfrage(_) => StatusCode::BAD_REQUEST,
            Self::NichtGefunden(_) => StatusCode::NOT_FOUND,
            Self::Intern(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let nachricht = if status.is_server_error() {
            tracing::error!(fehler = %self, "Anfrage mit internem Fehler beendet");
            "Interner Serverfehler".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(json!({
                "error": {
                    "code": status.as_u16(),
                    "message": nachricht
                }
            })),
        )
            .into_response()
    }
}
