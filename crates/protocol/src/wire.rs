//! Wire-Format fuer den Live-Kanal
//!
//! Ein Frame ist genau ein JSON-Textframe des WebSockets. Der Codec prueft
//! die Frame-Groesse in beide Richtungen und uebersetzt zwischen Text und
//! den typisierten Events.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::live::{ClientEvent, ServerEvent};

// ---------------------------------------------------------------------------
// Konstanten
// ---------------------------------------------------------------------------

/// Standard-maximale Frame-Groesse (64 KB)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Fehler
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum WireError {
    #[error("Frame zu gross: {groesse} Bytes (Maximum: {maximum} Bytes)")]
    FrameZuGross { groesse: usize, maximum: usize },

    #[error("JSON-Deserialisierung fehlgeschlagen: {0}")]
    Deserialisierung(#[source] serde_json::Error),

    #[error("JSON-Serialisierung fehlgeschlagen: {0}")]
    Serialisierung(#[source] serde_json::Error),
}

// ---------------------------------------------------------------------------
// LiveCodec
// ---------------------------------------------------------------------------

/// Codec fuer JSON-Textframes mit Groessenlimit
#[derive(Debug, Clone, Copy)]
pub struct LiveCodec {
    max_frame_size: usize,
}

impl LiveCodec {
    /// Erstellt einen Codec mit Standard-Limit
    pub fn new() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    /// Erstellt einen Codec mit benutzerdefinierter maximaler Frame-Groesse
    pub fn with_max_size(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    /// Kodiert ein Server-Event als Textframe
    pub fn kodieren(&self, event: &ServerEvent) -> Result<String, WireError> {
        self.schreiben(event)
    }

    /// Dekodiert einen Textframe eines Clients
    pub fn dekodieren(&self, frame: &str) -> Result<ClientEvent, WireError> {
        self.lesen(frame)
    }

    /// Kodiert ein beliebiges Event (Client-Seite nutzt `ClientEvent`)
    pub fn schreiben<T: Serialize>(&self, event: &T) -> Result<String, WireError> {
        let text = serde_json::to_string(event).map_err(WireError::Serialisierung)?;
        self.groesse_pruefen(text.len())?;
        Ok(text)
    }

    /// Dekodiert ein beliebiges Event (Client-Seite liest `ServerEvent`)
    pub fn lesen<T: DeserializeOwned>(&self, frame: &str) -> Result<T, WireError> {
        self.groesse_pruefen(frame.len())?;
        serde_json::from_str(frame).map_err(WireError::Deserialisierung)
    }

    fn groesse_pruefen(&self, groesse: usize) -> Result<(), WireError> {
        if groesse > self.max_frame_size {
            return Err(WireError::FrameZuGross {
                groesse,
                maximum: self.max_frame_size,
            });
        }
        Ok(())
    }
}

impl Default for LiveCodec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::FehlerCode;
    use crate::nachricht::SendeAnfrage;
    use plauder_core::types::UserId;

    #[test]
    fn client_event_dekodieren() {
        let codec = LiveCodec::new();
        let anfrage = SendeAnfrage::text_an(UserId::new(), "hi");
        let frame = codec.schreiben(&ClientEvent::SendMessage(anfrage.clone())).unwrap();
        let event = codec.dekodieren(&frame).unwrap();
        assert_eq!(event, ClientEvent::SendMessage(anfrage));
    }

    #[test]
    fn zu_grosser_frame_wird_abgelehnt() {
        let codec = LiveCodec::with_max_size(32);
        let frame = format!(r#"{{"event":"sendMessage","data":"{}"}}"#, "x".repeat(64));
        let err = codec.dekodieren(&frame).unwrap_err();
        assert!(matches!(err, WireError::FrameZuGross { maximum: 32, .. }));
    }

    #[test]
    fn zu_grosses_event_wird_nicht_kodiert() {
        let codec = LiveCodec::with_max_size(16);
        let event = ServerEvent::fehler(FehlerCode::InternalError, "eine laengere Fehlermeldung");
        assert!(matches!(
            codec.kodieren(&event),
            Err(WireError::FrameZuGross { .. })
        ));
    }

    #[test]
    fn kaputtes_json_ist_deserialisierungsfehler() {
        let codec = LiveCodec::new();
        let err = codec.dekodieren("{nicht json").unwrap_err();
        assert!(matches!(err, WireError::Deserialisierung(_)));
        assert!(err.to_string().contains("JSON-Deserialisierung"));
    }
}
