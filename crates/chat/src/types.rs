//! Oeffentliche Typen fuer den Chat-Service

use serde::{Deserialize, Serialize};

use plauder_core::types::UserId;
use plauder_protocol::{KanalNachricht, NachrichtInfo, ServerEvent};

/// Ergebnis einer gespeicherten Nachricht: was an wen live zugestellt wird
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Zustellung {
    /// Direktnachricht; Empfaenger sind Sender und Empfaenger der Nachricht
    Direkt(NachrichtInfo),
    /// Kanalnachricht an alle Mitglieder (inklusive Admin)
    Kanal {
        nachricht: KanalNachricht,
        mitglieder: Vec<UserId>,
    },
}

impl Zustellung {
    /// Die gespeicherte Nachricht
    pub fn nachricht(&self) -> &NachrichtInfo {
        match self {
            Self::Direkt(n) => n,
            Self::Kanal { nachricht, .. } => &nachricht.nachricht,
        }
    }

    /// Das Event, das an jede Empfaenger-Verbindung geht
    pub fn als_event(&self) -> ServerEvent {
        match self {
            Self::Direkt(n) => ServerEvent::ReceiveMessage(n.clone()),
            Self::Kanal { nachricht, .. } => ServerEvent::ReceiveChannelMessage(nachricht.clone()),
        }
    }
}

/// Eintrag der Kontakt-Auswahlliste (z.B. fuer Kanal-Mitglieder)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KontaktOption {
    /// "Vorname Nachname" oder E-Mail
    pub label: String,
    pub value: UserId,
}
