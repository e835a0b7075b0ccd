//! Events des Live-Kanals (WebSocket)
//!
//! Jeder Frame ist ein JSON-Textframe der Form
//! `{ "event": <name>, "data": <payload> }`.
//!
//! | Richtung        | Event                   | Payload                 |
//! |-----------------|-------------------------|-------------------------|
//! | Server → Client | `receiveMessage`        | `NachrichtInfo`         |
//! | Server → Client | `receiveChannelMessage` | `KanalNachricht`        |
//! | Server → Client | `error`                 | `FehlerEvent`           |
//! | Client → Server | `sendMessage`           | `SendeAnfrage`          |
//! | Client → Server | `sendChannelMessage`    | `SendeAnfrage`          |

use serde::{Deserialize, Serialize};

use crate::nachricht::{NachrichtInfo, SendeAnfrage};

// ---------------------------------------------------------------------------
// Fehler-Codes
// ---------------------------------------------------------------------------

/// Standardisierte Fehler-Codes fuer `error`-Events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FehlerCode {
    InvalidFrame,
    InvalidMessage,
    NotFound,
    Forbidden,
    InternalError,
}

/// Fehlerantwort an den Absender eines Live-Events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FehlerEvent {
    pub code: FehlerCode,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// Kanalnachricht mit dem Kanalnamen fuer die Seitenleiste des Empfaengers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanalNachricht {
    #[serde(flatten)]
    pub nachricht: NachrichtInfo,
    pub channel_name: String,
}

/// Events die der Server an verbundene Clients pusht
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    ReceiveMessage(NachrichtInfo),
    ReceiveChannelMessage(KanalNachricht),
    Error(FehlerEvent),
}

impl ServerEvent {
    /// Erstellt ein Fehler-Event
    pub fn fehler(code: FehlerCode, message: impl Into<String>) -> Self {
        Self::Error(FehlerEvent {
            code,
            message: message.into(),
        })
    }

    /// Event-Name wie er auf dem Draht erscheint
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReceiveMessage(_) => "receiveMessage",
            Self::ReceiveChannelMessage(_) => "receiveChannelMessage",
            Self::Error(_) => "error",
        }
    }
}

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// Events die ein Client ueber den Live-Kanal sendet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    SendMessage(SendeAnfrage),
    SendChannelMessage(SendeAnfrage),
}
