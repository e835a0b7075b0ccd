//! plauder-protocol – Nachrichtenformate und Live-Protokoll
//!
//! Dieses Crate definiert die Datensaetze, die zwischen Client und Server
//! ausgetauscht werden: denormalisierte Nachrichten (REST-Historie und
//! Live-Push teilen dasselbe Format), Kanal- und Kontakt-Zusammenfassungen
//! sowie die Events des WebSocket-Kanals.

pub mod live;
pub mod nachricht;
pub mod wire;

pub use live::{ClientEvent, FehlerCode, FehlerEvent, KanalNachricht, ServerEvent};
pub use nachricht::{
    KanalInfo, KontaktInfo, NachrichtInfo, NachrichtenTyp, Nachrichtenziel, ProfilInfo,
    SendeAnfrage, ZielFehler,
};
pub use wire::{LiveCodec, WireError};
