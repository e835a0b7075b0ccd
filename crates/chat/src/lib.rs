//! plauder-chat – Nachrichten, Kanaele, Kontakte und Dateien
//!
//! Dieses Crate implementiert:
//! - ChatService: Nachrichten validieren und speichern, Historien laden
//! - ChannelService: Kanaele anlegen (mit Mitgliederpruefung) und auflisten
//! - ContactService: Kontaktsuche, DM-Kontaktliste, Auswahlliste
//! - FileService: Datei-Upload mit MIME-Allowlist
//! - BlobStore-Trait + DiskStorage-Implementierung
//!
//! Live-Zustellung ist nicht Teil dieses Crates; `nachricht_senden`
//! liefert eine `Zustellung`, die der Aufrufer nach dem Speichern
//! an die Verbindungen verteilt.

pub mod channel_service;
pub mod contact_service;
pub mod error;
pub mod file_service;
pub mod service;
pub mod storage;
pub mod types;

#[cfg(test)]
mod tests;

// Bequeme Re-Exporte
pub use channel_service::ChannelService;
pub use contact_service::ContactService;
pub use error::{ChatError, ChatResult};
pub use file_service::{FileService, ERLAUBTE_DATEITYPEN};
pub use service::{nachricht_info, profil_info, ChatService, MAX_TEXT_LAENGE};
pub use storage::{BlobStore, DiskStorage};
pub use types::{KontaktOption, Zustellung};
