//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Geschaeftslogik von der konkreten
//! Datenbank-Implementierung.

use plauder_core::types::{ChannelId, UserId};

use crate::error::DbError;
use crate::models::{
    BenutzerRecord, DmKontaktRecord, KanalRecord, NachrichtRecord, NeueNachricht, NeuerBenutzer,
    NeuerKanal, ProfilUpdate,
};

/// Result-Alias fuer Datenbankoperationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://plauder.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://plauder.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

#[allow(async_fn_in_trait)]
pub trait UserRepository: Send + Sync {
    /// Legt einen Benutzer an; doppelte E-Mail ergibt `DbError::Eindeutigkeit`
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord>;

    async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>>;

    /// E-Mail-Vergleich ohne Beachtung der Gross-/Kleinschreibung
    async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>>;

    /// Laedt mehrere Benutzer; unbekannte IDs fehlen im Ergebnis
    async fn get_many(&self, ids: &[UserId]) -> DbResult<Vec<BenutzerRecord>>;

    async fn update_profile(&self, id: UserId, data: ProfilUpdate<'_>) -> DbResult<BenutzerRecord>;

    /// Setzt oder entfernt das Profilbild
    async fn set_image(&self, id: UserId, image: Option<&str>) -> DbResult<BenutzerRecord>;

    /// Teilstring-Suche in Vorname, Nachname und E-Mail, ohne `exclude`
    ///
    /// Der Suchbegriff wird woertlich genommen; Platzhalterzeichen haben
    /// keine Sonderbedeutung.
    async fn search(&self, exclude: UserId, term: &str) -> DbResult<Vec<BenutzerRecord>>;

    /// Alle Benutzer ausser `exclude`
    async fn list_others(&self, exclude: UserId) -> DbResult<Vec<BenutzerRecord>>;
}

// ---------------------------------------------------------------------------
// Nachrichten
// ---------------------------------------------------------------------------

#[allow(async_fn_in_trait)]
pub trait MessageRepository: Send + Sync {
    /// Speichert eine Nachricht
    ///
    /// Bei Kanalnachrichten wird in derselben Transaktion `updated_at`
    /// des Kanals auf den Nachrichten-Zeitstempel gesetzt.
    async fn create(&self, data: NeueNachricht<'_>) -> DbResult<NachrichtRecord>;

    /// Direktnachrichten zwischen zwei Benutzern, aufsteigend nach Zeit
    async fn direct_history(&self, a: UserId, b: UserId) -> DbResult<Vec<NachrichtRecord>>;

    /// Nachrichten eines Kanals, aufsteigend nach Zeit
    async fn channel_history(&self, channel_id: ChannelId) -> DbResult<Vec<NachrichtRecord>>;

    /// Gespraechspartner mit Zeitpunkt der juengsten Direktnachricht, absteigend
    async fn dm_contacts(&self, user_id: UserId) -> DbResult<Vec<DmKontaktRecord>>;
}

// ---------------------------------------------------------------------------
// Kanaele
// ---------------------------------------------------------------------------

#[allow(async_fn_in_trait)]
pub trait ChannelRepository: Send + Sync {
    /// Legt Kanal und Mitgliedschaften in einer Transaktion an
    async fn create(&self, data: NeuerKanal<'_>) -> DbResult<KanalRecord>;

    async fn get_by_id(&self, id: ChannelId) -> DbResult<Option<KanalRecord>>;

    /// Kanaele in denen der Benutzer Admin oder Mitglied ist, neueste zuerst
    async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<KanalRecord>>;
}
