//! Datenbankmodelle fuer Plauder
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank. Die
//! denormalisierten Formate fuer Clients baut das Chat-Crate daraus.

use chrono::{DateTime, Utc};

use plauder_core::types::{ChannelId, MessageId, UserId};
use plauder_protocol::{NachrichtenTyp, Nachrichtenziel};

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

/// Benutzer-Datensatz aus der Datenbank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenutzerRecord {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image: Option<String>,
    pub color: i32,
    pub profile_setup: bool,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Anlegen eines neuen Benutzers
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Profil-Aktualisierung (alle Felder Pflicht, setzt `profile_setup`)
#[derive(Debug, Clone)]
pub struct ProfilUpdate<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub color: i32,
}

// ---------------------------------------------------------------------------
// Nachrichten
// ---------------------------------------------------------------------------

/// Nachrichten-Datensatz aus der Datenbank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NachrichtRecord {
    pub id: MessageId,
    pub sender_id: UserId,
    pub recipient_id: Option<UserId>,
    pub channel_id: Option<ChannelId>,
    pub message_type: NachrichtenTyp,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Daten zum Speichern einer neuen Nachricht
///
/// Der Zeitstempel wird vom Aufrufer vergeben (monotone Serveruhr).
#[derive(Debug, Clone)]
pub struct NeueNachricht<'a> {
    pub sender_id: UserId,
    pub ziel: Nachrichtenziel,
    pub message_type: NachrichtenTyp,
    pub content: Option<&'a str>,
    pub file_url: Option<&'a str>,
    pub timestamp: DateTime<Utc>,
}

/// Eintrag der Direktnachrichten-Kontaktliste
#[derive(Debug, Clone)]
pub struct DmKontaktRecord {
    pub benutzer: BenutzerRecord,
    pub last_message_time: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Kanaele
// ---------------------------------------------------------------------------

/// Kanal-Datensatz inklusive Mitgliederliste
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanalRecord {
    pub id: ChannelId,
    pub name: String,
    pub admin_id: UserId,
    /// Mitglieder inklusive Admin
    pub members: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KanalRecord {
    /// Prueft ob ein Benutzer Mitglied (oder Admin) des Kanals ist
    pub fn ist_mitglied(&self, user_id: UserId) -> bool {
        self.admin_id == user_id || self.members.contains(&user_id)
    }
}

/// Daten zum Anlegen eines neuen Kanals
#[derive(Debug, Clone)]
pub struct NeuerKanal<'a> {
    pub name: &'a str,
    pub admin_id: UserId,
    pub members: &'a [UserId],
    pub created_at: DateTime<Utc>,
}
