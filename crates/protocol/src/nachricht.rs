//! Denormalisierte Datensaetze fuer Nachrichten, Kanaele und Kontakte
//!
//! `NachrichtInfo` ist das eine Format, in dem eine Nachricht das System
//! verlaesst: als Live-Push ueber den WebSocket und als Eintrag einer
//! Historien-Abfrage. Beide Wege bauen den Datensatz mit derselben
//! Konvertierung, dadurch sind sie byte-gleich.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use plauder_core::types::{ChannelId, MessageId, UserId};

// ---------------------------------------------------------------------------
// Nachrichtentyp
// ---------------------------------------------------------------------------

/// Art einer Nachricht
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NachrichtenTyp {
    /// Textnachricht, `content` ist gesetzt
    Text,
    /// Dateinachricht, `fileUrl` ist gesetzt
    File,
}

impl NachrichtenTyp {
    /// Speicherform in der Datenbank
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::File => "file",
        }
    }

    /// Parst die Speicherform aus der Datenbank
    pub fn aus_str(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "file" => Some(Self::File),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Oeffentliche Profilfelder eines Benutzers
///
/// Wird in Nachrichten eingebettet, damit der Empfaenger ohne
/// Folgeabfrage rendern kann.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilInfo {
    pub id: UserId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image: Option<String>,
    pub color: i32,
}

impl ProfilInfo {
    /// Anzeigename: "Vorname Nachname" wenn ein Vorname gesetzt ist, sonst die E-Mail
    pub fn anzeigename(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(vorname), Some(nachname)) if !vorname.is_empty() => {
                format!("{} {}", vorname, nachname)
            }
            (Some(vorname), _) if !vorname.is_empty() => vorname.clone(),
            _ => self.email.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Nachrichten
// ---------------------------------------------------------------------------

/// Eine persistierte Nachricht mit eingebetteten Profilen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NachrichtInfo {
    pub id: MessageId,
    pub sender: ProfilInfo,
    /// Empfaenger bei Direktnachrichten
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<ProfilInfo>,
    /// Kanal bei Kanalnachrichten
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<ChannelId>,
    pub message_type: NachrichtenTyp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl NachrichtInfo {
    /// Gibt fuer eine Direktnachricht die Gegenseite aus Sicht von `lokal` zurueck
    ///
    /// Hat `lokal` gesendet, ist es der Empfaenger, sonst der Sender.
    pub fn gegenseite(&self, lokal: UserId) -> &ProfilInfo {
        match &self.receiver {
            Some(empfaenger) if self.sender.id == lokal => empfaenger,
            _ => &self.sender,
        }
    }
}

/// Ziel einer Nachricht: genau eines von Empfaenger oder Kanal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nachrichtenziel {
    Direkt(UserId),
    Kanal(ChannelId),
}

/// Fehler bei der Bestimmung des Nachrichtenziels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ZielFehler {
    #[error("Weder Empfaenger noch Kanal angegeben")]
    KeinZiel,

    #[error("Empfaenger und Kanal gleichzeitig angegeben")]
    BeideZiele,
}

/// Eingehende Sende-Anfrage (REST-Body und Live-Event)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendeAnfrage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<ChannelId>,
    pub message_type: NachrichtenTyp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl SendeAnfrage {
    /// Textnachricht an einen Benutzer
    pub fn text_an(empfaenger: UserId, text: impl Into<String>) -> Self {
        Self {
            receiver: Some(empfaenger),
            channel_id: None,
            message_type: NachrichtenTyp::Text,
            content: Some(text.into()),
            file_url: None,
        }
    }

    /// Textnachricht in einen Kanal
    pub fn text_in_kanal(kanal: ChannelId, text: impl Into<String>) -> Self {
        Self {
            receiver: None,
            channel_id: Some(kanal),
            message_type: NachrichtenTyp::Text,
            content: Some(text.into()),
            file_url: None,
        }
    }

    /// Dateinachricht an einen Benutzer
    pub fn datei_an(empfaenger: UserId, file_url: impl Into<String>) -> Self {
        Self {
            receiver: Some(empfaenger),
            channel_id: None,
            message_type: NachrichtenTyp::File,
            content: None,
            file_url: Some(file_url.into()),
        }
    }

    /// Bestimmt das Ziel; genau eines von `receiver` und `channelId` muss gesetzt sein
    pub fn ziel(&self) -> Result<Nachrichtenziel, ZielFehler> {
        match (self.receiver, self.channel_id) {
            (Some(empfaenger), None) => Ok(Nachrichtenziel::Direkt(empfaenger)),
            (None, Some(kanal)) => Ok(Nachrichtenziel::Kanal(kanal)),
            (None, None) => Err(ZielFehler::KeinZiel),
            (Some(_), Some(_)) => Err(ZielFehler::BeideZiele),
        }
    }
}

// ---------------------------------------------------------------------------
// Kanaele und Kontakte
// ---------------------------------------------------------------------------

/// Kanal-Zusammenfassung (Seitenleiste, Antwort auf Kanal-Erstellung)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanalInfo {
    pub id: ChannelId,
    pub name: String,
    pub admin: UserId,
    pub members: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Eintrag der Direktnachrichten-Kontaktliste
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KontaktInfo {
    #[serde(flatten)]
    pub profil: ProfilInfo,
    /// Zeitpunkt der juengsten Nachricht zwischen den beiden Benutzern
    pub last_message_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profil(vorname: Option<&str>, nachname: Option<&str>) -> ProfilInfo {
        ProfilInfo {
            id: UserId::new(),
            email: "anna@example.org".into(),
            first_name: vorname.map(String::from),
            last_name: nachname.map(String::from),
            image: None,
            color: 0,
        }
    }

    #[test]
    fn anzeigename_faellt_auf_email_zurueck() {
        assert_eq!(profil(Some("Anna"), Some("Berg")).anzeigename(), "Anna Berg");
        assert_eq!(profil(None, None).anzeigename(), "anna@example.org");
        assert_eq!(profil(Some(""), Some("Berg")).anzeigename(), "anna@example.org");
    }

    #[test]
    fn dateinachricht_ohne_inhalt_serialisiert_ohne_content() {
        let nachricht = NachrichtInfo {
            id: MessageId::new(),
            sender: profil(Some("Anna"), None),
            receiver: Some(profil(None, None)),
            channel_id: None,
            message_type: NachrichtenTyp::File,
            content: None,
            file_url: Some("/files/1/bericht.pdf".into()),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&nachricht).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["messageType"], "file");
        assert_eq!(json["fileUrl"], "/files/1/bericht.pdf");
        assert!(json.get("channelId").is_none());
    }

    #[test]
    fn gegenseite_haengt_vom_lokalen_benutzer_ab() {
        let sender = profil(Some("Anna"), None);
        let empfaenger = profil(Some("Ben"), None);
        let nachricht = NachrichtInfo {
            id: MessageId::new(),
            sender: sender.clone(),
            receiver: Some(empfaenger.clone()),
            channel_id: None,
            message_type: NachrichtenTyp::Text,
            content: Some("hi".into()),
            file_url: None,
            timestamp: Utc::now(),
        };
        assert_eq!(nachricht.gegenseite(sender.id).id, empfaenger.id);
        assert_eq!(nachricht.gegenseite(empfaenger.id).id, sender.id);
    }

    #[test]
    fn direktnachricht_serialisiert_receiver() {
        let empfaenger = profil(Some("Ben"), None);
        let nachricht = NachrichtInfo {
            id: MessageId::new(),
            sender: profil(Some("Anna"), None),
            receiver: Some(empfaenger.clone()),
            channel_id: None,
            message_type: NachrichtenTyp::Text,
            content: Some("hi".into()),
            file_url: None,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&nachricht).unwrap();
        assert_eq!(json["receiver"]["id"], serde_json::json!(empfaenger.id));
        assert!(json.get("recipient").is_none());

        let zurueck: NachrichtInfo = serde_json::from_value(json).unwrap();
        assert_eq!(zurueck, nachricht);
    }

    #[test]
    fn ziel_verlangt_genau_ein_ziel() {
        let mut anfrage = SendeAnfrage::text_an(UserId::new(), "hi");
        assert!(matches!(anfrage.ziel(), Ok(Nachrichtenziel::Direkt(_))));

        anfrage.channel_id = Some(ChannelId::new());
        assert_eq!(anfrage.ziel(), Err(ZielFehler::BeideZiele));

        anfrage.receiver = None;
        assert!(matches!(anfrage.ziel(), Ok(Nachrichtenziel::Kanal(_))));

        anfrage.channel_id = None;
        assert_eq!(anfrage.ziel(), Err(ZielFehler::KeinZiel));
    }

    #[test]
    fn sende_anfrage_liest_receiver() {
        let id = UserId::new();
        let json = format!(r#"{{"receiver":"{}","messageType":"text","content":"hallo"}}"#, id);
        let anfrage: SendeAnfrage = serde_json::from_str(&json).unwrap();
        assert_eq!(anfrage.receiver, Some(id));
        assert_eq!(anfrage.content.as_deref(), Some("hallo"));
    }

    #[test]
    fn kontakt_info_ist_flach() {
        let kontakt = KontaktInfo {
            profil: profil(Some("Anna"), Some("Berg")),
            last_message_time: Utc::now(),
        };
        let json = serde_json::to_value(&kontakt).unwrap();
        assert_eq!(json["firstName"], "Anna");
        assert!(json.get("lastMessageTime").is_some());
        assert!(json.get("profil").is_none());
    }
}
