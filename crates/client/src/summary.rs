//! Uebersichtslisten der Seitenleiste (Kontakte, Kanaele)
//!
//! Beide Listen sind nach juengster Aktivitaet sortiert; ein Eintrag mit
//! neuer Nachricht wandert an Position 0.

use chrono::{DateTime, Utc};
use plauder_core::types::ChannelId;
use plauder_protocol::{KanalInfo, KontaktInfo, ProfilInfo};

/// Eintrag der Kanal-Seitenleiste
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanalEintrag {
    pub id: ChannelId,
    pub name: String,
    pub zuletzt: DateTime<Utc>,
}

impl From<KanalInfo> for KanalEintrag {
    fn from(k: KanalInfo) -> Self {
        Self {
            id: k.id,
            name: k.name,
            zuletzt: k.updated_at,
        }
    }
}

/// Kontakt an den Anfang setzen (bestehender Eintrag wird ersetzt)
pub fn kontakt_nach_oben(
    kontakte: &mut Vec<KontaktInfo>,
    profil: &ProfilInfo,
    zeitpunkt: DateTime<Utc>,
) {
    nach_oben(
        kontakte,
        KontaktInfo {
            profil: profil.clone(),
            last_message_time: zeitpunkt,
        },
        |k| k.profil.id == profil.id,
    );
}

/// Kanal an den Anfang setzen (bestehender Eintrag wird ersetzt)
pub fn kanal_nach_oben(
    kanaele: &mut Vec<KanalEintrag>,
    id: ChannelId,
    name: &str,
    zeitpunkt: DateTime<Utc>,
) {
    nach_oben(
        kanaele,
        KanalEintrag {
            id,
            name: name.to_string(),
            zuletzt: zeitpunkt,
        },
        |k| k.id == id,
    );
}

fn nach_oben<T>(liste: &mut Vec<T>, eintrag: T, gleich: impl Fn(&T) -> bool) {
    liste.retain(|e| !gleich(e));
    liste.insert(0, eintrag);
}

/// Sortiert Kontakte absteigend nach letzter Nachricht
pub fn kontakte_sortieren(kontakte: &mut [KontaktInfo]) {
    kontakte.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
}

/// Sortiert Kanaele absteigend nach letzter Aktivitaet
pub fn kanaele_sortieren(kanaele: &mut [KanalEintrag]) {
    kanaele.sort_by(|a, b| b.zuletzt.cmp(&a.zuletzt));
}
