//! ChatService – Nachrichten validieren, speichern und Historien laden
//!
//! Historien und Live-Pushes bauen ihre Datensaetze mit derselben
//! Konvertierung (`nachricht_info`), damit eine live empfangene Nachricht
//! identisch zum spaeteren Historien-Eintrag ist.

use std::collections::HashMap;
use std::sync::Arc;

use plauder_core::types::{ChannelId, UserId};
use plauder_core::MonotoneUhr;
use plauder_db::{
    models::{BenutzerRecord, NachrichtRecord, NeueNachricht},
    ChannelRepository, MessageRepository, UserRepository,
};
use plauder_protocol::{
    KanalNachricht, NachrichtInfo, NachrichtenTyp, Nachrichtenziel, ProfilInfo, SendeAnfrage,
};

use crate::{
    error::{ChatError, ChatResult},
    types::Zustellung,
};

/// Maximale Laenge einer Textnachricht in Zeichen
pub const MAX_TEXT_LAENGE: usize = 4096;

/// ChatService verwaltet Direkt- und Kanalnachrichten
pub struct ChatService<R>
where
    R: UserRepository + MessageRepository + ChannelRepository,
{
    repo: Arc<R>,
    uhr: MonotoneUhr,
}

impl<R> ChatService<R>
where
    R: UserRepository + MessageRepository + ChannelRepository,
{
    pub fn neu(repo: Arc<R>) -> Arc<Self> {
        Arc::new(Self {
            repo,
            uhr: MonotoneUhr::neu(),
        })
    }

    /// Validiert und speichert eine Nachricht
    ///
    /// Gibt die `Zustellung` zurueck, die erst nach erfolgreichem
    /// Speichern existiert. Schlaegt das Speichern fehl, gibt es nichts
    /// zuzustellen.
    pub async fn nachricht_senden(
        &self,
        sender_id: UserId,
        anfrage: &SendeAnfrage,
    ) -> ChatResult<Zustellung> {
        let ziel = anfrage
            .ziel()
            .map_err(|e| ChatError::UngueltigeNachricht(e.to_string()))?;
        let (content, file_url) = inhalt_pruefen(anfrage)?;

        let sender = UserRepository::get_by_id(self.repo.as_ref(), sender_id)
            .await?
            .ok_or_else(|| ChatError::BenutzerNichtGefunden(sender_id.to_string()))?;

        match ziel {
            Nachrichtenziel::Direkt(empfaenger_id) => {
                let empfaenger = UserRepository::get_by_id(self.repo.as_ref(), empfaenger_id)
                    .await?
                    .ok_or_else(|| ChatError::BenutzerNichtGefunden(empfaenger_id.to_string()))?;

                let record = self
                    .speichern(sender_id, ziel, anfrage.message_type, content, file_url)
                    .await?;

                let profile = profil_map([&sender, &empfaenger]);
                let info = nachricht_info(&record, &profile)?;
                tracing::debug!(
                    message_id = %record.id,
                    sender = %sender_id,
                    empfaenger = %empfaenger_id,
                    "Direktnachricht gespeichert"
                );
                Ok(Zustellung::Direkt(info))
            }
            Nachrichtenziel::Kanal(channel_id) => {
                let kanal = ChannelRepository::get_by_id(self.repo.as_ref(), channel_id)
                    .await?
                    .ok_or_else(|| ChatError::KanalNichtGefunden(channel_id.to_string()))?;

                if !kanal.ist_mitglied(sender_id) {
                    return Err(ChatError::KeineBerechtigung(
                        "Nur Mitglieder koennen in diesen Kanal schreiben".into(),
                    ));
                }

                let record = self
                    .speichern(sender_id, ziel, anfrage.message_type, content, file_url)
                    .await?;

                let profile = profil_map([&sender]);
                let info = nachricht_info(&record, &profile)?;
                tracing::debug!(
                    message_id = %record.id,
                    sender = %sender_id,
                    channel_id = %channel_id,
                    "Kanalnachricht gespeichert"
                );

                let mut mitglieder = kanal.members.clone();
                if !mitglieder.contains(&kanal.admin_id) {
                    mitglieder.push(kanal.admin_id);
                }

                Ok(Zustellung::Kanal {
                    nachricht: KanalNachricht {
                        nachricht: info,
                        channel_name: kanal.name,
                    },
                    mitglieder,
                })
            }
        }
    }

    async fn speichern(
        &self,
        sender_id: UserId,
        ziel: Nachrichtenziel,
        message_type: NachrichtenTyp,
        content: Option<&str>,
        file_url: Option<&str>,
    ) -> ChatResult<NachrichtRecord> {
        let record = MessageRepository::create(
            self.repo.as_ref(),
            NeueNachricht {
                sender_id,
                ziel,
                message_type,
                content,
                file_url,
                timestamp: self.uhr.jetzt(),
            },
        )
        .await?;
        Ok(record)
    }

    /// Direktnachrichten zwischen zwei Benutzern, aufsteigend nach Zeit
    pub async fn direkt_historie(
        &self,
        user_id: UserId,
        anderer: UserId,
    ) -> ChatResult<Vec<NachrichtInfo>> {
        let records = self.repo.direct_history(user_id, anderer).await?;
        self.anreichern(&records).await
    }

    /// Nachrichten eines Kanals, aufsteigend nach Zeit
    ///
    /// Nur Mitglieder duerfen die Historie lesen.
    pub async fn kanal_historie(
        &self,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> ChatResult<Vec<NachrichtInfo>> {
        let kanal = ChannelRepository::get_by_id(self.repo.as_ref(), channel_id)
            .await?
            .ok_or_else(|| ChatError::KanalNichtGefunden(channel_id.to_string()))?;

        if !kanal.ist_mitglied(user_id) {
            return Err(ChatError::KeineBerechtigung(
                "Nur Mitglieder koennen diesen Kanal lesen".into(),
            ));
        }

        let records = self.repo.channel_history(channel_id).await?;
        self.anreichern(&records).await
    }

    /// Laedt alle beteiligten Profile und baut die denormalisierten Datensaetze
    async fn anreichern(&self, records: &[NachrichtRecord]) -> ChatResult<Vec<NachrichtInfo>> {
        let mut ids: Vec<UserId> = Vec::new();
        for r in records {
            for id in std::iter::once(r.sender_id).chain(r.recipient_id) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }

        let benutzer = self.repo.get_many(&ids).await?;
        let profile = profil_map(benutzer.iter());

        records.iter().map(|r| nachricht_info(r, &profile)).collect()
    }
}

/// Prueft Inhalt und Datei-URL gegen den Nachrichtentyp
fn inhalt_pruefen(anfrage: &SendeAnfrage) -> ChatResult<(Option<&str>, Option<&str>)> {
    let content = anfrage.content.as_deref().filter(|c| !c.is_empty());
    let file_url = anfrage.file_url.as_deref().filter(|u| !u.is_empty());

    match anfrage.message_type {
        NachrichtenTyp::Text => {
            let text = content
                .filter(|c| !c.trim().is_empty())
                .ok_or_else(|| {
                    ChatError::UngueltigeNachricht("Nachrichteninhalt darf nicht leer sein".into())
                })?;
            let laenge = text.chars().count();
            if laenge > MAX_TEXT_LAENGE {
                return Err(ChatError::UngueltigeNachricht(format!(
                    "Nachricht zu lang: {laenge} Zeichen (Maximum: {MAX_TEXT_LAENGE})"
                )));
            }
            if file_url.is_some() {
                return Err(ChatError::UngueltigeNachricht(
                    "Textnachricht darf keine Datei-URL haben".into(),
                ));
            }
            Ok((Some(text), None))
        }
        NachrichtenTyp::File => {
            let url = file_url.ok_or_else(|| {
                ChatError::UngueltigeNachricht("Dateinachricht ohne Datei-URL".into())
            })?;
            if content.is_some() {
                return Err(ChatError::UngueltigeNachricht(
                    "Dateinachricht darf keinen Textinhalt haben".into(),
                ));
            }
            Ok((None, Some(url)))
        }
    }
}

fn profil_map<'a>(
    benutzer: impl IntoIterator<Item = &'a BenutzerRecord>,
) -> HashMap<UserId, ProfilInfo> {
    benutzer.into_iter().map(|b| (b.id, profil_info(b))).collect()
}

/// Oeffentliche Profilfelder eines Benutzers
pub fn profil_info(b: &BenutzerRecord) -> ProfilInfo {
    ProfilInfo {
        id: b.id,
        email: b.email.clone(),
        first_name: b.first_name.clone(),
        last_name: b.last_name.clone(),
        image: b.image.clone(),
        color: b.color,
    }
}

/// Baut aus einem Datensatz und den Profilen das Client-Format
pub fn nachricht_info(
    record: &NachrichtRecord,
    profile: &HashMap<UserId, ProfilInfo>,
) -> ChatResult<NachrichtInfo> {
    let profil = |id: UserId| {
        profile
            .get(&id)
            .cloned()
            .ok_or_else(|| ChatError::BenutzerNichtGefunden(id.to_string()))
    };

    Ok(NachrichtInfo {
        id: record.id,
        sender: profil(record.sender_id)?,
        receiver: record.recipient_id.map(profil).transpose()?,
        channel_id: record.channel_id,
        message_type: record.message_type,
        content: record.content.clone(),
        file_url: record.file_url.clone(),
        timestamp: record.timestamp,
    })
}
