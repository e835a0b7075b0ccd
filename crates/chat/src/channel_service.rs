//! ChannelService – Kanaele anlegen und auflisten

use std::sync::Arc;

use chrono::Utc;

use plauder_core::types::UserId;
use plauder_core::zeit::auf_mikros;
use plauder_db::{
    models::{KanalRecord, NeuerKanal},
    ChannelRepository, UserRepository,
};
use plauder_protocol::KanalInfo;

use crate::error::{ChatError, ChatResult};

pub struct ChannelService<R>
where
    R: UserRepository + ChannelRepository,
{
    repo: Arc<R>,
}

impl<R> ChannelService<R>
where
    R: UserRepository + ChannelRepository,
{
    pub fn neu(repo: Arc<R>) -> Arc<Self> {
        Arc::new(Self { repo })
    }

    /// Legt einen Kanal an
    ///
    /// Admin und alle Mitglieder muessen existieren. Ist ein Mitglied
    /// unbekannt, wird nichts gespeichert.
    pub async fn kanal_erstellen(
        &self,
        admin_id: UserId,
        name: &str,
        mitglieder: &[UserId],
    ) -> ChatResult<KanalInfo> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChatError::UngueltigeEingabe(
                "Kanalname darf nicht leer sein".into(),
            ));
        }

        UserRepository::get_by_id(self.repo.as_ref(), admin_id)
            .await?
            .ok_or_else(|| ChatError::BenutzerNichtGefunden(admin_id.to_string()))?;

        let gefunden = self.repo.get_many(mitglieder).await?;
        let mut unbekannt: Vec<UserId> = mitglieder
            .iter()
            .filter(|id| !gefunden.iter().any(|b| b.id == **id))
            .copied()
            .collect();
        unbekannt.sort();
        unbekannt.dedup();
        if !unbekannt.is_empty() {
            tracing::debug!(anzahl = unbekannt.len(), "Kanal mit unbekannten Mitgliedern abgelehnt");
            return Err(ChatError::UngueltigeMitglieder(unbekannt));
        }

        let kanal = ChannelRepository::create(
            self.repo.as_ref(),
            NeuerKanal {
                name,
                admin_id,
                members: mitglieder,
                created_at: auf_mikros(Utc::now()),
            },
        )
        .await?;

        tracing::info!(
            channel_id = %kanal.id,
            name = %kanal.name,
            mitglieder = kanal.members.len(),
            "Kanal erstellt"
        );
        Ok(kanal_info(kanal))
    }

    /// Kanaele des Benutzers, zuletzt aktive zuerst
    pub async fn kanaele_von(&self, user_id: UserId) -> ChatResult<Vec<KanalInfo>> {
        let kanaele = self.repo.list_for_user(user_id).await?;
        Ok(kanaele.into_iter().map(kanal_info).collect())
    }
}

/// Konvertiert einen Kanal-Datensatz ins Client-Format
pub fn kanal_info(k: KanalRecord) -> KanalInfo {
    KanalInfo {
        id: k.id,
        name: k.name,
        admin: k.admin_id,
        members: k.members,
        created_at: k.created_at,
        updated_at: k.updated_at,
    }
}
