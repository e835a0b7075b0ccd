//! ContactService – Kontaktsuche und Kontaktlisten

use std::sync::Arc;

use plauder_core::types::UserId;
use plauder_db::{MessageRepository, UserRepository};
use plauder_protocol::{KontaktInfo, ProfilInfo};

use crate::error::ChatResult;
use crate::service::profil_info;
use crate::types::KontaktOption;

pub struct ContactService<R>
where
    R: UserRepository + MessageRepository,
{
    repo: Arc<R>,
}

impl<R> ContactService<R>
where
    R: UserRepository + MessageRepository,
{
    pub fn neu(repo: Arc<R>) -> Arc<Self> {
        Arc::new(Self { repo })
    }

    /// Sucht andere Benutzer per Teilstring in Name oder E-Mail
    ///
    /// Der Suchbegriff wird woertlich und ohne Beachtung der
    /// Gross-/Kleinschreibung verglichen. Ein leerer Begriff findet alle.
    pub async fn suchen(&self, user_id: UserId, begriff: &str) -> ChatResult<Vec<ProfilInfo>> {
        let treffer = self.repo.search(user_id, begriff).await?;
        Ok(treffer.iter().map(profil_info).collect())
    }

    /// Gespraechspartner mit der juengsten Nachricht zuerst
    pub async fn dm_kontakte(&self, user_id: UserId) -> ChatResult<Vec<KontaktInfo>> {
        let kontakte = self.repo.dm_contacts(user_id).await?;
        Ok(kontakte
            .iter()
            .map(|k| KontaktInfo {
                profil: profil_info(&k.benutzer),
                last_message_time: k.last_message_time,
            })
            .collect())
    }

    /// Alle anderen Benutzer als Auswahlliste
    pub async fn alle_kontakte(&self, user_id: UserId) -> ChatResult<Vec<KontaktOption>> {
        let benutzer = self.repo.list_others(user_id).await?;
        Ok(benutzer
            .iter()
            .map(|b| KontaktOption {
                label: profil_info(b).anzeigename(),
                value: b.id,
            })
            .collect())
    }
}
