//! FileService – Datei-Uploads mit MIME-Allowlist und Groessenlimit

use std::sync::Arc;

use chrono::Utc;

use plauder_core::types::UserId;

use crate::{
    error::{ChatError, ChatResult},
    storage::BlobStore,
};

/// Erlaubte MIME-Typen fuer Datei-Nachrichten
pub const ERLAUBTE_DATEITYPEN: &[&str] = &[
    "application/zip",
    "application/x-zip-compressed",
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
];

/// Erlaubte MIME-Typen fuer Profilbilder
const PROFILBILD_TYPEN: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

pub struct FileService<S: BlobStore> {
    storage: Arc<S>,
    max_groesse: usize,
}

impl<S: BlobStore> FileService<S> {
    pub fn neu(storage: Arc<S>, max_groesse: usize) -> Arc<Self> {
        Arc::new(Self {
            storage,
            max_groesse,
        })
    }

    /// Laedt eine Datei fuer eine Datei-Nachricht hoch und gibt ihre URL zurueck
    pub async fn datei_hochladen(
        &self,
        user_id: UserId,
        dateiname: &str,
        mime_type: &str,
        data: &[u8],
    ) -> ChatResult<String> {
        self.pruefen(mime_type, ERLAUBTE_DATEITYPEN, data.len())?;
        let name = dateiname_bereinigen(dateiname)?;

        let pfad = format!("files/{}/{}", Utc::now().timestamp_millis(), name);
        let url = self.storage.ablegen(&pfad, data).await?;

        tracing::info!(user_id = %user_id, url = %url, size = data.len(), "Datei hochgeladen");
        Ok(url)
    }

    /// Laedt ein Profilbild hoch und gibt seine URL zurueck
    pub async fn profilbild_hochladen(
        &self,
        user_id: UserId,
        dateiname: &str,
        mime_type: &str,
        data: &[u8],
    ) -> ChatResult<String> {
        self.pruefen(mime_type, PROFILBILD_TYPEN, data.len())?;
        let name = dateiname_bereinigen(dateiname)?;

        let pfad = format!("profiles/{}-{}", Utc::now().timestamp_millis(), name);
        let url = self.storage.ablegen(&pfad, data).await?;

        tracing::info!(user_id = %user_id, url = %url, "Profilbild hochgeladen");
        Ok(url)
    }

    /// Entfernt eine abgelegte Datei; Fehler werden nur geloggt
    pub async fn entfernen(&self, url: &str) {
        if let Err(e) = self.storage.entfernen(url).await {
            tracing::warn!(fehler = %e, url = %url, "Datei konnte nicht entfernt werden");
        }
    }

    fn pruefen(&self, mime_type: &str, erlaubt: &[&str], groesse: usize) -> ChatResult<()> {
        if !erlaubt.contains(&mime_type) {
            return Err(ChatError::DateitypNichtErlaubt(mime_type.to_string()));
        }
        if groesse == 0 {
            return Err(ChatError::UngueltigeEingabe("Datei ist leer".into()));
        }
        if groesse > self.max_groesse {
            return Err(ChatError::DateiZuGross {
                size: groesse,
                max: self.max_groesse,
            });
        }
        Ok(())
    }
}

/// Letzte Pfadkomponente des Dateinamens, Leerzeichen durch Bindestriche ersetzt
pub fn dateiname_bereinigen(dateiname: &str) -> ChatResult<String> {
    let name = dateiname
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .replace(' ', "-");

    if name.is_empty() || name == "." || name == ".." {
        return Err(ChatError::UngueltigeEingabe(
            "Dateiname darf nicht leer sein".into(),
        ));
    }
    Ok(name)
}
