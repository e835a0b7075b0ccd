//! Blob-Ablage fuer Datei-Uploads
//!
//! Der `BlobStore` nimmt Bytes entgegen und liefert die oeffentliche URL,
//! unter der der Web-Layer die Datei ausliefert.

use std::path::{Component, Path, PathBuf};

use crate::error::{ChatError, ChatResult};

/// Abstrakte Ablage fuer Dateien
#[allow(async_fn_in_trait)]
pub trait BlobStore: Send + Sync {
    /// Legt Daten unter dem relativen Pfad ab und gibt die oeffentliche URL zurueck
    async fn ablegen(&self, pfad: &str, data: &[u8]) -> ChatResult<String>;

    /// Entfernt eine zuvor abgelegte Datei anhand ihrer URL
    ///
    /// Fehlende Dateien sind kein Fehler.
    async fn entfernen(&self, url: &str) -> ChatResult<()>;
}

/// Disk-basierte Ablage
///
/// Speichert Dateien unter `base_dir/<pfad>` und liefert `url_prefix/<pfad>`.
#[derive(Debug, Clone)]
pub struct DiskStorage {
    base_dir: PathBuf,
    url_prefix: String,
}

impl DiskStorage {
    pub fn new(base_dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Vollstaendiger Dateipfad; nur einfache relative Pfade sind erlaubt
    fn full_path(&self, pfad: &str) -> ChatResult<PathBuf> {
        let relativ = Path::new(pfad);
        let sauber = relativ
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !sauber || pfad.is_empty() {
            return Err(ChatError::SpeicherFehler(format!("Ungueltiger Pfad: {pfad}")));
        }
        Ok(self.base_dir.join(relativ))
    }
}

impl BlobStore for DiskStorage {
    async fn ablegen(&self, pfad: &str, data: &[u8]) -> ChatResult<String> {
        let full = self.full_path(pfad)?;

        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full, data).await?;
        tracing::debug!(path = %full.display(), bytes = data.len(), "Datei gespeichert");
        Ok(format!("{}/{}", self.url_prefix, pfad))
    }

    async fn entfernen(&self, url: &str) -> ChatResult<()> {
        let pfad = url
            .strip_prefix(&self.url_prefix)
            .map(|p| p.trim_start_matches('/'))
            .ok_or_else(|| ChatError::SpeicherFehler(format!("Fremde URL: {url}")))?;
        let full = self.full_path(pfad)?;

        match tokio::fs::remove_file(&full).await {
            Ok(()) => {
                tracing::debug!(path = %full.display(), "Datei geloescht");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
