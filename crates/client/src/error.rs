//! Fehlertypen fuer den Client-Zustand

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Aktion erfordert eine verbundene Sitzung
    #[error("Sitzung ist nicht verbunden")]
    NichtVerbunden,

    #[error("Sitzung ist bereits verbunden")]
    BereitsVerbunden,

    /// Historie oder Uebersicht konnte nicht geladen werden
    #[error("Laden fehlgeschlagen: {0}")]
    Laden(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
