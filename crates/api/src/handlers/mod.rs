//! REST-Handler, nach Bereich gruppiert

pub mod auth;
pub mod channels;
pub mod contacts;
pub mod messages;

use axum::{body::Bytes, extract::Multipart};

use crate::error::{ApiError, ApiResult};

/// Eine hochgeladene Datei aus einem Multipart-Formular
#[derive(Debug)]
pub(crate) struct Upload {
    pub dateiname: String,
    pub mime_type: String,
    pub daten: Bytes,
}

/// Liest das Feld `feld` aus dem Formular; andere Felder werden uebersprungen
pub(crate) async fn upload_lesen(multipart: &mut Multipart, feld: &str) -> ApiResult<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::UngueltigeAnfrage(format!("Multipart-Fehler: {e}")))?
    {
        if field.name() != Some(feld) {
            continue;
        }

        let dateiname = field.file_name().unwrap_or_default().to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let daten = field
            .bytes()
            .await
            .map_err(|e| ApiError::UngueltigeAnfrage(format!("Feld nicht lesbar: {e}")))?;

        return Ok(Upload {
            dateiname,
            mime_type,
            daten,
        });
    }

    Err(ApiError::UngueltigeAnfrage(format!(
        "Feld '{feld}' fehlt im Formular"
    )))
}
