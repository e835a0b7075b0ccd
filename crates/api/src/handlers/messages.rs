//! REST-Handler fuer Direktnachrichten (`/api/messages/...`)

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use plauder_core::types::UserId;
use plauder_protocol::{Nachrichtenziel, SendeAnfrage};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::handlers::upload_lesen;
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
pub struct HistorienBody {
    pub id: Option<UserId>,
}

/// POST /api/messages/get-messages
pub async fn get_messages(
    State(state): State<ApiState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<HistorienBody>,
) -> ApiResult<Json<Value>> {
    let anderer = body
        .id
        .ok_or_else(|| ApiError::UngueltigeAnfrage("id des Gespraechspartners fehlt".into()))?;
    let nachrichten = state.chat.direkt_historie(user_id, anderer).await?;
    Ok(Json(json!({ "messages": nachrichten })))
}

/// POST /api/messages/send-message
///
/// Gleicher Pfad wie das Live-Event `sendMessage`: speichern, dann verteilen.
pub async fn send_message(
    State(state): State<ApiState>,
    AuthUser(user_id): AuthUser,
    Json(anfrage): Json<SendeAnfrage>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    if !matches!(anfrage.ziel(), Ok(Nachrichtenziel::Direkt(_))) {
        return Err(ApiError::UngueltigeAnfrage(
            "Direktnachricht braucht genau einen Empfaenger und keinen Kanal".into(),
        ));
    }

    let zustellung = state.dispatcher.senden(user_id, &anfrage).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": zustellung.nachricht() })),
    ))
}

/// POST /api/messages/upload-file (Multipart-Feld `file`)
pub async fn upload_file(
    State(state): State<ApiState>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let upload = upload_lesen(&mut multipart, "file").await?;
    let url = state
        .dateien
        .datei_hochladen(user_id, &upload.dateiname, &upload.mime_type, &upload.daten)
        .await?;
    Ok(Json(json!({ "filePath": url })))
}
