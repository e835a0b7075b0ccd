//! REST-Handler fuer Kanaele (`/api/channel/...`)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use plauder_core::types::{ChannelId, UserId};
use plauder_protocol::{Nachrichtenziel, SendeAnfrage};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
pub struct KanalErstellenBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub members: Vec<UserId>,
}

/// POST /api/channel/create-channel
pub async fn create_channel(
    State(state): State<ApiState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<KanalErstellenBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let kanal = state
        .kanaele
        .kanal_erstellen(user_id, &body.name, &body.members)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "channel": kanal }))))
}

/// GET /api/channel/get-user-channels
pub async fn user_channels(
    State(state): State<ApiState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Value>> {
    let kanaele = state.kanaele.kanaele_von(user_id).await?;
    Ok(Json(json!({ "channels": kanaele })))
}

/// GET /api/channel/get-channel-messages/:channelId
pub async fn channel_messages(
    State(state): State<ApiState>,
    AuthUser(user_id): AuthUser,
    Path(kanal_id): Path<ChannelId>,
) -> ApiResult<Json<Value>> {
    let nachrichten = state.chat.kanal_historie(user_id, kanal_id).await?;
    Ok(Json(json!({ "messages": nachrichten })))
}

/// POST /api/channel/send-message
pub async fn send_message(
    State(state): State<ApiState>,
    AuthUser(user_id): AuthUser,
    Json(anfrage): Json<SendeAnfrage>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    if !matches!(anfrage.ziel(), Ok(Nachrichtenziel::Kanal(_))) {
        return Err(ApiError::UngueltigeAnfrage(
            "Kanalnachricht braucht genau eine channelId und keinen Empfaenger".into(),
        ));
    }

    let zustellung = state.dispatcher.senden(user_id, &anfrage).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": zustellung.nachricht() })),
    ))
}
