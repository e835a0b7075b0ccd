//! `GET /ws` – Upgrade auf eine Live-Verbindung
//!
//! Die Identitaet kommt aus `?token=`, `Authorization: Bearer` oder dem
//! `jwt`-Cookie. Ohne gueltige Session wird nicht upgegradet (401).

use axum::{
    extract::{ws::WebSocketUpgrade, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use plauder_auth::Anmeldedaten;
use serde::Deserialize;

use crate::connection::verbindung_bedienen;
use crate::state::RealtimeState;

/// Obergrenze des Transports; darunter lehnt der Codec zu grosse Frames
/// mit einem `error`-Event ab
const TRANSPORT_FAKTOR: usize = 4;

/// Query-Parameter des Upgrades
#[derive(Debug, Default, Deserialize)]
pub struct LiveQuery {
    pub token: Option<String>,
}

/// Router mit der `/ws`-Route
pub fn live_router(state: RealtimeState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state)
}

pub async fn ws_handler(
    State(state): State<RealtimeState>,
    Query(query): Query<LiveQuery>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let daten = Anmeldedaten {
        query_token: query.token.as_deref(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
        cookie_header: headers.get(header::COOKIE).and_then(|v| v.to_str().ok()),
    };

    let user_id = match state.identity.aufloesen(&daten).await {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!(fehler = %e, "Live-Verbindung ohne gueltige Identitaet abgelehnt");
            return (StatusCode::UNAUTHORIZED, e.to_string()).into_response();
        }
    };

    let limit = state.config.max_frame_groesse.saturating_mul(TRANSPORT_FAKTOR);
    ws.max_message_size(limit)
        .on_upgrade(move |socket| verbindung_bedienen(socket, state, user_id))
}
