//! REST-Handler fuer Anmeldung und Profil (`/api/auth/...`)

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use plauder_auth::{Session, SESSION_COOKIE};
use plauder_core::types::UserId;
use plauder_db::models::BenutzerRecord;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::extract::{anmeldedaten, AuthUser};
use crate::handlers::upload_lesen;
use crate::state::ApiState;

/// Benutzerdaten, wie sie der Client sieht (ohne Passwort-Hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenutzerAntwort {
    pub id: UserId,
    pub email: String,
    pub profile_setup: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image: Option<String>,
    pub color: i32,
}

impl From<BenutzerRecord> for BenutzerAntwort {
    fn from(b: BenutzerRecord) -> Self {
        Self {
            id: b.id,
            email: b.email,
            profile_setup: b.profile_setup,
            first_name: b.first_name,
            last_name: b.last_name,
            image: b.image,
            color: b.color,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnmeldeBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub color: Option<i32>,
}

/// `Set-Cookie` fuer eine neue Session
fn session_cookie(session: &Session) -> String {
    let max_age = (session.laeuft_ab_am - session.erstellt_am).num_seconds();
    format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=None; Secure; Max-Age={max_age}",
        session.token
    )
}

/// `Set-Cookie`, das die Session im Browser loescht
fn cookie_loeschen() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=None; Secure; Max-Age=0")
}

fn mit_cookie(status: StatusCode, cookie: String, body: serde_json::Value) -> ApiResult<Response> {
    let wert = HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::Intern(format!("Cookie nicht darstellbar: {e}")))?;
    Ok((status, [(header::SET_COOKIE, wert)], Json(body)).into_response())
}

fn sitzungs_antwort(
    status: StatusCode,
    benutzer: BenutzerRecord,
    session: &Session,
) -> ApiResult<Response> {
    mit_cookie(
        status,
        session_cookie(session),
        json!({
            "user": BenutzerAntwort::from(benutzer),
            "token": session.token,
        }),
    )
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<ApiState>,
    Json(body): Json<AnmeldeBody>,
) -> ApiResult<Response> {
    let (benutzer, session) = state.auth.registrieren(&body.email, &body.password).await?;
    sitzungs_antwort(StatusCode::CREATED, benutzer, &session)
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ApiState>,
    Json(body): Json<AnmeldeBody>,
) -> ApiResult<Response> {
    let (benutzer, session) = state.auth.anmelden(&body.email, &body.password).await?;
    sitzungs_antwort(StatusCode::OK, benutzer, &session)
}

/// POST /api/auth/logout
///
/// Invalidiert die vorgelegte Session (falls vorhanden) und loescht das Cookie.
pub async fn logout(State(state): State<ApiState>, headers: HeaderMap) -> ApiResult<Response> {
    if let Some(token) = anmeldedaten(None, &headers).token() {
        state.auth.abmelden(token).await;
    }
    mit_cookie(
        StatusCode::OK,
        cookie_loeschen(),
        json!({ "message": "Abgemeldet" }),
    )
}

/// GET /api/auth/user-info
pub async fn user_info(
    State(state): State<ApiState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<BenutzerAntwort>> {
    let benutzer = state.auth.benutzer_info(user_id).await?;
    Ok(Json(benutzer.into()))
}

/// POST /api/auth/update-profile
pub async fn update_profile(
    State(state): State<ApiState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<ProfilBody>,
) -> ApiResult<Json<BenutzerAntwort>> {
    let benutzer = state
        .auth
        .profil_aktualisieren(
            user_id,
            body.first_name.as_deref(),
            body.last_name.as_deref(),
            body.color,
        )
        .await?;
    Ok(Json(benutzer.into()))
}

/// POST /api/auth/add-profile-image (Multipart-Feld `profile-image`)
pub async fn add_profile_image(
    State(state): State<ApiState>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let upload = upload_lesen(&mut multipart, "profile-image").await?;
    let url = state
        .dateien
        .profilbild_hochladen(user_id, &upload.dateiname, &upload.mime_type, &upload.daten)
        .await?;

    let vorher = state.auth.benutzer_info(user_id).await?.image;
    let benutzer = state.auth.profilbild_setzen(user_id, &url).await?;
    if let Some(alt) = vorher.filter(|alt| *alt != url) {
        state.dateien.entfernen(&alt).await;
    }

    Ok(Json(json!({ "image": benutzer.image })))
}

/// DELETE /api/auth/remove-profile-image
pub async fn remove_profile_image(
    State(state): State<ApiState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<impl IntoResponse> {
    let url = state
        .auth
        .profilbild_entfernen(user_id)
        .await?
        .ok_or_else(|| ApiError::NichtGefunden("Kein Profilbild vorhanden".into()))?;

    state.dateien.entfernen(&url).await;
    Ok(Json(json!({ "message": "Profilbild entfernt" })))
}
