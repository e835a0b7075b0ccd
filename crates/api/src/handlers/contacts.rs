//! REST-Handler fuer Kontakte (`/api/contacts/...`)

use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuchBody {
    pub search_term: Option<String>,
}

/// POST /api/contacts/search
///
/// Ein leerer Suchbegriff ist erlaubt, ein fehlender nicht.
pub async fn search(
    State(state): State<ApiState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<SuchBody>,
) -> ApiResult<Json<Value>> {
    let begriff = body
        .search_term
        .ok_or_else(|| ApiError::UngueltigeAnfrage("searchTerm ist erforderlich".into()))?;
    let kontakte = state.kontakte.suchen(user_id, &begriff).await?;
    Ok(Json(json!({ "contacts": kontakte })))
}

/// GET /api/contacts/get-contacts-for-dm
pub async fn contacts_for_dm(
    State(state): State<ApiState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Value>> {
    let kontakte = state.kontakte.dm_kontakte(user_id).await?;
    Ok(Json(json!({ "contacts": kontakte })))
}

/// GET /api/contacts/get-all-contacts
pub async fn all_contacts(
    State(state): State<ApiState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Value>> {
    let kontakte = state.kontakte.alle_kontakte(user_id).await?;
    Ok(Json(json!({ "contacts": kontakte })))
}
