//! Extraktoren fuer authentifizierte Anfragen

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts, Query},
    http::{header, request::Parts, HeaderMap},
};
use plauder_auth::{Anmeldedaten, IdentityContext};
use plauder_core::types::UserId;
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Baut die Anmeldedaten aus Query-Token und Headern
pub fn anmeldedaten<'a>(query_token: Option<&'a str>, headers: &'a HeaderMap) -> Anmeldedaten<'a> {
    Anmeldedaten {
        query_token,
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
        cookie_header: headers.get(header::COOKIE).and_then(|v| v.to_str().ok()),
    }
}

/// Der angemeldete Benutzer einer Anfrage
///
/// Ohne gueltige Session antwortet der Extraktor mit 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    IdentityContext: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = IdentityContext::from_ref(state);
        let query = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .map(|Query(q)| q)
            .unwrap_or_default();

        let daten = anmeldedaten(query.token.as_deref(), &parts.headers);
        let user_id = identity.aufloesen(&daten).await?;
        Ok(Self(user_id))
    }
}
