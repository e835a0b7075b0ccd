//! Identitaetsaufloesung fuer eingehende Anfragen
//!
//! Der `IdentityContext` bestimmt aus den Credentials einer Anfrage die
//! Benutzer-ID. Reihenfolge der Token-Quellen:
//!
//! 1. Query-Parameter `token` (WebSocket-Upgrade aus dem Browser)
//! 2. `Authorization: Bearer <token>`
//! 3. Cookie `jwt`

use std::sync::Arc;

use plauder_core::types::UserId;

use crate::error::{AuthError, AuthResult};
use crate::session::SessionStore;

/// Name des Session-Cookies
pub const SESSION_COOKIE: &str = "jwt";

/// Rohe Credentials einer Anfrage, wie sie der Web-Layer vorfindet
#[derive(Debug, Clone, Copy, Default)]
pub struct Anmeldedaten<'a> {
    pub query_token: Option<&'a str>,
    pub authorization: Option<&'a str>,
    pub cookie_header: Option<&'a str>,
}

impl<'a> Anmeldedaten<'a> {
    /// Waehlt den Token aus der ersten vorhandenen Quelle
    pub fn token(&self) -> Option<&'a str> {
        if let Some(t) = self.query_token.filter(|t| !t.is_empty()) {
            return Some(t);
        }
        if let Some(t) = self
            .authorization
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            return Some(t);
        }
        self.cookie_header
            .and_then(|h| cookie_wert(h, SESSION_COOKIE))
            .filter(|t| !t.is_empty())
    }
}

/// Sucht einen Cookie-Wert im `Cookie`-Header (`a=1; b=2`)
fn cookie_wert<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|teil| {
        let (k, v) = teil.trim().split_once('=')?;
        (k == name).then_some(v)
    })
}

/// Loest Credentials zur Benutzer-ID auf
#[derive(Debug, Clone)]
pub struct IdentityContext {
    sessions: Arc<SessionStore>,
}

impl IdentityContext {
    pub fn neu(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    /// Bestimmt die Benutzer-ID; fehlende Credentials ergeben `NichtAngemeldet`
    pub async fn aufloesen(&self, daten: &Anmeldedaten<'_>) -> AuthResult<UserId> {
        let token = daten.token().ok_or(AuthError::NichtAngemeldet)?;
        let session = self.sessions.validieren(token).await?;
        Ok(session.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_token_hat_vorrang() {
        let daten = Anmeldedaten {
            query_token: Some("q"),
            authorization: Some("Bearer b"),
            cookie_header: Some("jwt=c"),
        };
        assert_eq!(daten.token(), Some("q"));
    }

    #[test]
    fn bearer_vor_cookie() {
        let daten = Anmeldedaten {
            query_token: Some(""),
            authorization: Some("Bearer b"),
            cookie_header: Some("jwt=c"),
        };
        assert_eq!(daten.token(), Some("b"));
    }

    #[test]
    fn cookie_wird_aus_header_gelesen() {
        let daten = Anmeldedaten {
            cookie_header: Some("theme=dunkel; jwt=abc123; lang=de"),
            ..Default::default()
        };
        assert_eq!(daten.token(), Some("abc123"));
        assert_eq!(Anmeldedaten::default().token(), None);
    }

    #[tokio::test]
    async fn aufloesen_mit_gueltiger_session() {
        let store = SessionStore::neu();
        let user = UserId::new();
        let session = store.erstellen(user).await;

        let ctx = IdentityContext::neu(store);
        let daten = Anmeldedaten {
            query_token: Some(session.token.as_str()),
            ..Default::default()
        };
        assert_eq!(ctx.aufloesen(&daten).await.unwrap(), user);
    }

    #[tokio::test]
    async fn aufloesen_ohne_oder_mit_falschem_token() {
        let ctx = IdentityContext::neu(SessionStore::neu());
        let ohne = ctx.aufloesen(&Anmeldedaten::default()).await;
        assert!(matches!(ohne, Err(AuthError::NichtAngemeldet)));

        let falsch = ctx
            .aufloesen(&Anmeldedaten {
                authorization: Some("Bearer unbekannt"),
                ..Default::default()
            })
            .await;
        assert!(matches!(falsch, Err(AuthError::SessionUngueltig)));
        assert!(falsch.unwrap_err().ist_nicht_authentifiziert());
    }
}
