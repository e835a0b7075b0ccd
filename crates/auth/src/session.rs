//! Session-Management fuer Plauder
//!
//! Sessions werden im Speicher gehalten (HashMap mit TTL). Der Token wird
//! als Cookie `jwt`, als Bearer-Header oder als `?token=` beim
//! WebSocket-Upgrade vorgelegt. Ein Hintergrund-Task bereinigt abgelaufene
//! Sessions.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use rand::RngCore;
use tokio::sync::RwLock;

use plauder_core::types::UserId;

use crate::error::{AuthError, AuthResult};

/// Standard-Session-Lebensdauer: 3 Tage (entspricht Cookie Max-Age)
pub const SESSION_TTL_SEKUNDEN: i64 = 3 * 24 * 60 * 60;

/// Intervall fuer den automatischen Cleanup-Task: 15 Minuten
const CLEANUP_INTERVALL: Duration = Duration::from_secs(15 * 60);

/// Ein aktives Session-Token
#[derive(Debug, Clone)]
pub struct Session {
    /// Der Token-String (URL-sicheres Base64)
    pub token: String,
    pub user_id: UserId,
    pub erstellt_am: DateTime<Utc>,
    pub laeuft_ab_am: DateTime<Utc>,
}

impl Session {
    /// Gibt `true` zurueck wenn die Session noch gueltig ist
    pub fn ist_gueltig(&self) -> bool {
        Utc::now() < self.laeuft_ab_am
    }

    /// Restlaufzeit in Sekunden (fuer Cookie Max-Age)
    pub fn restlaufzeit_sekunden(&self) -> i64 {
        (self.laeuft_ab_am - Utc::now()).num_seconds().max(0)
    }
}

/// In-Memory Session-Store mit TTL
#[derive(Debug)]
pub struct SessionStore {
    /// token -> Session
    sessions: RwLock<HashMap<String, Session>>,
    ttl: chrono::Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::seconds(SESSION_TTL_SEKUNDEN),
        }
    }
}

impl SessionStore {
    /// Erstellt einen leeren Session-Store mit Standard-TTL
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Erstellt einen leeren Session-Store mit eigener TTL
    pub fn mit_ttl(ttl_sekunden: i64) -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::seconds(ttl_sekunden),
        })
    }

    /// Startet den periodischen Cleanup-Task fuer diesen Store
    pub fn cleanup_starten(store: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(store);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(CLEANUP_INTERVALL).await;
                let entfernt = store.cleanup_abgelaufene().await;
                if entfernt > 0 {
                    tracing::debug!(anzahl = entfernt, "Abgelaufene Sessions bereinigt");
                }
            }
        })
    }

    /// Erstellt eine neue Session fuer den angegebenen Benutzer
    pub async fn erstellen(&self, user_id: UserId) -> Session {
        let token = token_generieren();
        let jetzt = Utc::now();
        let session = Session {
            token: token.clone(),
            user_id,
            erstellt_am: jetzt,
            laeuft_ab_am: jetzt + self.ttl,
        };

        self.sessions.write().await.insert(token, session.clone());
        tracing::debug!(user_id = %user_id, "Neue Session erstellt");
        session
    }

    /// Validiert einen Session-Token und gibt die Session zurueck
    pub async fn validieren(&self, token: &str) -> AuthResult<Session> {
        let sessions = self.sessions.read().await;
        match sessions.get(token) {
            None => Err(AuthError::SessionUngueltig),
            Some(session) if !session.ist_gueltig() => Err(AuthError::SessionAbgelaufen),
            Some(session) => Ok(session.clone()),
        }
    }

    /// Invalidiert (loescht) eine Session; unbekannte Tokens sind kein Fehler
    pub async fn invalidieren(&self, token: &str) -> bool {
        let entfernt = self.sessions.write().await.remove(token).is_some();
        if entfernt {
            tracing::debug!("Session invalidiert");
        }
        entfernt
    }

    /// Bereinigt abgelaufene Sessions und gibt die Anzahl der entfernten zurueck
    pub async fn cleanup_abgelaufene(&self) -> usize {
        let jetzt = Utc::now();
        let mut sessions = self.sessions.write().await;
        let vorher = sessions.len();
        sessions.retain(|_, s| s.laeuft_ab_am > jetzt);
        vorher - sessions.len()
    }

    /// Anzahl der aktiven (nicht abgelaufenen) Sessions
    pub async fn anzahl_aktive(&self) -> usize {
        let jetzt = Utc::now();
        let sessions = self.sessions.read().await;
        sessions.values().filter(|s| s.laeuft_ab_am > jetzt).count()
    }
}

/// Generiert einen kryptografisch sicheren Session-Token (URL-sicheres Base64)
fn token_generieren() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}
