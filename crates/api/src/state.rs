//! Axum-State der REST-Schnittstelle

use std::sync::Arc;

use axum::extract::FromRef;
use plauder_auth::{AuthService, IdentityContext, SessionStore};
use plauder_chat::{ChannelService, ChatService, ContactService, DiskStorage, FileService};
use plauder_db::SqliteDb;
use plauder_realtime::{LiveDispatcher, RealtimeState};

/// Zuschlag auf die maximale Dateigroesse fuer den Multipart-Rahmen
const MULTIPART_ZUSCHLAG: usize = 64 * 1024;

/// Gemeinsamer Zustand aller REST-Handler; Clone teilt die Services
#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<AuthService<SqliteDb>>,
    pub chat: Arc<ChatService<SqliteDb>>,
    pub kontakte: Arc<ContactService<SqliteDb>>,
    pub kanaele: Arc<ChannelService<SqliteDb>>,
    pub dateien: Arc<FileService<DiskStorage>>,
    /// Sendepfad, den auch die Live-Verbindungen nutzen
    pub dispatcher: Arc<LiveDispatcher>,
    pub identity: IdentityContext,
    /// Obergrenze fuer Upload-Anfragen in Bytes
    pub upload_limit: usize,
}

impl ApiState {
    /// Baut alle Services ueber derselben Datenbank auf
    ///
    /// Der Dispatcher kommt aus dem `RealtimeState`, damit REST- und
    /// Live-Sendungen dieselbe Registry erreichen.
    pub fn neu(
        db: Arc<SqliteDb>,
        sessions: Arc<SessionStore>,
        chat: Arc<ChatService<SqliteDb>>,
        storage: Arc<DiskStorage>,
        max_dateigroesse: usize,
        live: &RealtimeState,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::neu(Arc::clone(&db), Arc::clone(&sessions))),
            chat,
            kontakte: ContactService::neu(Arc::clone(&db)),
            kanaele: ChannelService::neu(db),
            dateien: FileService::neu(storage, max_dateigroesse),
            dispatcher: Arc::clone(&live.dispatcher),
            identity: live.identity.clone(),
            upload_limit: max_dateigroesse.saturating_add(MULTIPART_ZUSCHLAG),
        }
    }
}

impl FromRef<ApiState> for IdentityContext {
    fn from_ref(state: &ApiState) -> Self {
        state.identity.clone()
    }
}
