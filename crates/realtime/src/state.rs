//! Gemeinsamer Zustand aller Live-Verbindungen

use std::sync::Arc;
use std::time::Duration;

use plauder_auth::IdentityContext;
use plauder_chat::ChatService;
use plauder_db::SqliteDb;
use plauder_observability::PlauderMetrics;
use plauder_protocol::wire::DEFAULT_MAX_FRAME_SIZE;

use crate::dispatcher::NachrichtenDispatcher;
use crate::registry::{ConnectionRegistry, SEND_QUEUE_GROESSE};
use crate::router::MessageRouter;

/// Parameter der Live-Verbindungen
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// Groesse der Send-Queue pro Verbindung
    pub queue_groesse: usize,
    /// Abstand zwischen zwei Pings
    pub ping_intervall: Duration,
    /// Wartezeit auf das Pong nach einem Ping
    pub pong_timeout: Duration,
    /// Maximale Groesse eines Textframes in Bytes
    pub max_frame_groesse: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            queue_groesse: SEND_QUEUE_GROESSE,
            ping_intervall: Duration::from_secs(30),
            pong_timeout: Duration::from_secs(10),
            max_frame_groesse: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

/// Dispatcher mit der SQLite-Datenbank des Servers
pub type LiveDispatcher = NachrichtenDispatcher<SqliteDb>;

/// Zustand fuer den `/ws`-Handler; Clone teilt Registry und Dispatcher
#[derive(Clone)]
pub struct RealtimeState {
    pub registry: ConnectionRegistry,
    pub dispatcher: Arc<LiveDispatcher>,
    pub identity: IdentityContext,
    pub config: RealtimeConfig,
    pub metriken: Option<PlauderMetrics>,
}

impl RealtimeState {
    /// Baut Registry, Router und Dispatcher aus dem ChatService
    pub fn neu(
        chat: Arc<ChatService<SqliteDb>>,
        identity: IdentityContext,
        config: RealtimeConfig,
        metriken: Option<PlauderMetrics>,
    ) -> Self {
        let registry = ConnectionRegistry::mit_queue_groesse(config.queue_groesse);
        let router = MessageRouter::neu(registry.clone());
        let mut dispatcher = NachrichtenDispatcher::neu(chat, router);
        if let Some(m) = &metriken {
            dispatcher = dispatcher.mit_metriken(m.clone());
        }

        Self {
            registry,
            dispatcher: Arc::new(dispatcher),
            identity,
            config,
            metriken,
        }
    }

    /// Aktualisiert die Gauge der verbundenen Clients
    pub(crate) fn verbundene_zaehlen(&self) {
        if let Some(m) = &self.metriken {
            m.connected_clients.set(self.registry.anzahl() as i64);
        }
    }
}
