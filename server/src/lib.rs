//! plauder-server – Bibliotheks-Root
//!
//! Verdrahtet Datenbank, Services, Live-Layer und HTTP-Anwendung und
//! stellt den Einstiegspunkt fuer Integrationstests bereit.

pub mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::Router;
use config::ServerConfig;
use plauder_api::{app_router, ApiState, AppOptionen};
use plauder_auth::{IdentityContext, SessionStore};
use plauder_chat::{ChatService, DiskStorage};
use plauder_db::{DatabaseConfig, SqliteDb};
use plauder_observability::{DbPruefung, HealthState, PlauderMetrics};
use plauder_realtime::{RealtimeConfig, RealtimeState};

/// Health-Pruefung gegen den SQLite-Pool
struct DbErreichbarkeit(Arc<SqliteDb>);

#[async_trait]
impl DbPruefung for DbErreichbarkeit {
    async fn erreichbar(&self) -> bool {
        self.0.erreichbar().await
    }
}

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Baut die HTTP-Anwendung ueber einer geoeffneten Datenbank
    ///
    /// Startet ausserdem den Cleanup-Task des Session-Stores.
    pub fn anwendung(&self, db: Arc<SqliteDb>) -> Result<Router> {
        let metriken = PlauderMetrics::neu()?;
        let health = HealthState::mit_pruefung(Arc::new(DbErreichbarkeit(Arc::clone(&db))));

        let sessions = SessionStore::neu();
        SessionStore::cleanup_starten(&sessions);
        let identity = IdentityContext::neu(Arc::clone(&sessions));

        let chat = ChatService::neu(Arc::clone(&db));
        let live = RealtimeState::neu(
            Arc::clone(&chat),
            identity,
            RealtimeConfig::from(&self.config.realtime),
            Some(metriken.clone()),
        );

        let speicher = &self.config.speicher;
        let storage = Arc::new(DiskStorage::new(&speicher.verzeichnis, &speicher.url_prefix));
        let api = ApiState::neu(
            db,
            sessions,
            chat,
            storage,
            speicher.max_dateigroesse,
            &live,
        );

        let optionen = AppOptionen {
            datei_verzeichnis: PathBuf::from(&speicher.verzeichnis),
            datei_pfad: speicher.url_prefix.clone(),
            cors_origins: self.config.cors.origins.clone(),
            observability: self.config.observability.aktiviert,
        };

        Ok(app_router(api, live, metriken, health, &optionen))
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbank oeffnen und migrieren
    /// 2. Ablageverzeichnis anlegen
    /// 3. HTTP-Anwendung (REST, `/ws`, Dateien, Observability) starten
    /// 4. Auf Ctrl-C warten, dann Verbindungen sauber schliessen
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            adresse = %self.config.api_bind_adresse(),
            "Server startet"
        );

        let db_config = DatabaseConfig::from(&self.config.datenbank);
        let db = Arc::new(
            SqliteDb::oeffnen(&db_config)
                .await
                .with_context(|| format!("Datenbank '{}' nicht verfuegbar", db_config.url))?,
        );

        tokio::fs::create_dir_all(&self.config.speicher.verzeichnis)
            .await
            .with_context(|| {
                format!(
                    "Ablageverzeichnis '{}' nicht anlegbar",
                    self.config.speicher.verzeichnis
                )
            })?;

        let app = self.anwendung(Arc::clone(&db))?;

        let adresse = self.config.api_bind_adresse();
        let listener = tokio::net::TcpListener::bind(&adresse)
            .await
            .with_context(|| format!("Adresse {adresse} nicht bindbar"))?;
        tracing::info!(adresse = %adresse, "HTTP-Server gestartet");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        db.schliessen().await;
        tracing::info!("Server beendet");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(fehler = %e, "Shutdown-Signal konnte nicht abgewartet werden");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
}
