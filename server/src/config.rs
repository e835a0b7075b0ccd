//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist.

use std::time::Duration;

use plauder_db::DatabaseConfig;
use plauder_realtime::RealtimeConfig;
use serde::{Deserialize, Serialize};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
    /// Ablage fuer hochgeladene Dateien
    pub speicher: SpeicherEinstellungen,
    /// Live-Verbindungen (WebSocket)
    pub realtime: RealtimeEinstellungen,
    /// Observability-Einstellungen (Metriken, Health)
    pub observability: ObservabilityEinstellungen,
    /// CORS fuer Browser-Clients
    pub cors: CorsEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers (nur fuer Logs)
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Plauder".into(),
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer HTTP und WebSocket
    pub bind_adresse: String,
    /// Port fuer REST-API und `/ws`
    pub api_port: u16,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            api_port: 8747,
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    /// WAL-Modus fuer SQLite
    pub sqlite_wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        Self {
            url: "sqlite://plauder.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

impl From<&DatenbankEinstellungen> for DatabaseConfig {
    fn from(d: &DatenbankEinstellungen) -> Self {
        Self {
            url: d.url.clone(),
            max_verbindungen: d.max_verbindungen,
            sqlite_wal: d.sqlite_wal,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Ablage fuer hochgeladene Dateien
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeicherEinstellungen {
    /// Verzeichnis auf der Platte
    pub verzeichnis: String,
    /// Oeffentlicher URL-Praefix, unter dem das Verzeichnis ausgeliefert wird
    pub url_prefix: String,
    /// Maximale Dateigroesse in Bytes
    pub max_dateigroesse: usize,
}

impl Default for SpeicherEinstellungen {
    fn default() -> Self {
        Self {
            verzeichnis: "uploads".into(),
            url_prefix: "/files".into(),
            max_dateigroesse: 10 * 1024 * 1024,
        }
    }
}

/// Live-Verbindungen (WebSocket)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeEinstellungen {
    /// Send-Queue pro Verbindung (Events)
    pub queue_groesse: usize,
    /// Abstand zwischen zwei Pings in Sekunden
    pub ping_intervall_sek: u64,
    /// Wartezeit auf das Pong in Sekunden
    pub pong_timeout_sek: u64,
    /// Maximale Groesse eines Textframes in Bytes
    pub max_frame_groesse: usize,
}

impl Default for RealtimeEinstellungen {
    fn default() -> Self {
        let standard = RealtimeConfig::default();
        Self {
            queue_groesse: standard.queue_groesse,
            ping_intervall_sek: standard.ping_intervall.as_secs(),
            pong_timeout_sek: standard.pong_timeout.as_secs(),
            max_frame_groesse: standard.max_frame_groesse,
        }
    }
}

impl From<&RealtimeEinstellungen> for RealtimeConfig {
    fn from(r: &RealtimeEinstellungen) -> Self {
        Self {
            queue_groesse: r.queue_groesse.max(1),
            ping_intervall: Duration::from_secs(r.ping_intervall_sek.max(1)),
            pong_timeout: Duration::from_secs(r.pong_timeout_sek.max(1)),
            max_frame_groesse: r.max_frame_groesse,
        }
    }
}

/// Observability-Einstellungen (Metriken + Health-Check)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityEinstellungen {
    /// `/metrics` und `/health` einhaengen
    pub aktiviert: bool,
}

impl Default for ObservabilityEinstellungen {
    fn default() -> Self {
        Self { aktiviert: true }
    }
}

/// CORS-Einstellungen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsEinstellungen {
    /// Erlaubte Origins (leer = alle erlaubt, nur fuer Entwicklung)
    pub origins: Vec<String>,
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Bind-Adresse fuer REST-API und WebSocket
    pub fn api_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.api_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.netzwerk.api_port, 8747);
        assert!(cfg.datenbank.url.starts_with("sqlite://"));
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.speicher.url_prefix, "/files");
        assert!(cfg.cors.origins.is_empty());
    }

    #[test]
    fn bind_adresse() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.api_bind_adresse(), "0.0.0.0:8747");
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [server]
            name = "Mein Plauder"

            [netzwerk]
            api_port = 9000

            [realtime]
            ping_intervall_sek = 5

            [cors]
            origins = ["http://localhost:5173"]
        "#;
        let cfg: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.server.name, "Mein Plauder");
        assert_eq!(cfg.netzwerk.api_port, 9000);
        assert_eq!(cfg.cors.origins, vec!["http://localhost:5173".to_string()]);
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.netzwerk.bind_adresse, "0.0.0.0");
        assert_eq!(cfg.realtime.pong_timeout_sek, 10);

        let rt = RealtimeConfig::from(&cfg.realtime);
        assert_eq!(rt.ping_intervall, Duration::from_secs(5));
    }

    #[test]
    fn fehlende_datei_ergibt_standardwerte() {
        let cfg = ServerConfig::laden("/nicht/vorhanden/plauder.toml").unwrap();
        assert_eq!(cfg.netzwerk.api_port, 8747);
    }

    #[test]
    fn datenbank_einstellungen_werden_uebernommen() {
        let d = DatenbankEinstellungen {
            url: "sqlite://test.db".into(),
            max_verbindungen: 2,
            sqlite_wal: false,
        };
        let db = DatabaseConfig::from(&d);
        assert_eq!(db.url, "sqlite://test.db");
        assert!(!db.sqlite_wal);
    }
}
