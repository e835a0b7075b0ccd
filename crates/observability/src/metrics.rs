//! Prometheus-kompatible Metriken fuer Plauder
//!
//! Registrierte Metriken:
//! - `plauder_connected_clients` – Gauge: Aktuell verbundene Live-Clients
//! - `plauder_messages_persisted_total` – Counter: Gespeicherte Nachrichten (direkt, kanal)
//! - `plauder_live_pushes_total` – Counter: Live-Zustellungen nach Ergebnis
//! - `plauder_http_requests_total` – Counter: HTTP-Anfragen (method, path, status)
//! - `plauder_http_request_duration_seconds` – Histogram: HTTP-Antwortzeit

use anyhow::Result;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Label-Werte fuer `plauder_live_pushes_total`
pub const PUSH_ZUGESTELLT: &str = "zugestellt";
pub const PUSH_OFFLINE: &str = "offline";
pub const PUSH_FEHLGESCHLAGEN: &str = "fehlgeschlagen";

/// Alle Plauder-Prometheus-Metriken
#[derive(Clone)]
pub struct PlauderMetrics {
    pub registry: Arc<Registry>,

    // Live-Metriken
    pub connected_clients: IntGauge,
    pub messages_persisted_total: IntCounterVec,
    pub live_pushes_total: IntCounterVec,

    // HTTP-Metriken
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
}

impl PlauderMetrics {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        // --- Live-Metriken ---
        let connected_clients = IntGauge::with_opts(Opts::new(
            "plauder_connected_clients",
            "Anzahl aktuell verbundener Live-Clients",
        ))?;
        registry.register(Box::new(connected_clients.clone()))?;

        let messages_persisted_total = IntCounterVec::new(
            Opts::new(
                "plauder_messages_persisted_total",
                "Gesamtanzahl gespeicherter Nachrichten",
            ),
            &["ziel"],
        )?;
        registry.register(Box::new(messages_persisted_total.clone()))?;

        let live_pushes_total = IntCounterVec::new(
            Opts::new(
                "plauder_live_pushes_total",
                "Live-Zustellversuche nach Ergebnis",
            ),
            &["ergebnis"],
        )?;
        registry.register(Box::new(live_pushes_total.clone()))?;

        // --- HTTP-Metriken ---
        let http_requests_total = IntCounterVec::new(
            Opts::new("plauder_http_requests_total", "Gesamtanzahl HTTP-Anfragen"),
            &["method", "path", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "plauder_http_request_duration_seconds",
                "HTTP-Antwortzeit in Sekunden",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
            ]),
            &["method", "path"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            connected_clients,
            messages_persisted_total,
            live_pushes_total,
            http_requests_total,
            http_request_duration_seconds,
        })
    }

    /// Zaehlt eine gespeicherte Nachricht (`ziel`: "direkt" oder "kanal")
    pub fn nachricht_gespeichert(&self, ziel: &str) {
        self.messages_persisted_total.with_label_values(&[ziel]).inc();
    }

    /// Zaehlt das Ergebnis eines Zustellversuchs
    pub fn pushes_zaehlen(&self, zugestellt: usize, offline: usize, fehlgeschlagen: usize) {
        for (label, anzahl) in [
            (PUSH_ZUGESTELLT, zugestellt),
            (PUSH_OFFLINE, offline),
            (PUSH_FEHLGESCHLAGEN, fehlgeschlagen),
        ] {
            if anzahl > 0 {
                self.live_pushes_total
                    .with_label_values(&[label])
                    .inc_by(anzahl as u64);
            }
        }
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn exportieren(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Axum-Router fuer den `/metrics`-Endpunkt
pub fn metrics_router(metriken: PlauderMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metriken)
}

async fn metrics_handler(State(metriken): State<PlauderMetrics>) -> impl IntoResponse {
    match metriken.exportieren() {
        Ok(text) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Metriken-Export fehlgeschlagen: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
