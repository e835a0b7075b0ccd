//! Route-Definitionen und Zusammenbau der HTTP-Anwendung

use std::path::PathBuf;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use plauder_observability::{
    observability_router, request_timing_layer, timing_middleware, HealthState, PlauderMetrics,
};
use plauder_realtime::{live_router, RealtimeState};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::handlers;
use crate::state::ApiState;

/// Erstellt den `/api/...`-Router
///
/// Upload-Routen bekommen ein eigenes Body-Limit, alle anderen behalten
/// das Standard-Limit von Axum.
pub fn api_router(upload_limit: usize) -> Router<ApiState> {
    let upload = DefaultBodyLimit::max(upload_limit);

    Router::new()
        // Anmeldung und Profil
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/user-info", get(handlers::auth::user_info))
        .route("/api/auth/update-profile", post(handlers::auth::update_profile))
        .route(
            "/api/auth/add-profile-image",
            post(handlers::auth::add_profile_image).layer(upload.clone()),
        )
        .route(
            "/api/auth/remove-profile-image",
            delete(handlers::auth::remove_profile_image),
        )
        // Kontakte
        .route("/api/contacts/search", post(handlers::contacts::search))
        .route(
            "/api/contacts/get-contacts-for-dm",
            get(handlers::contacts::contacts_for_dm),
        )
        .route(
            "/api/contacts/get-all-contacts",
            get(handlers::contacts::all_contacts),
        )
        // Direktnachrichten
        .route("/api/messages/get-messages", post(handlers::messages::get_messages))
        .route("/api/messages/send-message", post(handlers::messages::send_message))
        .route(
            "/api/messages/upload-file",
            post(handlers::messages::upload_file).layer(upload),
        )
        // Kanaele
        .route("/api/channel/create-channel", post(handlers::channels::create_channel))
        .route(
            "/api/channel/get-user-channels",
            get(handlers::channels::user_channels),
        )
        .route(
            "/api/channel/get-channel-messages/:channelId",
            get(handlers::channels::channel_messages),
        )
        .route("/api/channel/send-message", post(handlers::channels::send_message))
}

/// Einstellungen fuer den Zusammenbau der Anwendung
#[derive(Debug, Clone)]
pub struct AppOptionen {
    /// Verzeichnis, aus dem hochgeladene Dateien ausgeliefert werden
    pub datei_verzeichnis: PathBuf,
    /// URL-Praefix der ausgelieferten Dateien (z.B. "/files")
    pub datei_pfad: String,
    /// Erlaubte CORS-Origins. Leer = alle Origins erlaubt (nur fuer Entwicklung).
    pub cors_origins: Vec<String>,
    /// `/metrics` und `/health` einhaengen
    pub observability: bool,
}

impl Default for AppOptionen {
    fn default() -> Self {
        Self {
            datei_verzeichnis: PathBuf::from("uploads"),
            datei_pfad: "/files".into(),
            cors_origins: Vec::new(),
            observability: true,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let erlaubt: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    // Cookies verlangen konkrete Origins, Methoden und Header
    CorsLayer::new()
        .allow_origin(erlaubt)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Baut die komplette HTTP-Anwendung: REST, `/ws`, Dateien und Observability
pub fn app_router(
    api: ApiState,
    live: RealtimeState,
    metriken: PlauderMetrics,
    health: HealthState,
    optionen: &AppOptionen,
) -> Router {
    let mut app = api_router(api.upload_limit)
        .with_state(api)
        .merge(live_router(live))
        .nest_service(
            &optionen.datei_pfad,
            ServeDir::new(&optionen.datei_verzeichnis),
        );

    if optionen.observability {
        app = app.merge(observability_router(metriken.clone(), health));
    }

    app.layer(middleware::from_fn_with_state(metriken, timing_middleware))
        .layer(request_timing_layer())
        .layer(cors_layer(&optionen.cors_origins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_optionen() {
        let o = AppOptionen::default();
        assert_eq!(o.datei_pfad, "/files");
        assert!(o.cors_origins.is_empty());
        assert!(o.observability);
    }

    #[test]
    fn cors_mit_konkreten_origins() {
        // Darf trotz allow_credentials nicht paniken
        let _ = cors_layer(&["http://localhost:5173".to_string()]);
        let _ = cors_layer(&[]);
    }
}
