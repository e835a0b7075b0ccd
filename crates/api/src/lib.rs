//! plauder-api – REST-Schnittstelle
//!
//! Dieses Crate implementiert:
//! - Routen unter `/api/auth`, `/api/contacts`, `/api/messages`, `/api/channel`
//! - `AuthUser`-Extraktor ueber den IdentityContext (Cookie, Bearer, `?token=`)
//! - ApiError mit JSON-Fehlerantworten
//! - Zusammenbau der Anwendung mit `/ws`, Dateiauslieferung und Observability
//!
//! Sendungen ueber REST laufen durch denselben Dispatcher wie Live-Events,
//! verbundene Empfaenger erhalten die Nachricht also sofort.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

// Bequeme Re-Exporte
pub use error::{ApiError, ApiResult};
pub use extract::AuthUser;
pub use handlers::auth::BenutzerAntwort;
pub use routes::{api_router, app_router, AppOptionen};
pub use state::ApiState;
