//! plauder-realtime – Live-Zustellung ueber WebSocket
//!
//! ## Architektur
//!
//! ```text
//! GET /ws (ws_handler)  -- IdentityContext --> UserId
//!     |
//!     v
//! verbindung_bedienen (ein Actor pro Verbindung)
//!     |  register -> Reader/Writer/Ping -> unregister (stale-sicher)
//!     v
//! NachrichtenDispatcher
//!     |  1. ChatService::nachricht_senden (validieren + speichern)
//!     |  2. MessageRouter::zustellen
//!     v
//! ConnectionRegistry (UserId -> Verbindung, DashMap)
//! ```

pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod registry;
pub mod router;
pub mod state;

// Bequeme Re-Exporte
pub use dispatcher::NachrichtenDispatcher;
pub use error::{RealtimeError, RealtimeResult};
pub use handler::{live_router, ws_handler};
pub use registry::{ConnectionId, ConnectionRegistry, Verbindung};
pub use router::{MessageRouter, ZustellBericht};
pub use state::{LiveDispatcher, RealtimeConfig, RealtimeState};
