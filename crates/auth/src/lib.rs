//! plauder-auth – Anmeldung, Sessions und Identitaet
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id
//! - Session-Management (in-memory mit TTL)
//! - AuthService (Registrierung, Login, Logout, Profilpflege)
//! - IdentityContext (Benutzer-ID aus Anfrage-Credentials aufloesen)

pub mod error;
pub mod identity;
pub mod password;
pub mod service;
pub mod session;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult};
pub use identity::{Anmeldedaten, IdentityContext, SESSION_COOKIE};
pub use password::{passwort_hashen, passwort_verifizieren};
pub use service::AuthService;
pub use session::{Session, SessionStore};
