//! plauder-core – Gemeinsame Typen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Plauder-Crates gemeinsam genutzt werden.

pub mod types;
pub mod zeit;

// Re-Exporte fuer bequemen Zugriff
pub use types::{ChannelId, MessageId, UserId};
pub use zeit::MonotoneUhr;
