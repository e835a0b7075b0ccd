//! plauder-client – Zustand auf der Client-Seite
//!
//! Dieses Crate implementiert:
//! - ClientViewState + Reducer: entscheidet pro Live-Event, ob das offene
//!   Gespraech oder nur die Seitenleiste betroffen ist
//! - Uebersichtslisten (Kontakte, Kanaele) nach juengster Aktivitaet
//! - ClientSitzung: Zustandsmaschine Getrennt/Verbunden mit
//!   Gespraechswechsel ueber eine `HistorienQuelle`

pub mod error;
pub mod history;
pub mod session;
pub mod summary;
pub mod view;

// Bequeme Re-Exporte
pub use error::{ClientError, ClientResult};
pub use history::HistorienQuelle;
pub use session::{ClientSitzung, SitzungsZustand};
pub use summary::KanalEintrag;
pub use view::{auswahl_setzen, historie_setzen, reduzieren, ChatAuswahl, ClientViewState};
