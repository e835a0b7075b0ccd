//! Datenquelle fuer Historien und Uebersichtslisten
//!
//! Abstrahiert die REST-Aufrufe, mit denen der Client Gespraeche und
//! Seitenleisten befuellt. Die Sitzung kennt nur dieses Trait.

use plauder_core::types::{ChannelId, UserId};
use plauder_protocol::{KanalInfo, KontaktInfo, NachrichtInfo};

use crate::error::ClientResult;

#[allow(async_fn_in_trait)]
pub trait HistorienQuelle: Send + Sync {
    /// Direktnachrichten mit `anderer`
    async fn direkt_historie(&self, anderer: UserId) -> ClientResult<Vec<NachrichtInfo>>;

    /// Nachrichten eines Kanals
    async fn kanal_historie(&self, kanal: ChannelId) -> ClientResult<Vec<NachrichtInfo>>;

    /// Kontakte mit mindestens einer Direktnachricht
    async fn dm_kontakte(&self) -> ClientResult<Vec<KontaktInfo>>;

    /// Kanaele des Benutzers
    async fn kanaele(&self) -> ClientResult<Vec<KanalInfo>>;
}
