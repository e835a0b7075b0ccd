//! ClientSitzung – Zustandsmaschine einer Client-Sitzung
//!
//! ```text
//! Getrennt --verbinden--> Verbunden(Keine) --auswaehlen--> Verbunden(X)
//!     ^                                                        |
//!     +--------------------------trennen-----------------------+
//! ```
//!
//! `trennen` ist aus jedem Zustand erlaubt. Auswaehlen und Events
//! empfangen setzen eine verbundene Sitzung voraus.

use plauder_core::types::UserId;
use plauder_protocol::ServerEvent;

use crate::error::{ClientError, ClientResult};
use crate::history::HistorienQuelle;
use crate::summary::{kanaele_sortieren, kontakte_sortieren, KanalEintrag};
use crate::view::{auswahl_setzen, historie_setzen, reduzieren, ChatAuswahl, ClientViewState};

#[derive(Debug, Clone, PartialEq)]
pub enum SitzungsZustand {
    Getrennt,
    Verbunden(ClientViewState),
}

pub struct ClientSitzung<H: HistorienQuelle> {
    quelle: H,
    zustand: SitzungsZustand,
}

impl<H: HistorienQuelle> ClientSitzung<H> {
    pub fn neu(quelle: H) -> Self {
        Self {
            quelle,
            zustand: SitzungsZustand::Getrennt,
        }
    }

    pub fn zustand(&self) -> &SitzungsZustand {
        &self.zustand
    }

    pub fn ist_verbunden(&self) -> bool {
        matches!(self.zustand, SitzungsZustand::Verbunden(_))
    }

    /// Ansicht der verbundenen Sitzung
    pub fn ansicht(&self) -> Option<&ClientViewState> {
        match &self.zustand {
            SitzungsZustand::Verbunden(a) => Some(a),
            SitzungsZustand::Getrennt => None,
        }
    }

    /// Verbindet als `lokal` und laedt die Uebersichtslisten
    pub async fn verbinden(&mut self, lokal: UserId) -> ClientResult<()> {
        if self.ist_verbunden() {
            return Err(ClientError::BereitsVerbunden);
        }

        let mut kontakte = self.quelle.dm_kontakte().await?;
        kontakte_sortieren(&mut kontakte);
        let mut kanaele: Vec<KanalEintrag> = self
            .quelle
            .kanaele()
            .await?
            .into_iter()
            .map(KanalEintrag::from)
            .collect();
        kanaele_sortieren(&mut kanaele);

        let mut ansicht = ClientViewState::neu(lokal);
        ansicht.kontakte = kontakte;
        ansicht.kanaele = kanaele;
        self.zustand = SitzungsZustand::Verbunden(ansicht);

        tracing::debug!(user_id = %lokal, "Client-Sitzung verbunden");
        Ok(())
    }

    /// Trennt die Sitzung; die Ansicht verfaellt
    pub fn trennen(&mut self) {
        self.zustand = SitzungsZustand::Getrennt;
    }

    /// Oeffnet ein Gespraech und laedt dessen Historie
    ///
    /// Scheitert das Laden, bleibt das Gespraech leer geoeffnet.
    pub async fn auswaehlen(&mut self, auswahl: ChatAuswahl) -> ClientResult<()> {
        self.umformen(|a| auswahl_setzen(a, auswahl))?;

        let historie = match auswahl {
            ChatAuswahl::Keine => return Ok(()),
            ChatAuswahl::Kontakt(id) => self.quelle.direkt_historie(id).await?,
            ChatAuswahl::Kanal(id) => self.quelle.kanal_historie(id).await?,
        };

        self.umformen(|a| historie_setzen(a, auswahl, historie))
    }

    /// Wendet ein Live-Event an
    pub fn event_empfangen(&mut self, event: &ServerEvent) -> ClientResult<()> {
        self.umformen(|a| reduzieren(a, event))
    }

    fn umformen(
        &mut self,
        f: impl FnOnce(ClientViewState) -> ClientViewState,
    ) -> ClientResult<()> {
        match std::mem::replace(&mut self.zustand, SitzungsZustand::Getrennt) {
            SitzungsZustand::Verbunden(ansicht) => {
                self.zustand = SitzungsZustand::Verbunden(f(ansicht));
                Ok(())
            }
            SitzungsZustand::Getrennt => Err(ClientError::NichtVerbunden),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
