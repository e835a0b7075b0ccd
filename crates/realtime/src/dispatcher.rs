//! Nachrichten-Dispatcher – Erst speichern, dann verteilen
//!
//! Gemeinsamer Sendepfad fuer Live-Events und REST. Scheitert Validierung
//! oder Speichern, wird nichts verteilt und der Fehler geht an den
//! Absender. Nach dem Speichern ist die Nachricht sicher; Probleme bei der
//! Verteilung erreichen den Absender nicht mehr.

use std::sync::Arc;

use plauder_chat::{ChatService, Zustellung};
use plauder_core::types::UserId;
use plauder_db::{ChannelRepository, MessageRepository, UserRepository};
use plauder_observability::PlauderMetrics;
use plauder_protocol::{ClientEvent, Nachrichtenziel, SendeAnfrage, ServerEvent};

use crate::error::{RealtimeError, RealtimeResult};
use crate::router::MessageRouter;

/// Verbindet ChatService (Persistenz) mit dem MessageRouter (Zustellung)
pub struct NachrichtenDispatcher<R>
where
    R: UserRepository + MessageRepository + ChannelRepository,
{
    chat: Arc<ChatService<R>>,
    router: MessageRouter,
    metriken: Option<PlauderMetrics>,
}

impl<R> NachrichtenDispatcher<R>
where
    R: UserRepository + MessageRepository + ChannelRepository,
{
    pub fn neu(chat: Arc<ChatService<R>>, router: MessageRouter) -> Self {
        Self {
            chat,
            router,
            metriken: None,
        }
    }

    /// Zaehlt gespeicherte Nachrichten und Zustellergebnisse
    pub fn mit_metriken(mut self, metriken: PlauderMetrics) -> Self {
        self.metriken = Some(metriken);
        self
    }

    pub fn router(&self) -> &MessageRouter {
        &self.router
    }

    /// Speichert eine Nachricht und verteilt sie an alle verbundenen Empfaenger
    pub async fn senden(
        &self,
        sender: UserId,
        anfrage: &SendeAnfrage,
    ) -> RealtimeResult<Zustellung> {
        let zustellung = self.chat.nachricht_senden(sender, anfrage).await?;

        let bericht = self.router.zustellen(&zustellung);
        tracing::debug!(
            sender = %sender,
            nachricht = %zustellung.nachricht().id,
            zugestellt = bericht.zugestellt,
            offline = bericht.offline,
            fehlgeschlagen = bericht.fehlgeschlagen,
            "Nachricht verteilt"
        );

        if let Some(m) = &self.metriken {
            let ziel = match &zustellung {
                Zustellung::Direkt(_) => "direkt",
                Zustellung::Kanal { .. } => "kanal",
            };
            m.nachricht_gespeichert(ziel);
            m.pushes_zaehlen(bericht.zugestellt, bericht.offline, bericht.fehlgeschlagen);
        }

        Ok(zustellung)
    }

    /// Verarbeitet ein Live-Event eines Clients
    ///
    /// Gibt ein `error`-Event fuer den Absender zurueck wenn das Senden
    /// scheitert, sonst `None` (die Bestaetigung ist der eigene Push).
    pub async fn client_event_verarbeiten(
        &self,
        sender: UserId,
        event: ClientEvent,
    ) -> Option<ServerEvent> {
        match self.client_event_ausfuehren(sender, event).await {
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(sender = %sender, fehler = %e, "Live-Event abgelehnt");
                Some(e.als_event())
            }
        }
    }

    async fn client_event_ausfuehren(
        &self,
        sender: UserId,
        event: ClientEvent,
    ) -> RealtimeResult<Zustellung> {
        let anfrage = match event {
            ClientEvent::SendMessage(anfrage) => {
                if matches!(anfrage.ziel(), Ok(Nachrichtenziel::Kanal(_))) {
                    return Err(RealtimeError::FalschesEvent(
                        "sendMessage erwartet einen Empfaenger, sendChannelMessage nutzen".into(),
                    ));
                }
                anfrage
            }
            ClientEvent::SendChannelMessage(anfrage) => {
                if matches!(anfrage.ziel(), Ok(Nachrichtenziel::Direkt(_))) {
                    return Err(RealtimeError::FalschesEvent(
                        "sendChannelMessage erwartet eine channelId".into(),
                    ));
                }
                anfrage
            }
        };
        self.senden(sender, &anfrage).await
    }
}
