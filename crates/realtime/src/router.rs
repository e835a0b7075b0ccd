//! MessageRouter – Verteilt gespeicherte Nachrichten an verbundene Clients
//!
//! Der Router wird erst nach erfolgreichem Speichern aufgerufen. Ein
//! Empfaenger ohne Live-Verbindung ist kein Fehler; ein fehlgeschlagener
//! Push wird geloggt und bricht die Verteilung an die uebrigen Empfaenger
//! nicht ab. Nichts davon erreicht den Absender.

use plauder_chat::Zustellung;
use plauder_core::types::UserId;
use plauder_protocol::ServerEvent;

use crate::registry::ConnectionRegistry;

/// Ergebnis einer Verteilung
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZustellBericht {
    /// Event in die Queue einer Verbindung eingereiht
    pub zugestellt: usize,
    /// Empfaenger ohne Live-Verbindung
    pub offline: usize,
    /// Push an eine vorhandene Verbindung gescheitert
    pub fehlgeschlagen: usize,
}

/// Verteilt Events ueber die ConnectionRegistry
#[derive(Clone)]
pub struct MessageRouter {
    registry: ConnectionRegistry,
}

impl MessageRouter {
    pub fn neu(registry: ConnectionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Verteilt eine `Zustellung` aus dem ChatService
    ///
    /// Direktnachrichten gehen an Empfaenger und Sender (weitere Ansichten
    /// des Senders), Kanalnachrichten an alle Mitglieder inklusive Admin.
    pub fn zustellen(&self, zustellung: &Zustellung) -> ZustellBericht {
        let event = zustellung.als_event();
        match zustellung {
            Zustellung::Direkt(n) => {
                let empfaenger =
                    std::iter::once(n.sender.id).chain(n.receiver.as_ref().map(|r| r.id));
                self.verteilen(empfaenger, &event)
            }
            Zustellung::Kanal { mitglieder, .. } => {
                self.verteilen(mitglieder.iter().copied(), &event)
            }
        }
    }

    /// Ein Durchlauf ueber alle Empfaenger, jeder hoechstens einmal
    fn verteilen(
        &self,
        empfaenger: impl IntoIterator<Item = UserId>,
        event: &ServerEvent,
    ) -> ZustellBericht {
        let mut bericht = ZustellBericht::default();
        let mut gesehen: Vec<UserId> = Vec::new();

        for user_id in empfaenger {
            if gesehen.contains(&user_id) {
                continue;
            }
            gesehen.push(user_id);

            let Some(verbindung) = self.registry.lookup(&user_id) else {
                tracing::trace!(user_id = %user_id, event = event.name(), "Empfaenger offline");
                bericht.offline += 1;
                continue;
            };

            match verbindung.senden(event.clone()) {
                Ok(()) => bericht.zugestellt += 1,
                Err(e) => {
                    tracing::warn!(
                        user_id = %user_id,
                        verbindung = %verbindung.id(),
                        event = event.name(),
                        fehler = %e,
                        "Live-Zustellung fehlgeschlagen"
                    );
                    bericht.fehlgeschlagen += 1;
                }
            }
        }

        bericht
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
