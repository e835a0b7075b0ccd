//! ConnectionRegistry – Wer ist gerade live verbunden
//!
//! Pro Benutzer gibt es hoechstens eine Live-Verbindung. Eine neue
//! Verbindung desselben Benutzers ersetzt die alte (last-connect-wins),
//! ohne sie zu schliessen. Die alte Verbindung bemerkt ihr Ende selbst und
//! meldet sich dann ab; `unregister` entfernt den Eintrag nur, wenn er noch
//! auf genau diese Verbindung zeigt.
//!
//! Alle Operationen sind atomar pro Eintrag (DashMap) und warten nie.

use dashmap::DashMap;
use plauder_core::types::UserId;
use plauder_protocol::ServerEvent;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::{RealtimeError, RealtimeResult};

// ---------------------------------------------------------------------------
// Konfiguration
// ---------------------------------------------------------------------------

/// Standardgroesse der Send-Queue pro Verbindung
pub const SEND_QUEUE_GROESSE: usize = 64;

static NAECHSTE_ID: AtomicU64 = AtomicU64::new(1);

// ---------------------------------------------------------------------------
// Verbindung
// ---------------------------------------------------------------------------

/// Prozessweit eindeutige Kennung einer Live-Verbindung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn naechste() -> Self {
        Self(NAECHSTE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Handle auf die Send-Queue einer Live-Verbindung
///
/// Clone teilt die Queue; die Identitaet ergibt sich aus der `ConnectionId`.
#[derive(Clone, Debug)]
pub struct Verbindung {
    id: ConnectionId,
    user_id: UserId,
    tx: mpsc::Sender<ServerEvent>,
}

impl Verbindung {
    /// Erstellt ein neues Handle samt Empfangsseite der Queue
    pub fn neu(user_id: UserId, queue_groesse: usize) -> (Self, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(queue_groesse.max(1));
        let verbindung = Self {
            id: ConnectionId::naechste(),
            user_id,
            tx,
        };
        (verbindung, rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Reiht ein Event nicht-blockierend ein
    pub fn senden(&self, event: ServerEvent) -> RealtimeResult<()> {
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                RealtimeError::ZustellungFehlgeschlagen("Send-Queue voll".into())
            }
            mpsc::error::TrySendError::Closed(_) => {
                RealtimeError::ZustellungFehlgeschlagen("Verbindung geschlossen".into())
            }
        })
    }

    /// true wenn die Empfangsseite (Writer-Task) beendet ist
    pub fn ist_geschlossen(&self) -> bool {
        self.tx.is_closed()
    }
}

// ---------------------------------------------------------------------------
// ConnectionRegistry
// ---------------------------------------------------------------------------

/// Prozessweite Zuordnung Benutzer -> aktuelle Live-Verbindung
///
/// Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct ConnectionRegistry {
    verbindungen: Arc<DashMap<UserId, Verbindung>>,
    queue_groesse: usize,
}

impl ConnectionRegistry {
    pub fn neu() -> Self {
        Self::mit_queue_groesse(SEND_QUEUE_GROESSE)
    }

    pub fn mit_queue_groesse(queue_groesse: usize) -> Self {
        Self {
            verbindungen: Arc::new(DashMap::new()),
            queue_groesse,
        }
    }

    /// Erstellt ein Verbindungs-Handle mit der konfigurierten Queue-Groesse
    ///
    /// Das Handle ist noch nicht registriert.
    pub fn verbindung_oeffnen(&self, user_id: UserId) -> (Verbindung, mpsc::Receiver<ServerEvent>) {
        Verbindung::neu(user_id, self.queue_groesse)
    }

    /// Setzt `verbindung` als aktuelle Verbindung ihres Benutzers
    ///
    /// Gibt die ersetzte Verbindung zurueck (sie wird nicht geschlossen).
    pub fn register(&self, verbindung: Verbindung) -> Option<Verbindung> {
        let user_id = verbindung.user_id;
        let id = verbindung.id;
        let vorherige = self.verbindungen.insert(user_id, verbindung);
        match &vorherige {
            Some(alt) => tracing::debug!(
                user_id = %user_id,
                verbindung = %id,
                ersetzt = %alt.id,
                "Verbindung registriert, vorherige ersetzt"
            ),
            None => tracing::debug!(user_id = %user_id, verbindung = %id, "Verbindung registriert"),
        }
        vorherige
    }

    /// Entfernt den Eintrag nur, wenn er noch auf genau diese Verbindung zeigt
    ///
    /// Gibt `true` zurueck wenn etwas entfernt wurde. Mehrfacher Aufruf ist
    /// unschaedlich.
    pub fn unregister(&self, verbindung: &Verbindung) -> bool {
        let entfernt = self
            .verbindungen
            .remove_if(&verbindung.user_id, |_, aktuell| aktuell.id == verbindung.id)
            .is_some();

        if entfernt {
            tracing::debug!(
                user_id = %verbindung.user_id,
                verbindung = %verbindung.id,
                "Verbindung abgemeldet"
            );
        } else {
            tracing::trace!(
                user_id = %verbindung.user_id,
                verbindung = %verbindung.id,
                "Abmeldung ignoriert (veraltet oder bereits entfernt)"
            );
        }
        entfernt
    }

    /// Aktuelle Verbindung eines Benutzers; `None` heisst offline
    pub fn lookup(&self, user_id: &UserId) -> Option<Verbindung> {
        self.verbindungen.get(user_id).map(|v| v.value().clone())
    }

    pub fn ist_online(&self, user_id: &UserId) -> bool {
        self.verbindungen.contains_key(user_id)
    }

    /// Anzahl der Benutzer mit Live-Verbindung
    pub fn anzahl(&self) -> usize {
        self.verbindungen.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::neu()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
