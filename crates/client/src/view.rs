//! ClientViewState – Was der Client gerade anzeigt
//!
//! Reine Reducer-Funktionen `(Zustand, Event) -> Zustand`, ohne Verbindung
//! und ohne Nebenwirkungen testbar.
//!
//! Regeln fuer Live-Events:
//! - Direktnachricht: anhaengen wenn das offene Gespraech die Gegenseite
//!   der Nachricht ist; die Gegenseite wandert in jedem Fall an den Anfang
//!   der Kontaktliste.
//! - Kanalnachricht: anhaengen wenn genau dieser Kanal offen ist; der Kanal
//!   wandert in jedem Fall an den Anfang der Kanalliste.

use plauder_core::types::{ChannelId, MessageId, UserId};
use plauder_protocol::{FehlerEvent, KanalNachricht, KontaktInfo, NachrichtInfo, ServerEvent};

use crate::summary::{kanal_nach_oben, kontakt_nach_oben, KanalEintrag};

/// Offenes Gespraech
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatAuswahl {
    #[default]
    Keine,
    Kontakt(UserId),
    Kanal(ChannelId),
}

/// Ansichtszustand einer verbundenen Sitzung
#[derive(Debug, Clone, PartialEq)]
pub struct ClientViewState {
    /// Angemeldeter Benutzer
    pub lokal: UserId,
    pub auswahl: ChatAuswahl,
    /// Nachrichten des offenen Gespraechs, aufsteigend nach Zeit
    pub nachrichten: Vec<NachrichtInfo>,
    pub kontakte: Vec<KontaktInfo>,
    pub kanaele: Vec<KanalEintrag>,
    /// Nachricht, zu der die Ansicht scrollen soll
    pub scroll_ziel: Option<MessageId>,
    /// Letztes `error`-Event des Servers
    pub letzter_fehler: Option<FehlerEvent>,
}

impl ClientViewState {
    pub fn neu(lokal: UserId) -> Self {
        Self {
            lokal,
            auswahl: ChatAuswahl::Keine,
            nachrichten: Vec::new(),
            kontakte: Vec::new(),
            kanaele: Vec::new(),
            scroll_ziel: None,
            letzter_fehler: None,
        }
    }
}

/// Wendet ein Server-Event auf den Zustand an
pub fn reduzieren(state: ClientViewState, event: &ServerEvent) -> ClientViewState {
    match event {
        ServerEvent::ReceiveMessage(n) => direktnachricht(state, n),
        ServerEvent::ReceiveChannelMessage(n) => kanalnachricht(state, n),
        ServerEvent::Error(f) => ClientViewState {
            letzter_fehler: Some(f.clone()),
            ..state
        },
    }
}

fn direktnachricht(mut state: ClientViewState, n: &NachrichtInfo) -> ClientViewState {
    let beteiligt =
        n.sender.id == state.lokal || n.receiver.as_ref().is_some_and(|r| r.id == state.lokal);
    if !beteiligt || n.channel_id.is_some() {
        tracing::debug!(nachricht = %n.id, "Direktnachricht ohne lokale Beteiligung ignoriert");
        return state;
    }

    let gegenseite = n.gegenseite(state.lokal);
    if state.auswahl == ChatAuswahl::Kontakt(gegenseite.id) {
        anhaengen(&mut state, n);
    }
    kontakt_nach_oben(&mut state.kontakte, gegenseite, n.timestamp);
    state
}

fn kanalnachricht(mut state: ClientViewState, n: &KanalNachricht) -> ClientViewState {
    let Some(kanal) = n.nachricht.channel_id else {
        tracing::debug!(nachricht = %n.nachricht.id, "Kanalnachricht ohne channelId ignoriert");
        return state;
    };

    if state.auswahl == ChatAuswahl::Kanal(kanal) {
        anhaengen(&mut state, &n.nachricht);
    }
    kanal_nach_oben(&mut state.kanaele, kanal, &n.channel_name, n.nachricht.timestamp);
    state
}

fn anhaengen(state: &mut ClientViewState, n: &NachrichtInfo) {
    if state.nachrichten.iter().any(|m| m.id == n.id) {
        return;
    }
    state.nachrichten.push(n.clone());
    state.scroll_ziel = Some(n.id);
}

/// Oeffnet ein anderes Gespraech; die bisherigen Nachrichten verfallen
pub fn auswahl_setzen(state: ClientViewState, auswahl: ChatAuswahl) -> ClientViewState {
    ClientViewState {
        auswahl,
        nachrichten: Vec::new(),
        scroll_ziel: None,
        ..state
    }
}

/// Uebernimmt die geladene Historie fuer `auswahl`
///
/// Ist inzwischen ein anderes Gespraech offen, bleibt der Zustand
/// unveraendert. Live-Nachrichten, die waehrend des Ladens angehaengt
/// wurden und in der Historie fehlen, bleiben erhalten.
pub fn historie_setzen(
    mut state: ClientViewState,
    auswahl: ChatAuswahl,
    historie: Vec<NachrichtInfo>,
) -> ClientViewState {
    if state.auswahl != auswahl {
        tracing::debug!("Historie fuer nicht mehr offenes Gespraech verworfen");
        return state;
    }

    let mut nachrichten = historie;
    for live in state.nachrichten.drain(..) {
        if !nachrichten.iter().any(|m| m.id == live.id) {
            nachrichten.push(live);
        }
    }
    nachrichten.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    state.scroll_ziel = nachrichten.last().map(|m| m.id);
    state.nachrichten = nachrichten;
    state
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
