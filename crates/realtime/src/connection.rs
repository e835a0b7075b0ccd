//! Live-Verbindung – ein Actor pro WebSocket
//!
//! Der Socket wird in Lese- und Schreibhaelfte geteilt:
//! - Writer-Task: besitzt den Sink, schreibt Events aus der Send-Queue
//!   und Steuerframes (Ping, Close)
//! - Ping-Task: sendet periodisch Pings und wartet auf das Pong
//! - Reader-Schleife: dekodiert Client-Events und uebergibt sie dem Dispatcher
//!
//! Beim Ende meldet sich die Verbindung mit ihrem eigenen Handle bei der
//! Registry ab; eine inzwischen neuere Verbindung desselben Benutzers
//! bleibt dabei registriert.

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use plauder_core::types::UserId;
use plauder_protocol::{FehlerCode, LiveCodec, ServerEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, timeout};

use crate::state::RealtimeState;

/// Close-Code bei ausbleibendem Pong (Going Away)
const CLOSE_PONG_TIMEOUT: u16 = 1001;

/// So lange darf der Writer den Close-Frame noch abschicken
const SCHLIESSEN_WARTEZEIT: Duration = Duration::from_secs(1);

/// Bedient eine authentifizierte Live-Verbindung bis zu ihrem Ende
pub async fn verbindung_bedienen(socket: WebSocket, state: RealtimeState, user_id: UserId) {
    let codec = LiveCodec::with_max_size(state.config.max_frame_groesse);
    let (ws_sender, mut ws_receiver) = socket.split();

    let (verbindung, events_rx) = state.registry.verbindung_oeffnen(user_id);
    state.registry.register(verbindung.clone());
    state.verbundene_zaehlen();

    tracing::info!(user_id = %user_id, verbindung = %verbindung.id(), "Live-Verbindung geoeffnet");

    let (steuerung_tx, steuerung_rx) = mpsc::unbounded_channel::<Message>();
    let mut writer_handle = tokio::spawn(writer_task(ws_sender, events_rx, steuerung_rx, codec));

    let (pong_tx, pong_rx) = mpsc::unbounded_channel::<()>();
    let mut ping_handle = tokio::spawn(ping_task(
        steuerung_tx.clone(),
        pong_rx,
        state.config.ping_intervall,
        state.config.pong_timeout,
    ));

    let mut pong_ausgeblieben = false;
    loop {
        let frame = tokio::select! {
            frame = ws_receiver.next() => frame,
            _ = &mut ping_handle => {
                tracing::info!(user_id = %user_id, "Pong ausgeblieben, Verbindung wird beendet");
                pong_ausgeblieben = true;
                break;
            }
        };

        match frame {
            Some(Ok(Message::Text(text))) => {
                let antwort = match codec.dekodieren(&text) {
                    Ok(event) => {
                        state
                            .dispatcher
                            .client_event_verarbeiten(user_id, event)
                            .await
                    }
                    Err(e) => {
                        tracing::debug!(user_id = %user_id, fehler = %e, "Ungueltiger Frame");
                        Some(ServerEvent::fehler(FehlerCode::InvalidFrame, e.to_string()))
                    }
                };
                if let Some(antwort) = antwort {
                    if let Err(e) = verbindung.senden(antwort) {
                        tracing::debug!(user_id = %user_id, fehler = %e, "Fehlerantwort verworfen");
                    }
                }
            }
            Some(Ok(Message::Binary(_))) => {
                let antwort =
                    ServerEvent::fehler(FehlerCode::InvalidFrame, "Nur JSON-Textframes erlaubt");
                let _ = verbindung.senden(antwort);
            }
            Some(Ok(Message::Pong(_))) => {
                let _ = pong_tx.send(());
            }
            // Pong auf Client-Pings beantwortet axum selbst
            Some(Ok(Message::Ping(_))) => {}
            Some(Ok(Message::Close(frame))) => {
                tracing::debug!(user_id = %user_id, grund = ?frame, "Client hat geschlossen");
                break;
            }
            Some(Err(e)) => {
                tracing::warn!(user_id = %user_id, fehler = %e, "WebSocket-Empfangsfehler");
                break;
            }
            None => {
                tracing::debug!(user_id = %user_id, "WebSocket-Stream beendet");
                break;
            }
        }
    }

    ping_handle.abort();
    if pong_ausgeblieben {
        // Close-Frame liegt in der Steuer-Queue, der Writer endet danach selbst
        let _ = timeout(SCHLIESSEN_WARTEZEIT, &mut writer_handle).await;
    }
    writer_handle.abort();

    state.registry.unregister(&verbindung);
    state.verbundene_zaehlen();

    tracing::info!(user_id = %user_id, verbindung = %verbindung.id(), "Live-Verbindung beendet");
}

/// Schreibt Events und Steuerframes in den Sink bis einer der Kanaele endet
async fn writer_task(
    mut ws_sender: SplitSink<WebSocket, Message>,
    mut events: mpsc::Receiver<ServerEvent>,
    mut steuerung: mpsc::UnboundedReceiver<Message>,
    codec: LiveCodec,
) {
    loop {
        let nachricht = tokio::select! {
            event = events.recv() => match event {
                Some(event) => match codec.kodieren(&event) {
                    Ok(text) => Message::Text(text),
                    Err(e) => {
                        tracing::warn!(event = event.name(), fehler = %e, "Event nicht kodierbar");
                        continue;
                    }
                },
                None => break,
            },
            steuer = steuerung.recv() => match steuer {
                Some(m) => m,
                None => break,
            },
        };

        let ist_close = matches!(nachricht, Message::Close(_));
        if ws_sender.send(nachricht).await.is_err() || ist_close {
            break;
        }
    }
}

/// Sendet Pings; endet wenn ein Pong ausbleibt oder der Writer weg ist
async fn ping_task(
    steuerung: mpsc::UnboundedSender<Message>,
    mut pong_rx: mpsc::UnboundedReceiver<()>,
    intervall: Duration,
    pong_timeout: Duration,
) {
    let mut timer = interval(intervall);
    // Erster Tick kommt sofort
    timer.tick().await;

    loop {
        timer.tick().await;

        if steuerung.send(Message::Ping(vec![0x70, 0x6c])).is_err() {
            return;
        }

        match timeout(pong_timeout, pong_rx.recv()).await {
            Ok(Some(())) => {}
            _ => {
                let _ = steuerung.send(Message::Close(Some(CloseFrame {
                    code: CLOSE_PONG_TIMEOUT,
                    reason: "Pong timeout".into(),
                })));
                return;
            }
        }
    }
}
