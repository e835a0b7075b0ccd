//! Integrationstests: Speichern, dann live verteilen

use std::sync::Arc;

use plauder_chat::{ChannelService, ChatError, ChatService};
use plauder_core::types::UserId;
use plauder_db::{
    models::{NeuerBenutzer, ProfilUpdate},
    SqliteDb, UserRepository,
};
use plauder_protocol::{
    ClientEvent, FehlerCode, NachrichtenTyp, SendeAnfrage, ServerEvent,
};
use plauder_realtime::{
    ConnectionRegistry, MessageRouter, NachrichtenDispatcher, RealtimeError,
};
use tokio::sync::mpsc;

struct Umgebung {
    db: Arc<SqliteDb>,
    chat: Arc<ChatService<SqliteDb>>,
    registry: ConnectionRegistry,
    dispatcher: NachrichtenDispatcher<SqliteDb>,
}

async fn umgebung() -> Umgebung {
    let db = Arc::new(SqliteDb::in_memory().await.expect("In-Memory-DB"));
    let chat = ChatService::neu(Arc::clone(&db));
    let registry = ConnectionRegistry::neu();
    let dispatcher = NachrichtenDispatcher::neu(chat.clone(), MessageRouter::neu(registry.clone()));
    Umgebung {
        db,
        chat,
        registry,
        dispatcher,
    }
}

async fn benutzer(db: &SqliteDb, vorname: &str) -> UserId {
    let email = format!("{}@example.org", vorname.to_lowercase());
    let b = UserRepository::create(
        db,
        NeuerBenutzer {
            email: &email,
            password_hash: "hash",
        },
    )
    .await
    .expect("User anlegen");
    UserRepository::update_profile(
        db,
        b.id,
        ProfilUpdate {
            first_name: vorname,
            last_name: "Test",
            color: 2,
        },
    )
    .await
    .expect("Profil setzen");
    b.id
}

fn verbinden(registry: &ConnectionRegistry, user_id: UserId) -> mpsc::Receiver<ServerEvent> {
    let (v, rx) = registry.verbindung_oeffnen(user_id);
    registry.register(v);
    rx
}

#[tokio::test]
async fn direktnachricht_erreicht_beide_seiten_identisch() {
    let u = umgebung().await;
    let a = benutzer(&u.db, "Anna").await;
    let b = benutzer(&u.db, "Bernd").await;
    let mut rx_a = verbinden(&u.registry, a);
    let mut rx_b = verbinden(&u.registry, b);

    u.dispatcher
        .senden(a, &SendeAnfrage::text_an(b, "hallo"))
        .await
        .expect("Senden muss klappen");

    let bei_a = rx_a.try_recv().expect("Sender bekommt Echo");
    let bei_b = rx_b.try_recv().expect("Empfaenger bekommt Push");
    assert_eq!(bei_a, bei_b);

    let ServerEvent::ReceiveMessage(push) = bei_b else {
        panic!("receiveMessage erwartet, war {bei_b:?}");
    };
    assert_eq!(push.content.as_deref(), Some("hallo"));
    assert_eq!(push.sender.first_name.as_deref(), Some("Anna"));
    assert_eq!(push.receiver.as_ref().map(|r| r.id), Some(b));

    // Live-Push und Historien-Eintrag sind byte-identisch
    let historie = u.chat.direkt_historie(b, a).await.unwrap();
    assert_eq!(historie.len(), 1);
    assert_eq!(
        serde_json::to_string(&push).unwrap(),
        serde_json::to_string(&historie[0]).unwrap()
    );
}

#[tokio::test]
async fn offline_empfaenger_bekommt_nachricht_per_historie() {
    let u = umgebung().await;
    let a = benutzer(&u.db, "Anna").await;
    let b = benutzer(&u.db, "Bernd").await;

    u.dispatcher
        .senden(a, &SendeAnfrage::text_an(b, "spaeter lesen"))
        .await
        .expect("Offline-Empfaenger ist kein Fehler");

    let historie = u.chat.direkt_historie(b, a).await.unwrap();
    assert_eq!(historie[0].content.as_deref(), Some("spaeter lesen"));
}

#[tokio::test]
async fn kanalnachricht_nur_an_verbundene_mitglieder() {
    let u = umgebung().await;
    let u1 = benutzer(&u.db, "Uta").await;
    let u2 = benutzer(&u.db, "Udo").await;
    let u3 = benutzer(&u.db, "Ulf").await;
    let aussen = benutzer(&u.db, "Xaver").await;

    let kanaele = ChannelService::neu(Arc::clone(&u.db));
    let kanal = kanaele
        .kanal_erstellen(u1, "team", &[u2, u3])
        .await
        .expect("Kanal anlegen");

    let mut rx1 = verbinden(&u.registry, u1);
    let mut rx_aussen = verbinden(&u.registry, aussen);

    u.dispatcher
        .senden(u2, &SendeAnfrage::text_in_kanal(kanal.id, "moin"))
        .await
        .expect("Mitglied darf senden");

    match rx1.try_recv().expect("U1 ist verbunden") {
        ServerEvent::ReceiveChannelMessage(n) => {
            assert_eq!(n.nachricht.channel_id, Some(kanal.id));
            assert_eq!(n.channel_name, "team");
            assert_eq!(n.nachricht.sender.id, u2);
        }
        anderes => panic!("receiveChannelMessage erwartet, war {anderes:?}"),
    }
    assert!(rx_aussen.try_recv().is_err(), "Nicht-Mitglied bekommt nichts");

    let historie = u.chat.kanal_historie(u3, kanal.id).await.unwrap();
    assert_eq!(historie.len(), 1);
    assert_eq!(historie[0].content.as_deref(), Some("moin"));
}

#[tokio::test]
async fn ungueltige_nachricht_wird_weder_gespeichert_noch_verteilt() {
    let u = umgebung().await;
    let a = benutzer(&u.db, "Anna").await;
    let b = benutzer(&u.db, "Bernd").await;
    let mut rx_b = verbinden(&u.registry, b);

    let leer = SendeAnfrage::text_an(b, "   ");
    let fehler = u.dispatcher.senden(a, &leer).await.unwrap_err();
    assert!(matches!(
        fehler,
        RealtimeError::Chat(ChatError::UngueltigeNachricht(_))
    ));

    assert!(rx_b.try_recv().is_err());
    assert!(u.chat.direkt_historie(a, b).await.unwrap().is_empty());
}

#[tokio::test]
async fn speicherfehler_verhindert_zustellung() {
    let u = umgebung().await;
    let a = benutzer(&u.db, "Anna").await;
    let b = benutzer(&u.db, "Bernd").await;
    let mut rx_b = verbinden(&u.registry, b);

    u.db.schliessen().await;

    let fehler = u
        .dispatcher
        .senden(a, &SendeAnfrage::text_an(b, "geht verloren"))
        .await
        .unwrap_err();
    assert_eq!(fehler.fehler_code(), FehlerCode::InternalError);
    assert!(rx_b.try_recv().is_err(), "Ohne Speichern keine Zustellung");
}

#[tokio::test]
async fn dateinachricht_ohne_inhalt() {
    let u = umgebung().await;
    let a = benutzer(&u.db, "Anna").await;
    let b = benutzer(&u.db, "Bernd").await;
    let mut rx_b = verbinden(&u.registry, b);

    let anfrage = SendeAnfrage::datei_an(b, "/files/files/1/plan.pdf");
    u.dispatcher.senden(a, &anfrage).await.unwrap();

    let ServerEvent::ReceiveMessage(push) = rx_b.try_recv().unwrap() else {
        panic!("receiveMessage erwartet");
    };
    assert_eq!(push.message_type, NachrichtenTyp::File);
    assert!(push.content.is_none());
    assert_eq!(push.file_url.as_deref(), Some("/files/files/1/plan.pdf"));
}

#[tokio::test]
async fn live_event_mit_falschem_ziel_ergibt_fehler_event() {
    let u = umgebung().await;
    let a = benutzer(&u.db, "Anna").await;
    let b = benutzer(&u.db, "Bernd").await;

    let antwort = u
        .dispatcher
        .client_event_verarbeiten(a, ClientEvent::SendChannelMessage(SendeAnfrage::text_an(b, "x")))
        .await;

    match antwort {
        Some(ServerEvent::Error(f)) => assert_eq!(f.code, FehlerCode::InvalidMessage),
        anderes => panic!("error-Event erwartet, war {anderes:?}"),
    }
}

#[tokio::test]
async fn live_event_erfolgreich_ohne_antwort() {
    let u = umgebung().await;
    let a = benutzer(&u.db, "Anna").await;
    let b = benutzer(&u.db, "Bernd").await;
    let mut rx_b = verbinden(&u.registry, b);

    let antwort = u
        .dispatcher
        .client_event_verarbeiten(a, ClientEvent::SendMessage(SendeAnfrage::text_an(b, "hi")))
        .await;

    assert!(antwort.is_none());
    assert!(matches!(rx_b.try_recv(), Ok(ServerEvent::ReceiveMessage(_))));
}

#[tokio::test]
async fn nicht_mitglied_darf_nicht_in_kanal_senden() {
    let u = umgebung().await;
    let admin = benutzer(&u.db, "Anna").await;
    let fremd = benutzer(&u.db, "Bernd").await;
    let kanal = ChannelService::neu(Arc::clone(&u.db))
        .kanal_erstellen(admin, "intern", &[])
        .await
        .unwrap();
    let mut rx_admin = verbinden(&u.registry, admin);

    let antwort = u
        .dispatcher
        .client_event_verarbeiten(
            fremd,
            ClientEvent::SendChannelMessage(SendeAnfrage::text_in_kanal(kanal.id, "hallo?")),
        )
        .await;

    assert!(matches!(antwort, Some(ServerEvent::Error(ref f)) if f.code == FehlerCode::Forbidden));
    assert!(rx_admin.try_recv().is_err());
}
