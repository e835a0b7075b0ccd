//! Integration-Tests fuer ChannelRepository (In-Memory SQLite)

use chrono::Utc;

use plauder_db::{
    models::{NeueNachricht, NeuerBenutzer, NeuerKanal},
    ChannelRepository, MessageRepository, SqliteDb, UserRepository,
};
use plauder_protocol::{NachrichtenTyp, Nachrichtenziel};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

async fn benutzer(db: &SqliteDb, email: &str) -> plauder_core::UserId {
    UserRepository::create(
        db,
        NeuerBenutzer {
            email,
            password_hash: "hash",
        },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn kanal_erstellen_und_laden() {
    let db = db().await;
    let admin = benutzer(&db, "admin@example.org").await;
    let m1 = benutzer(&db, "m1@example.org").await;

    let kanal = ChannelRepository::create(
        &db,
        NeuerKanal {
            name: "allgemein",
            admin_id: admin,
            members: &[m1, m1],
            created_at: Utc::now(),
        },
    )
    .await
    .unwrap();

    assert_eq!(kanal.name, "allgemein");
    assert_eq!(kanal.members, vec![admin, m1]);
    assert!(kanal.ist_mitglied(admin));
    assert_eq!(kanal.created_at, kanal.updated_at);

    let geladen = ChannelRepository::get_by_id(&db, kanal.id)
        .await
        .unwrap()
        .expect("Kanal sollte gefunden werden");
    assert_eq!(geladen, kanal);
}

#[tokio::test]
async fn unbekannter_kanal_ist_none() {
    let db = db().await;
    let kanal = ChannelRepository::get_by_id(&db, plauder_core::ChannelId::new())
        .await
        .unwrap();
    assert!(kanal.is_none());
}

#[tokio::test]
async fn unbekanntes_mitglied_legt_nichts_an() {
    let db = db().await;
    let admin = benutzer(&db, "admin@example.org").await;

    let ergebnis = ChannelRepository::create(
        &db,
        NeuerKanal {
            name: "kaputt",
            admin_id: admin,
            members: &[plauder_core::UserId::new()],
            created_at: Utc::now(),
        },
    )
    .await;
    assert!(ergebnis.is_err());

    let kanaele = ChannelRepository::list_for_user(&db, admin).await.unwrap();
    assert!(kanaele.is_empty());
}

#[tokio::test]
async fn kanaele_nach_letzter_aktivitaet_sortiert() {
    let db = db().await;
    let admin = benutzer(&db, "admin@example.org").await;
    let mitglied = benutzer(&db, "m@example.org").await;
    let fremd = benutzer(&db, "fremd@example.org").await;

    let start = Utc::now();
    let alt = ChannelRepository::create(
        &db,
        NeuerKanal {
            name: "alt",
            admin_id: admin,
            members: &[mitglied],
            created_at: start,
        },
    )
    .await
    .unwrap();
    let neu = ChannelRepository::create(
        &db,
        NeuerKanal {
            name: "neu",
            admin_id: admin,
            members: &[],
            created_at: start + chrono::Duration::seconds(1),
        },
    )
    .await
    .unwrap();

    let kanaele = ChannelRepository::list_for_user(&db, admin).await.unwrap();
    let namen: Vec<&str> = kanaele.iter().map(|k| k.name.as_str()).collect();
    assert_eq!(namen, vec!["neu", "alt"]);

    // Nachricht im alten Kanal schiebt ihn nach oben
    MessageRepository::create(
        &db,
        NeueNachricht {
            sender_id: mitglied,
            ziel: Nachrichtenziel::Kanal(alt.id),
            message_type: NachrichtenTyp::Text,
            content: Some("hallo"),
            file_url: None,
            timestamp: start + chrono::Duration::seconds(5),
        },
    )
    .await
    .unwrap();

    let kanaele = ChannelRepository::list_for_user(&db, admin).await.unwrap();
    assert_eq!(kanaele[0].id, alt.id);
    assert_eq!(kanaele[1].id, neu.id);

    // Mitglied sieht nur seinen Kanal, Fremde keinen
    let fuer_mitglied = ChannelRepository::list_for_user(&db, mitglied).await.unwrap();
    assert_eq!(fuer_mitglied.len(), 1);
    assert!(ChannelRepository::list_for_user(&db, fremd)
        .await
        .unwrap()
        .is_empty());
}
