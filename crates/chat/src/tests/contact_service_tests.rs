//! Unit-Tests fuer den ContactService

use plauder_protocol::SendeAnfrage;

use super::{benutzer, test_db};
use crate::{ChatService, ContactService};

#[tokio::test]
async fn test_suche_schliesst_sich_selbst_aus() {
    let db = test_db().await;
    let anna = benutzer(&db, "Anna").await;
    let hanna = benutzer(&db, "Hanna").await;
    let _ben = benutzer(&db, "Ben").await;
    let service = ContactService::neu(db);

    let treffer = service.suchen(anna, "ANNA").await.unwrap();
    assert_eq!(treffer.len(), 1);
    assert_eq!(treffer[0].id, hanna);

    let alle = service.suchen(anna, "").await.unwrap();
    assert_eq!(alle.len(), 2);

    // Regex-Zeichen sind woertlich gemeint
    assert!(service.suchen(anna, "a.*").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_dm_kontakte_neueste_zuerst() {
    let db = test_db().await;
    let ich = benutzer(&db, "Ich").await;
    let b = benutzer(&db, "Ben").await;
    let c = benutzer(&db, "Cleo").await;
    let chat = ChatService::neu(db.clone());
    let service = ContactService::neu(db);

    chat.nachricht_senden(ich, &SendeAnfrage::text_an(b, "1")).await.unwrap();
    chat.nachricht_senden(c, &SendeAnfrage::text_an(ich, "2")).await.unwrap();

    let kontakte = service.dm_kontakte(ich).await.unwrap();
    let ids: Vec<_> = kontakte.iter().map(|k| k.profil.id).collect();
    assert_eq!(ids, vec![c, b]);
    assert!(kontakte[0].last_message_time > kontakte[1].last_message_time);

    chat.nachricht_senden(ich, &SendeAnfrage::text_an(b, "3")).await.unwrap();
    let kontakte = service.dm_kontakte(ich).await.unwrap();
    assert_eq!(kontakte[0].profil.id, b);
}

#[tokio::test]
async fn test_alle_kontakte_mit_label() {
    let db = test_db().await;
    let ich = benutzer(&db, "Ich").await;
    let ben = benutzer(&db, "Ben").await;
    let ohne_profil = plauder_db::UserRepository::create(
        db.as_ref(),
        plauder_db::models::NeuerBenutzer {
            email: "leer@example.org",
            password_hash: "x",
        },
    )
    .await
    .unwrap();
    let service = ContactService::neu(db);

    let optionen = service.alle_kontakte(ich).await.unwrap();
    assert_eq!(optionen.len(), 2);

    let ben_option = optionen.iter().find(|o| o.value == ben).unwrap();
    assert_eq!(ben_option.label, "Ben Test");

    let leer_option = optionen.iter().find(|o| o.value == ohne_profil.id).unwrap();
    assert_eq!(leer_option.label, "leer@example.org");
}
