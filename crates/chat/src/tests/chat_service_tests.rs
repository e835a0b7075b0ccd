//! Unit-Tests fuer den ChatService

use plauder_protocol::{NachrichtenTyp, SendeAnfrage, ServerEvent};

use super::{benutzer, test_db};
use crate::{ChannelService, ChatError, ChatService, Zustellung, MAX_TEXT_LAENGE};

#[tokio::test]
async fn test_direktnachricht_senden_und_historie() {
    let db = test_db().await;
    let anna = benutzer(&db, "Anna").await;
    let ben = benutzer(&db, "Ben").await;
    let service = ChatService::neu(db);

    let zustellung = service
        .nachricht_senden(anna, &SendeAnfrage::text_an(ben, "hi"))
        .await
        .expect("Senden fehlgeschlagen");

    let Zustellung::Direkt(live) = &zustellung else {
        panic!("Erwartet Direktzustellung");
    };
    assert_eq!(live.sender.first_name.as_deref(), Some("Anna"));
    assert_eq!(live.receiver.as_ref().map(|r| r.id), Some(ben));
    assert!(matches!(zustellung.als_event(), ServerEvent::ReceiveMessage(_)));

    // Live-Datensatz und Historien-Eintrag sind identisch
    let historie = service.direkt_historie(ben, anna).await.unwrap();
    assert_eq!(historie.len(), 1);
    assert_eq!(&historie[0], live);
    assert_eq!(
        serde_json::to_string(&historie[0]).unwrap(),
        serde_json::to_string(live).unwrap()
    );
}

#[tokio::test]
async fn test_historie_aufsteigend_mit_monotonen_zeitstempeln() {
    let db = test_db().await;
    let anna = benutzer(&db, "Anna").await;
    let ben = benutzer(&db, "Ben").await;
    let service = ChatService::neu(db);

    for i in 0..20 {
        let (von, an) = if i % 2 == 0 { (anna, ben) } else { (ben, anna) };
        service
            .nachricht_senden(von, &SendeAnfrage::text_an(an, format!("n{i}")))
            .await
            .unwrap();
    }

    let historie = service.direkt_historie(anna, ben).await.unwrap();
    assert_eq!(historie.len(), 20);
    for paar in historie.windows(2) {
        assert!(paar[0].timestamp < paar[1].timestamp);
    }
    assert_eq!(historie[0].content.as_deref(), Some("n0"));
    assert_eq!(historie[19].content.as_deref(), Some("n19"));
}

#[tokio::test]
async fn test_dateinachricht_ohne_inhalt() {
    let db = test_db().await;
    let anna = benutzer(&db, "Anna").await;
    let ben = benutzer(&db, "Ben").await;
    let service = ChatService::neu(db);

    let zustellung = service
        .nachricht_senden(anna, &SendeAnfrage::datei_an(ben, "/files/files/1/a.pdf"))
        .await
        .unwrap();
    assert_eq!(zustellung.nachricht().message_type, NachrichtenTyp::File);
    assert!(zustellung.nachricht().content.is_none());

    let historie = service.direkt_historie(anna, ben).await.unwrap();
    assert!(historie[0].content.is_none());
    assert_eq!(historie[0].file_url.as_deref(), Some("/files/files/1/a.pdf"));
}

#[tokio::test]
async fn test_ungueltige_nachrichten_werden_nicht_gespeichert() {
    let db = test_db().await;
    let anna = benutzer(&db, "Anna").await;
    let ben = benutzer(&db, "Ben").await;
    let service = ChatService::neu(db);

    // Leerer Text
    let err = service
        .nachricht_senden(anna, &SendeAnfrage::text_an(ben, "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::UngueltigeNachricht(_)));

    // Zu lang
    let lang = "x".repeat(MAX_TEXT_LAENGE + 1);
    let err = service
        .nachricht_senden(anna, &SendeAnfrage::text_an(ben, lang))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::UngueltigeNachricht(_)));

    // Kein Ziel
    let mut anfrage = SendeAnfrage::text_an(ben, "hi");
    anfrage.receiver = None;
    let err = service.nachricht_senden(anna, &anfrage).await.unwrap_err();
    assert!(matches!(err, ChatError::UngueltigeNachricht(_)));

    // Datei mit Text
    let mut anfrage = SendeAnfrage::datei_an(ben, "/files/x.png");
    anfrage.content = Some("text".into());
    let err = service.nachricht_senden(anna, &anfrage).await.unwrap_err();
    assert!(matches!(err, ChatError::UngueltigeNachricht(_)));

    // Datei ohne URL
    let mut anfrage = SendeAnfrage::datei_an(ben, "");
    anfrage.file_url = None;
    let err = service.nachricht_senden(anna, &anfrage).await.unwrap_err();
    assert!(matches!(err, ChatError::UngueltigeNachricht(_)));

    assert!(service.direkt_historie(anna, ben).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_text_mit_genau_maximaler_laenge() {
    let db = test_db().await;
    let anna = benutzer(&db, "Anna").await;
    let ben = benutzer(&db, "Ben").await;
    let service = ChatService::neu(db);

    let text = "ä".repeat(MAX_TEXT_LAENGE);
    assert!(service
        .nachricht_senden(anna, &SendeAnfrage::text_an(ben, text))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_unbekannter_empfaenger() {
    let db = test_db().await;
    let anna = benutzer(&db, "Anna").await;
    let service = ChatService::neu(db);

    let err = service
        .nachricht_senden(anna, &SendeAnfrage::text_an(plauder_core::UserId::new(), "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::BenutzerNichtGefunden(_)));
}

#[tokio::test]
async fn test_kanalnachricht_an_alle_mitglieder() {
    let db = test_db().await;
    let u1 = benutzer(&db, "Uno").await;
    let u2 = benutzer(&db, "Duo").await;
    let u3 = benutzer(&db, "Tre").await;
    let kanaele = ChannelService::neu(db.clone());
    let kanal = kanaele.kanal_erstellen(u1, "team", &[u2, u3]).await.unwrap();
    let service = ChatService::neu(db);

    let zustellung = service
        .nachricht_senden(u2, &SendeAnfrage::text_in_kanal(kanal.id, "moin"))
        .await
        .unwrap();

    let Zustellung::Kanal { nachricht, mitglieder } = &zustellung else {
        panic!("Erwartet Kanalzustellung");
    };
    assert_eq!(nachricht.channel_name, "team");
    assert_eq!(nachricht.nachricht.channel_id, Some(kanal.id));
    assert!(nachricht.nachricht.receiver.is_none());
    assert_eq!(mitglieder.len(), 3);
    for u in [u1, u2, u3] {
        assert!(mitglieder.contains(&u));
    }

    // Sofort ueber die Historie abrufbar
    let historie = service.kanal_historie(u3, kanal.id).await.unwrap();
    assert_eq!(historie, vec![nachricht.nachricht.clone()]);
    assert_eq!(historie[0].sender.first_name.as_deref(), Some("Duo"));
}

#[tokio::test]
async fn test_kanal_nur_fuer_mitglieder() {
    let db = test_db().await;
    let admin = benutzer(&db, "Admin").await;
    let fremd = benutzer(&db, "Fremd").await;
    let kanal = ChannelService::neu(db.clone())
        .kanal_erstellen(admin, "intern", &[])
        .await
        .unwrap();
    let service = ChatService::neu(db);

    let err = service
        .nachricht_senden(fremd, &SendeAnfrage::text_in_kanal(kanal.id, "hallo?"))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::KeineBerechtigung(_)));

    let err = service.kanal_historie(fremd, kanal.id).await.unwrap_err();
    assert!(matches!(err, ChatError::KeineBerechtigung(_)));
}

#[tokio::test]
async fn test_unbekannter_kanal() {
    let db = test_db().await;
    let anna = benutzer(&db, "Anna").await;
    let service = ChatService::neu(db);
    let unbekannt = plauder_core::ChannelId::new();

    let err = service.kanal_historie(anna, unbekannt).await.unwrap_err();
    assert!(matches!(err, ChatError::KanalNichtGefunden(_)));

    let err = service
        .nachricht_senden(anna, &SendeAnfrage::text_in_kanal(unbekannt, "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::KanalNichtGefunden(_)));
}
