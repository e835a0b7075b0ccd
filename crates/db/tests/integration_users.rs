//! Integration-Tests fuer UserRepository (In-Memory SQLite)

use plauder_db::{
    models::{NeuerBenutzer, ProfilUpdate},
    DbError, SqliteDb, UserRepository,
};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

async fn anlegen(db: &SqliteDb, email: &str) -> plauder_db::models::BenutzerRecord {
    UserRepository::create(
        db,
        NeuerBenutzer {
            email,
            password_hash: "hash",
        },
    )
    .await
    .expect("Benutzer erstellen fehlgeschlagen")
}

#[tokio::test]
async fn benutzer_erstellen_und_laden() {
    let db = db().await;
    let user = anlegen(&db, "alice@example.org").await;

    assert_eq!(user.email, "alice@example.org");
    assert!(!user.profile_setup);
    assert_eq!(user.color, 0);

    let geladen = UserRepository::get_by_id(&db, user.id)
        .await
        .unwrap()
        .expect("Benutzer sollte gefunden werden");
    assert_eq!(geladen, user);
}

#[tokio::test]
async fn email_ist_eindeutig_ohne_gross_klein() {
    let db = db().await;
    anlegen(&db, "bob@example.org").await;

    let err = UserRepository::create(
        &db,
        NeuerBenutzer {
            email: "BOB@example.org",
            password_hash: "x",
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DbError::Eindeutigkeit(_)));

    let gefunden = UserRepository::get_by_email(&db, "Bob@Example.org")
        .await
        .unwrap();
    assert!(gefunden.is_some());
}

#[tokio::test]
async fn profil_aktualisieren_setzt_profile_setup() {
    let db = db().await;
    let user = anlegen(&db, "carla@example.org").await;

    let aktualisiert = UserRepository::update_profile(
        &db,
        user.id,
        ProfilUpdate {
            first_name: "Carla",
            last_name: "Conrad",
            color: 3,
        },
    )
    .await
    .unwrap();

    assert!(aktualisiert.profile_setup);
    assert_eq!(aktualisiert.first_name.as_deref(), Some("Carla"));
    assert_eq!(aktualisiert.color, 3);
}

#[tokio::test]
async fn profilbild_setzen_und_entfernen() {
    let db = db().await;
    let user = anlegen(&db, "dora@example.org").await;

    let mit_bild = UserRepository::set_image(&db, user.id, Some("/files/profiles/d.png"))
        .await
        .unwrap();
    assert_eq!(mit_bild.image.as_deref(), Some("/files/profiles/d.png"));

    let ohne_bild = UserRepository::set_image(&db, user.id, None).await.unwrap();
    assert!(ohne_bild.image.is_none());
}

#[tokio::test]
async fn update_unbekannter_benutzer_ist_nicht_gefunden() {
    let db = db().await;
    let err = UserRepository::set_image(&db, plauder_core::UserId::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NichtGefunden(_)));
}

#[tokio::test]
async fn suche_ist_woertlich_und_schliesst_sich_selbst_aus() {
    let db = db().await;
    let ich = anlegen(&db, "ich@example.org").await;
    let anna = anlegen(&db, "anna@example.org").await;
    let punkt = anlegen(&db, "a.b@example.org").await;
    UserRepository::update_profile(
        &db,
        anna.id,
        ProfilUpdate {
            first_name: "Anna",
            last_name: "Berg",
            color: 1,
        },
    )
    .await
    .unwrap();

    // Gross-/Kleinschreibung egal
    let treffer = UserRepository::search(&db, ich.id, "BERG").await.unwrap();
    assert_eq!(treffer.len(), 1);
    assert_eq!(treffer[0].id, anna.id);

    // "." ist kein Platzhalter
    let treffer = UserRepository::search(&db, ich.id, "a.b").await.unwrap();
    assert_eq!(treffer.len(), 1);
    assert_eq!(treffer[0].id, punkt.id);

    // "%" ist kein Platzhalter
    let treffer = UserRepository::search(&db, ich.id, "%").await.unwrap();
    assert!(treffer.is_empty());

    // Leerer Suchbegriff findet alle ausser mir
    let alle = UserRepository::search(&db, ich.id, "").await.unwrap();
    assert_eq!(alle.len(), 2);
    assert!(alle.iter().all(|u| u.id != ich.id));
}

#[tokio::test]
async fn mehrere_laden_und_andere_auflisten() {
    let db = db().await;
    let a = anlegen(&db, "a@example.org").await;
    let b = anlegen(&db, "b@example.org").await;
    let c = anlegen(&db, "c@example.org").await;

    let geladen = UserRepository::get_many(&db, &[a.id, c.id, plauder_core::UserId::new()])
        .await
        .unwrap();
    assert_eq!(geladen.len(), 2);

    let andere = UserRepository::list_others(&db, b.id).await.unwrap();
    let ids: Vec<_> = andere.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![a.id, c.id]);

    assert!(UserRepository::get_many(&db, &[]).await.unwrap().is_empty());
}
