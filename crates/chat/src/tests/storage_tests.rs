//! Unit-Tests fuer das DiskStorage-Backend

use crate::storage::{BlobStore, DiskStorage};
use crate::ChatError;

fn temp_storage() -> (DiskStorage, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Temp-Verzeichnis konnte nicht erstellt werden");
    let storage = DiskStorage::new(dir.path(), "/files/");
    (storage, dir)
}

#[tokio::test]
async fn test_ablegen_liefert_url_und_legt_verzeichnis_an() {
    let (storage, dir) = temp_storage();

    let url = storage
        .ablegen("files/123/bericht.pdf", b"%PDF")
        .await
        .expect("Ablegen fehlgeschlagen");

    assert_eq!(url, "/files/files/123/bericht.pdf");
    let gelesen = std::fs::read(dir.path().join("files/123/bericht.pdf")).unwrap();
    assert_eq!(gelesen, b"%PDF");
}

#[tokio::test]
async fn test_entfernen_ueber_url() {
    let (storage, dir) = temp_storage();

    let url = storage.ablegen("profiles/a.png", b"png").await.unwrap();
    assert!(dir.path().join("profiles/a.png").exists());

    storage.entfernen(&url).await.expect("Entfernen fehlgeschlagen");
    assert!(!dir.path().join("profiles/a.png").exists());

    // Zweites Entfernen ist kein Fehler
    storage.entfernen(&url).await.expect("Doppeltes Entfernen fehlgeschlagen");
}

#[tokio::test]
async fn test_pfad_ausbruch_wird_abgelehnt() {
    let (storage, _dir) = temp_storage();

    let err = storage.ablegen("../ausbruch.txt", b"x").await.unwrap_err();
    assert!(matches!(err, ChatError::SpeicherFehler(_)));

    let err = storage.ablegen("/etc/passwd", b"x").await.unwrap_err();
    assert!(matches!(err, ChatError::SpeicherFehler(_)));

    let err = storage.entfernen("https://fremd.example/a.png").await.unwrap_err();
    assert!(matches!(err, ChatError::SpeicherFehler(_)));
}
