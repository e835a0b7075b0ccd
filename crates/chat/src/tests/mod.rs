mod chat_service_tests;
mod contact_service_tests;
mod storage_tests;

use std::sync::Arc;

use plauder_core::types::UserId;
use plauder_db::{
    models::{NeuerBenutzer, ProfilUpdate},
    SqliteDb, UserRepository,
};

pub(crate) async fn test_db() -> Arc<SqliteDb> {
    Arc::new(
        SqliteDb::in_memory()
            .await
            .expect("In-Memory-DB konnte nicht geoeffnet werden"),
    )
}

/// Legt einen Benutzer mit vollstaendigem Profil an
pub(crate) async fn benutzer(db: &SqliteDb, vorname: &str) -> UserId {
    let email = format!("{}@example.org", vorname.to_lowercase());
    let b = UserRepository::create(
        db,
        NeuerBenutzer {
            email: &email,
            password_hash: "hash",
        },
    )
    .await
    .expect("User anlegen fehlgeschlagen");

    UserRepository::update_profile(
        db,
        b.id,
        ProfilUpdate {
            first_name: vorname,
            last_name: "Test",
            color: 1,
        },
    )
    .await
    .expect("Profil setzen fehlgeschlagen");

    b.id
}
