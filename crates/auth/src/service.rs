//! Auth-Service fuer Plauder
//!
//! Registrierung, Login, Logout und Profilpflege. Nutzt das
//! UserRepository und den Session-Store.

use std::sync::Arc;

use plauder_core::types::UserId;
use plauder_db::{
    models::{BenutzerRecord, NeuerBenutzer, ProfilUpdate},
    repository::UserRepository,
};

use crate::{
    error::{AuthError, AuthResult},
    password::{passwort_hashen, passwort_verifizieren},
    session::{Session, SessionStore},
};

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService<U: UserRepository> {
    user_repo: Arc<U>,
    session_store: Arc<SessionStore>,
}

impl<U: UserRepository> AuthService<U> {
    pub fn neu(user_repo: Arc<U>, session_store: Arc<SessionStore>) -> Self {
        Self {
            user_repo,
            session_store,
        }
    }

    /// Registriert einen neuen Benutzer und meldet ihn direkt an
    pub async fn registrieren(
        &self,
        email: &str,
        passwort: &str,
    ) -> AuthResult<(BenutzerRecord, Session)> {
        let email = email.trim();
        if email.is_empty() || passwort.is_empty() {
            return Err(AuthError::UngueltigeEingabe(
                "E-Mail und Passwort sind erforderlich".into(),
            ));
        }

        if self.user_repo.get_by_email(email).await?.is_some() {
            return Err(AuthError::EmailVergeben(email.to_string()));
        }

        let passwort_hash = passwort_hashen(passwort)?;
        let benutzer = self
            .user_repo
            .create(NeuerBenutzer {
                email,
                password_hash: &passwort_hash,
            })
            .await
            .map_err(|e| {
                if e.ist_eindeutigkeit() {
                    AuthError::EmailVergeben(email.to_string())
                } else {
                    AuthError::Datenbank(e)
                }
            })?;

        let session = self.session_store.erstellen(benutzer.id).await;

        tracing::info!(user_id = %benutzer.id, email = %benutzer.email, "Neuer Benutzer registriert");
        Ok((benutzer, session))
    }

    /// Meldet einen Benutzer an und erstellt eine neue Session
    ///
    /// Unbekannte E-Mail ergibt `EmailUnbekannt`, falsches Passwort `FalschesPasswort`.
    pub async fn anmelden(
        &self,
        email: &str,
        passwort: &str,
    ) -> AuthResult<(BenutzerRecord, Session)> {
        if email.trim().is_empty() || passwort.is_empty() {
            return Err(AuthError::UngueltigeEingabe(
                "E-Mail und Passwort sind erforderlich".into(),
            ));
        }

        let benutzer = self
            .user_repo
            .get_by_email(email.trim())
            .await?
            .ok_or(AuthError::EmailUnbekannt)?;

        if !passwort_verifizieren(passwort, &benutzer.password_hash)? {
            tracing::warn!(email = %benutzer.email, "Fehlgeschlagener Login-Versuch");
            return Err(AuthError::FalschesPasswort);
        }

        let session = self.session_store.erstellen(benutzer.id).await;

        tracing::info!(user_id = %benutzer.id, "Benutzer angemeldet");
        Ok((benutzer, session))
    }

    /// Meldet ab und invalidiert die Session
    pub async fn abmelden(&self, session_token: &str) {
        if self.session_store.invalidieren(session_token).await {
            tracing::debug!("Session invalidiert (Abmeldung)");
        }
    }

    /// Laedt den Benutzer-Datensatz des angemeldeten Benutzers
    pub async fn benutzer_info(&self, user_id: UserId) -> AuthResult<BenutzerRecord> {
        self.user_repo
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::BenutzerNichtGefunden(user_id.to_string()))
    }

    /// Aktualisiert das Profil; Vorname, Nachname und Farbe sind Pflicht
    pub async fn profil_aktualisieren(
        &self,
        user_id: UserId,
        first_name: Option<&str>,
        last_name: Option<&str>,
        color: Option<i32>,
    ) -> AuthResult<BenutzerRecord> {
        let (Some(first_name), Some(last_name), Some(color)) = (
            first_name.map(str::trim).filter(|s| !s.is_empty()),
            last_name.map(str::trim).filter(|s| !s.is_empty()),
            color,
        ) else {
            return Err(AuthError::UngueltigeEingabe(
                "Vorname, Nachname und Farbe sind erforderlich".into(),
            ));
        };

        let benutzer = self
            .user_repo
            .update_profile(
                user_id,
                ProfilUpdate {
                    first_name,
                    last_name,
                    color,
                },
            )
            .await?;

        tracing::debug!(user_id = %user_id, "Profil aktualisiert");
        Ok(benutzer)
    }

    /// Setzt die URL des Profilbilds
    pub async fn profilbild_setzen(&self, user_id: UserId, url: &str) -> AuthResult<BenutzerRecord> {
        Ok(self.user_repo.set_image(user_id, Some(url)).await?)
    }

    /// Entfernt das Profilbild; gibt die alte URL zurueck
    pub async fn profilbild_entfernen(&self, user_id: UserId) -> AuthResult<Option<String>> {
        let benutzer = self.benutzer_info(user_id).await?;
        self.user_repo.set_image(user_id, None).await?;
        Ok(benutzer.image)
    }

    /// Gibt den Session-Store zurueck (fuer den IdentityContext)
    pub fn session_store(&self) -> &Arc<SessionStore> {
        &self.session_store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plauder_db::SqliteDb;

    async fn service() -> AuthService<SqliteDb> {
        let db = Arc::new(SqliteDb::in_memory().await.unwrap());
        AuthService::neu(db, SessionStore::neu())
    }

    #[tokio::test]
    async fn registrieren_und_anmelden() {
        let svc = service().await;
        let (benutzer, session) = svc.registrieren("anna@example.org", "geheim").await.unwrap();
        assert_eq!(session.user_id, benutzer.id);
        assert!(!benutzer.profile_setup);

        let (angemeldet, _) = svc.anmelden("ANNA@example.org", "geheim").await.unwrap();
        assert_eq!(angemeldet.id, benutzer.id);
    }

    #[tokio::test]
    async fn doppelte_email_wird_abgelehnt() {
        let svc = service().await;
        svc.registrieren("ben@example.org", "x").await.unwrap();
        let err = svc.registrieren("ben@example.org", "y").await.unwrap_err();
        assert!(matches!(err, AuthError::EmailVergeben(_)));
    }

    #[tokio::test]
    async fn leere_eingaben_sind_ungueltig() {
        let svc = service().await;
        assert!(matches!(
            svc.registrieren("", "x").await,
            Err(AuthError::UngueltigeEingabe(_))
        ));
        assert!(matches!(
            svc.anmelden("a@example.org", "").await,
            Err(AuthError::UngueltigeEingabe(_))
        ));
    }

    #[tokio::test]
    async fn unbekannte_email_und_falsches_passwort() {
        let svc = service().await;
        svc.registrieren("carl@example.org", "richtig").await.unwrap();

        assert!(matches!(
            svc.anmelden("niemand@example.org", "richtig").await,
            Err(AuthError::EmailUnbekannt)
        ));
        assert!(matches!(
            svc.anmelden("carl@example.org", "falsch").await,
            Err(AuthError::FalschesPasswort)
        ));
    }

    #[tokio::test]
    async fn abmelden_invalidiert_session() {
        let svc = service().await;
        let (_, session) = svc.registrieren("dora@example.org", "pw").await.unwrap();
        svc.abmelden(&session.token).await;
        assert!(svc.session_store().validieren(&session.token).await.is_err());
    }

    #[tokio::test]
    async fn profil_verlangt_alle_felder() {
        let svc = service().await;
        let (benutzer, _) = svc.registrieren("emil@example.org", "pw").await.unwrap();

        let err = svc
            .profil_aktualisieren(benutzer.id, Some("Emil"), None, Some(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UngueltigeEingabe(_)));

        let aktualisiert = svc
            .profil_aktualisieren(benutzer.id, Some("Emil"), Some("Ernst"), Some(1))
            .await
            .unwrap();
        assert!(aktualisiert.profile_setup);
        assert_eq!(aktualisiert.last_name.as_deref(), Some("Ernst"));
    }

    #[tokio::test]
    async fn profilbild_setzen_und_entfernen() {
        let svc = service().await;
        let (benutzer, _) = svc.registrieren("fritz@example.org", "pw").await.unwrap();

        svc.profilbild_setzen(benutzer.id, "/files/profiles/f.png")
            .await
            .unwrap();
        let alt = svc.profilbild_entfernen(benutzer.id).await.unwrap();
        assert_eq!(alt.as_deref(), Some("/files/profiles/f.png"));
        assert!(svc.benutzer_info(benutzer.id).await.unwrap().image.is_none());
    }
}
