//! SQLite-Implementierung des UserRepository

use chrono::Utc;

use plauder_core::types::UserId;
use plauder_core::zeit::auf_mikros;

use crate::error::DbError;
use crate::models::{BenutzerRecord, NeuerBenutzer, ProfilUpdate};
use crate::repository::{DbResult, UserRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{id_lesen, zeit_lesen, zeit_schreiben};

const SPALTEN: &str =
    "id, email, password_hash, first_name, last_name, image, color, profile_setup, created_at";

impl UserRepository for SqliteDb {
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
        let id = UserId::new();
        let now = auf_mikros(Utc::now());

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, color, profile_setup, created_at)
             VALUES (?, ?, ?, 0, 0, ?)",
        )
        .bind(id.to_string())
        .bind(data.email)
        .bind(data.password_hash)
        .bind(zeit_schreiben(&now))
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            e if e.ist_eindeutigkeit() => {
                DbError::Eindeutigkeit(format!("E-Mail '{}' bereits registriert", data.email))
            }
            e => e,
        })?;

        Ok(BenutzerRecord {
            id,
            email: data.email.to_string(),
            password_hash: data.password_hash.to_string(),
            first_name: None,
            last_name: None,
            image: None,
            color: 0,
            profile_setup: false,
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM users WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM users WHERE email = ? COLLATE NOCASE");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn get_many(&self, ids: &[UserId]) -> DbResult<Vec<BenutzerRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let platzhalter = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT {SPALTEN} FROM users WHERE id IN ({platzhalter})");
        let mut q = sqlx::query(&sql);
        for id in ids {
            q = q.bind(id.to_string());
        }

        let rows = q.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_benutzer).collect()
    }

    async fn update_profile(&self, id: UserId, data: ProfilUpdate<'_>) -> DbResult<BenutzerRecord> {
        let affected = sqlx::query(
            "UPDATE users SET first_name = ?, last_name = ?, color = ?, profile_setup = 1
             WHERE id = ?",
        )
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.color)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("User {id}")));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::intern("User nach Update nicht gefunden"))
    }

    async fn set_image(&self, id: UserId, image: Option<&str>) -> DbResult<BenutzerRecord> {
        let affected = sqlx::query("UPDATE users SET image = ? WHERE id = ?")
            .bind(image)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("User {id}")));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::intern("User nach Update nicht gefunden"))
    }

    async fn search(&self, exclude: UserId, term: &str) -> DbResult<Vec<BenutzerRecord>> {
        let muster = format!("%{}%", like_escapen(term));
        let sql = format!(
            "SELECT {SPALTEN} FROM users
             WHERE id != ?
               AND (first_name LIKE ? ESCAPE '\\'
                    OR last_name LIKE ? ESCAPE '\\'
                    OR email LIKE ? ESCAPE '\\')
             ORDER BY email"
        );
        let rows = sqlx::query(&sql)
            .bind(exclude.to_string())
            .bind(&muster)
            .bind(&muster)
            .bind(&muster)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_benutzer).collect()
    }

    async fn list_others(&self, exclude: UserId) -> DbResult<Vec<BenutzerRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM users WHERE id != ? ORDER BY email");
        let rows = sqlx::query(&sql)
            .bind(exclude.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_benutzer).collect()
    }
}

/// Maskiert LIKE-Platzhalter, damit der Suchbegriff woertlich gilt
fn like_escapen(term: &str) -> String {
    let mut aus = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            aus.push('\\');
        }
        aus.push(c);
    }
    aus
}

pub(crate) fn row_to_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    use sqlx::Row as _;

    let id_str: String = row.try_get("id")?;
    let created_at_str: String = row.try_get("created_at")?;
    let profile_setup: i64 = row.try_get("profile_setup")?;

    Ok(BenutzerRecord {
        id: id_lesen(&id_str, "users.id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        image: row.try_get("image")?,
        color: row.try_get("color")?,
        profile_setup: profile_setup != 0,
        created_at: zeit_lesen(&created_at_str, "users.created_at")?,
    })
}
