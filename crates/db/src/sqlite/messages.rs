//! SQLite-Implementierung des MessageRepository

use plauder_core::types::{ChannelId, MessageId, UserId};
use plauder_protocol::{NachrichtenTyp, Nachrichtenziel};

use crate::error::DbError;
use crate::models::{DmKontaktRecord, NachrichtRecord, NeueNachricht};
use crate::repository::{DbResult, MessageRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::users::row_to_benutzer;
use crate::sqlite::{id_lesen, zeit_lesen, zeit_schreiben};

const SPALTEN: &str =
    "id, sender_id, recipient_id, channel_id, message_type, content, file_url, timestamp";

impl MessageRepository for SqliteDb {
    async fn create(&self, data: NeueNachricht<'_>) -> DbResult<NachrichtRecord> {
        let id = MessageId::new();
        let zeit = zeit_schreiben(&data.timestamp);
        let (recipient_id, channel_id) = match data.ziel {
            Nachrichtenziel::Direkt(empfaenger) => (Some(empfaenger), None),
            Nachrichtenziel::Kanal(kanal) => (None, Some(kanal)),
        };

        let mut tx = self.pool.begin().await?;

        if let Some(kanal) = channel_id {
            let affected = sqlx::query("UPDATE channels SET updated_at = ? WHERE id = ?")
                .bind(&zeit)
                .bind(kanal.to_string())
                .execute(&mut *tx)
                .await?
                .rows_affected();
            if affected == 0 {
                return Err(DbError::nicht_gefunden(format!("Kanal {kanal}")));
            }
        }

        sqlx::query(
            "INSERT INTO messages
             (id, sender_id, recipient_id, channel_id, message_type, content, file_url, timestamp)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.sender_id.to_string())
        .bind(recipient_id.map(|u| u.to_string()))
        .bind(channel_id.map(|c| c.to_string()))
        .bind(data.message_type.als_str())
        .bind(data.content)
        .bind(data.file_url)
        .bind(&zeit)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(NachrichtRecord {
            id,
            sender_id: data.sender_id,
            recipient_id,
            channel_id,
            message_type: data.message_type,
            content: data.content.map(str::to_string),
            file_url: data.file_url.map(str::to_string),
            timestamp: zeit_lesen(&zeit, "messages.timestamp")?,
        })
    }

    async fn direct_history(&self, a: UserId, b: UserId) -> DbResult<Vec<NachrichtRecord>> {
        let sql = format!(
            "SELECT {SPALTEN} FROM messages
             WHERE (sender_id = ? AND recipient_id = ?)
                OR (sender_id = ? AND recipient_id = ?)
             ORDER BY timestamp ASC, id ASC"
        );
        let (a, b) = (a.to_string(), b.to_string());
        let rows = sqlx::query(&sql)
            .bind(&a)
            .bind(&b)
            .bind(&b)
            .bind(&a)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_nachricht).collect()
    }

    async fn channel_history(&self, channel_id: ChannelId) -> DbResult<Vec<NachrichtRecord>> {
        let sql = format!(
            "SELECT {SPALTEN} FROM messages
             WHERE channel_id = ?
             ORDER BY timestamp ASC, id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(channel_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_nachricht).collect()
    }

    async fn dm_contacts(&self, user_id: UserId) -> DbResult<Vec<DmKontaktRecord>> {
        use sqlx::Row as _;

        let user = user_id.to_string();
        let rows = sqlx::query(
            "SELECT u.id, u.email, u.password_hash, u.first_name, u.last_name, u.image,
                    u.color, u.profile_setup, u.created_at, k.last_message_time
             FROM (
                 SELECT CASE WHEN sender_id = ? THEN recipient_id ELSE sender_id END AS kontakt_id,
                        MAX(timestamp) AS last_message_time
                 FROM messages
                 WHERE recipient_id IS NOT NULL AND (sender_id = ? OR recipient_id = ?)
                 GROUP BY kontakt_id
             ) k
             JOIN users u ON u.id = k.kontakt_id
             ORDER BY k.last_message_time DESC",
        )
        .bind(&user)
        .bind(&user)
        .bind(&user)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> DbResult<DmKontaktRecord> {
                let zeit: String = row.try_get("last_message_time")?;
                Ok(DmKontaktRecord {
                    benutzer: row_to_benutzer(row)?,
                    last_message_time: zeit_lesen(&zeit, "last_message_time")?,
                })
            })
            .collect()
    }
}

fn row_to_nachricht(row: &sqlx::sqlite::SqliteRow) -> DbResult<NachrichtRecord> {
    use sqlx::Row as _;

    let id: String = row.try_get("id")?;
    let sender: String = row.try_get("sender_id")?;
    let receiver: Option<String> = row.try_get("recipient_id")?;
    let channel: Option<String> = row.try_get("channel_id")?;
    let typ: String = row.try_get("message_type")?;
    let zeit: String = row.try_get("timestamp")?;

    let message_type = NachrichtenTyp::aus_str(&typ)
        .ok_or_else(|| DbError::UngueltigeDaten(format!("Unbekannter Nachrichtentyp: {typ}")))?;

    Ok(NachrichtRecord {
        id: id_lesen(&id, "messages.id")?,
        sender_id: id_lesen(&sender, "messages.sender_id")?,
        recipient_id: receiver
            .as_deref()
            .map(|r| id_lesen(r, "messages.recipient_id"))
            .transpose()?,
        channel_id: channel
            .as_deref()
            .map(|c| id_lesen(c, "messages.channel_id"))
            .transpose()?,
        message_type,
        content: row.try_get("content")?,
        file_url: row.try_get("file_url")?,
        timestamp: zeit_lesen(&zeit, "messages.timestamp")?,
    })
}
