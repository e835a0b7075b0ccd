//! SQLite-Implementierung des ChannelRepository

use plauder_core::types::{ChannelId, UserId};

use crate::models::{KanalRecord, NeuerKanal};
use crate::repository::{ChannelRepository, DbResult};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{id_lesen, zeit_lesen, zeit_schreiben};

impl ChannelRepository for SqliteDb {
    async fn create(&self, data: NeuerKanal<'_>) -> DbResult<KanalRecord> {
        let id = ChannelId::new();
        let zeit = zeit_schreiben(&data.created_at);

        // Admin ist immer Mitglied, Duplikate werden zusammengefasst
        let mut members: Vec<UserId> = Vec::with_capacity(data.members.len() + 1);
        for m in std::iter::once(&data.admin_id).chain(data.members.iter()) {
            if !members.contains(m) {
                members.push(*m);
            }
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO channels (id, name, admin_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.name)
        .bind(data.admin_id.to_string())
        .bind(&zeit)
        .bind(&zeit)
        .execute(&mut *tx)
        .await?;

        for m in &members {
            sqlx::query("INSERT INTO channel_members (channel_id, user_id) VALUES (?, ?)")
                .bind(id.to_string())
                .bind(m.to_string())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        let created_at = zeit_lesen(&zeit, "channels.created_at")?;
        Ok(KanalRecord {
            id,
            name: data.name.to_string(),
            admin_id: data.admin_id,
            members,
            created_at,
            updated_at: created_at,
        })
    }

    async fn get_by_id(&self, id: ChannelId) -> DbResult<Option<KanalRecord>> {
        let row = sqlx::query(
            "SELECT id, name, admin_id, created_at, updated_at FROM channels WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => {
                let members = self.mitglieder_laden(id).await?;
                Ok(Some(row_to_kanal(&r, members)?))
            }
            None => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<KanalRecord>> {
        let user = user_id.to_string();
        let rows = sqlx::query(
            "SELECT id, name, admin_id, created_at, updated_at FROM channels
             WHERE admin_id = ?
                OR id IN (SELECT channel_id FROM channel_members WHERE user_id = ?)
             ORDER BY updated_at DESC",
        )
        .bind(&user)
        .bind(&user)
        .fetch_all(&self.pool)
        .await?;

        let mut kanaele = Vec::with_capacity(rows.len());
        for r in &rows {
            use sqlx::Row as _;
            let id_str: String = r.try_get("id")?;
            let id: ChannelId = id_lesen(&id_str, "channels.id")?;
            let members = self.mitglieder_laden(id).await?;
            kanaele.push(row_to_kanal(r, members)?);
        }
        Ok(kanaele)
    }
}

impl SqliteDb {
    async fn mitglieder_laden(&self, id: ChannelId) -> DbResult<Vec<UserId>> {
        use sqlx::Row as _;

        let rows =
            sqlx::query("SELECT user_id FROM channel_members WHERE channel_id = ? ORDER BY rowid")
                .bind(id.to_string())
                .fetch_all(&self.pool)
                .await?;

        rows.iter()
            .map(|r| -> DbResult<UserId> {
                let s: String = r.try_get("user_id")?;
                id_lesen(&s, "channel_members.user_id")
            })
            .collect()
    }
}

fn row_to_kanal(row: &sqlx::sqlite::SqliteRow, members: Vec<UserId>) -> DbResult<KanalRecord> {
    use sqlx::Row as _;

    let id: String = row.try_get("id")?;
    let admin: String = row.try_get("admin_id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(KanalRecord {
        id: id_lesen(&id, "channels.id")?,
        name: row.try_get("name")?,
        admin_id: id_lesen(&admin, "channels.admin_id")?,
        members,
        created_at: zeit_lesen(&created_at, "channels.created_at")?,
        updated_at: zeit_lesen(&updated_at, "channels.updated_at")?,
    })
}
