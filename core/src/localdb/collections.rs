// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use davsync_dav::Url;
use sqlx::{SqliteConnection, SqlitePool};

use crate::Collection;
use crate::localdb::services::decode_error;

const SELECT_COLUMNS: &str = "
SELECT c.id, c.service_id, h.url AS home_set_url, c.url, c.type, c.display_name,
    c.description, c.owner, c.color, c.timezone, c.supports_vevent, c.supports_vtodo,
    c.supports_vjournal, c.source, c.priv_write_content, c.priv_unbind, c.sync,
    c.force_read_only
FROM collections c
LEFT JOIN home_sets h ON h.id = c.home_set_id
";

#[derive(Debug, Clone)]
pub struct Collections {
    pool: SqlitePool,
}

impl Collections {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_by_service(&self, service_id: i64) -> Result<Vec<Collection>, sqlx::Error> {
        let sql = format!("{SELECT_COLUMNS} WHERE c.service_id = ? ORDER BY c.url;");

        let records: Vec<CollectionRecord> = sqlx::query_as(&sql)
            .bind(service_id)
            .fetch_all(&self.pool)
            .await?;

        records.into_iter().map(Collection::try_from).collect()
    }

    pub async fn get(&self, id: i64) -> Result<Option<Collection>, sqlx::Error> {
        let sql = format!("{SELECT_COLUMNS} WHERE c.id = ?;");

        let record: Option<CollectionRecord> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        record.map(Collection::try_from).transpose()
    }

    /// Selects or deselects a collection for sync. Returns whether it exists.
    pub async fn set_sync(&self, id: i64, sync: bool) -> Result<bool, sqlx::Error> {
        const SQL: &str = "UPDATE collections SET sync = ? WHERE id = ?;";

        let result = sqlx::query(SQL)
            .bind(sync)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sets or clears the forced read-only flag. Returns whether the collection exists.
    pub async fn set_force_read_only(
        &self,
        id: i64,
        force_read_only: bool,
    ) -> Result<bool, sqlx::Error> {
        const SQL: &str = "UPDATE collections SET force_read_only = ? WHERE id = ?;";

        let result = sqlx::query(SQL)
            .bind(force_read_only)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub(crate) async fn insert(
        conn: &mut SqliteConnection,
        service_id: i64,
        home_set_id: Option<i64>,
        collection: &Collection,
    ) -> Result<i64, sqlx::Error> {
        const SQL: &str = "
INSERT INTO collections (
    service_id, home_set_id, url, type, display_name, description, owner, color,
    timezone, supports_vevent, supports_vtodo, supports_vjournal, source,
    priv_write_content, priv_unbind, sync, force_read_only
)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);
";

        let result = sqlx::query(SQL)
            .bind(service_id)
            .bind(home_set_id)
            .bind(collection.url.as_str())
            .bind(collection.collection_type.as_str())
            .bind(collection.display_name.as_deref())
            .bind(collection.description.as_deref())
            .bind(collection.owner.as_ref().map(Url::as_str))
            .bind(collection.color.map(i64::from))
            .bind(collection.timezone.as_deref())
            .bind(collection.supports_vevent)
            .bind(collection.supports_vtodo)
            .bind(collection.supports_vjournal)
            .bind(collection.source.as_ref().map(Url::as_str))
            .bind(collection.priv_write_content)
            .bind(collection.priv_unbind)
            .bind(collection.sync)
            .bind(collection.force_read_only)
            .execute(conn)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Rewrites the server-reported columns. User flags are left untouched.
    pub(crate) async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        home_set_id: Option<i64>,
        collection: &Collection,
    ) -> Result<(), sqlx::Error> {
        const SQL: &str = "
UPDATE collections
SET home_set_id = ?, type = ?, display_name = ?, description = ?, owner = ?, color = ?,
    timezone = ?, supports_vevent = ?, supports_vtodo = ?, supports_vjournal = ?,
    source = ?, priv_write_content = ?, priv_unbind = ?
WHERE id = ?;
";

        sqlx::query(SQL)
            .bind(home_set_id)
            .bind(collection.collection_type.as_str())
            .bind(collection.display_name.as_deref())
            .bind(collection.description.as_deref())
            .bind(collection.owner.as_ref().map(Url::as_str))
            .bind(collection.color.map(i64::from))
            .bind(collection.timezone.as_deref())
            .bind(collection.supports_vevent)
            .bind(collection.supports_vtodo)
            .bind(collection.supports_vjournal)
            .bind(collection.source.as_ref().map(Url::as_str))
            .bind(collection.priv_write_content)
            .bind(collection.priv_unbind)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
        const SQL: &str = "DELETE FROM collections WHERE id = ?;";

        sqlx::query(SQL).bind(id).execute(conn).await?;
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CollectionRecord {
    id: i64,
    service_id: i64,
    home_set_url: Option<String>,
    url: String,
    #[sqlx(rename = "type")]
    collection_type: String,
    display_name: Option<String>,
    description: Option<String>,
    owner: Option<String>,
    color: Option<i64>,
    timezone: Option<String>,
    supports_vevent: Option<bool>,
    supports_vtodo: Option<bool>,
    supports_vjournal: Option<bool>,
    source: Option<String>,
    priv_write_content: bool,
    priv_unbind: bool,
    sync: bool,
    force_read_only: bool,
}

impl TryFrom<CollectionRecord> for Collection {
    type Error = sqlx::Error;

    fn try_from(record: CollectionRecord) -> Result<Self, Self::Error> {
        let parse_url = |value: Option<String>| {
            value
                .as_deref()
                .map(Url::parse)
                .transpose()
                .map_err(decode_error)
        };

        Ok(Self {
            id: Some(record.id),
            service_id: record.service_id,
            home_set: parse_url(record.home_set_url)?,
            url: Url::parse(&record.url).map_err(decode_error)?,
            collection_type: record.collection_type.parse().map_err(decode_error)?,
            display_name: record.display_name,
            description: record.description,
            owner: parse_url(record.owner)?,
            color: record
                .color
                .map(u32::try_from)
                .transpose()
                .map_err(decode_error)?,
            timezone: record.timezone,
            supports_vevent: record.supports_vevent,
            supports_vtodo: record.supports_vtodo,
            supports_vjournal: record.supports_vjournal,
            source: parse_url(record.source)?,
            priv_write_content: record.priv_write_content,
            priv_unbind: record.priv_unbind,
            sync: record.sync,
            force_read_only: record.force_read_only,
            confirmed: false,
        })
    }
}
