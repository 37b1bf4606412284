// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use davsync_dav::Url;
use sqlx::{SqliteConnection, SqlitePool};

use crate::HomeSet;
use crate::localdb::services::decode_error;

#[derive(Debug, Clone)]
pub struct HomeSets {
    pool: SqlitePool,
}

impl HomeSets {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_by_service(&self, service_id: i64) -> Result<Vec<HomeSet>, sqlx::Error> {
        const SQL: &str = "
SELECT id, service_id, personal, url, display_name, priv_bind
FROM home_sets
WHERE service_id = ?
ORDER BY url;
";

        let records: Vec<HomeSetRecord> = sqlx::query_as(SQL)
            .bind(service_id)
            .fetch_all(&self.pool)
            .await?;

        records.into_iter().map(HomeSet::try_from).collect()
    }

    pub(crate) async fn insert(
        conn: &mut SqliteConnection,
        service_id: i64,
        home_set: &HomeSet,
    ) -> Result<i64, sqlx::Error> {
        const SQL: &str = "
INSERT INTO home_sets (service_id, personal, url, display_name, priv_bind)
VALUES (?, ?, ?, ?, ?);
";

        let result = sqlx::query(SQL)
            .bind(service_id)
            .bind(home_set.personal)
            .bind(home_set.url.as_str())
            .bind(home_set.display_name.as_deref())
            .bind(home_set.priv_bind)
            .execute(conn)
            .await?;

        Ok(result.last_insert_rowid())
    }

    pub(crate) async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        home_set: &HomeSet,
    ) -> Result<(), sqlx::Error> {
        const SQL: &str = "
UPDATE home_sets
SET personal = ?, display_name = ?, priv_bind = ?
WHERE id = ?;
";

        sqlx::query(SQL)
            .bind(home_set.personal)
            .bind(home_set.display_name.as_deref())
            .bind(home_set.priv_bind)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
        const SQL: &str = "DELETE FROM home_sets WHERE id = ?;";

        sqlx::query(SQL).bind(id).execute(conn).await?;
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HomeSetRecord {
    id: i64,
    service_id: i64,
    personal: bool,
    url: String,
    display_name: Option<String>,
    priv_bind: bool,
}

impl TryFrom<HomeSetRecord> for HomeSet {
    type Error = sqlx::Error;

    fn try_from(record: HomeSetRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Some(record.id),
            service_id: record.service_id,
            personal: record.personal,
            url: Url::parse(&record.url).map_err(decode_error)?,
            display_name: record.display_name,
            priv_bind: record.priv_bind,
        })
    }
}
