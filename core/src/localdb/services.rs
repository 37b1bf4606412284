// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use davsync_dav::Url;
use sqlx::SqlitePool;

use crate::{Service, ServiceKind};

#[derive(Debug, Clone)]
pub struct Services {
    pool: SqlitePool,
}

impl Services {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a service and returns its identifier.
    pub async fn insert(
        &self,
        account_name: &str,
        kind: ServiceKind,
        principal: Option<&Url>,
    ) -> Result<i64, sqlx::Error> {
        const SQL: &str = "
INSERT INTO services (account_name, kind, principal)
VALUES (?, ?, ?);
";

        let result = sqlx::query(SQL)
            .bind(account_name)
            .bind(kind.as_str())
            .bind(principal.map(Url::as_str))
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get(&self, id: i64) -> Result<Option<Service>, sqlx::Error> {
        const SQL: &str = "
SELECT id, account_name, kind, principal
FROM services
WHERE id = ?;
";

        let record: Option<ServiceRecord> = sqlx::query_as(SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        record.map(Service::try_from).transpose()
    }

    pub async fn list(&self) -> Result<Vec<Service>, sqlx::Error> {
        const SQL: &str = "
SELECT id, account_name, kind, principal
FROM services
ORDER BY id;
";

        let records: Vec<ServiceRecord> = sqlx::query_as(SQL).fetch_all(&self.pool).await?;
        records.into_iter().map(Service::try_from).collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ServiceRecord {
    id: i64,
    account_name: String,
    kind: String,
    principal: Option<String>,
}

impl TryFrom<ServiceRecord> for Service {
    type Error = sqlx::Error;

    fn try_from(record: ServiceRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            account_name: record.account_name,
            kind: record.kind.parse().map_err(decode_error)?,
            principal: record
                .principal
                .as_deref()
                .map(Url::parse)
                .transpose()
                .map_err(decode_error)?,
        })
    }
}

/// Wraps a column conversion failure.
pub(crate) fn decode_error(err: impl ToString) -> sqlx::Error {
    sqlx::Error::Decode(err.to_string().into())
}
