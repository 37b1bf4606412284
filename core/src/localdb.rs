// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

mod collections;
mod home_sets;
mod services;

use std::error::Error;
use std::path::Path;

use bimap::BiMap;
use davsync_dav::Url;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::localdb::collections::Collections;
use crate::localdb::home_sets::HomeSets;
use crate::localdb::services::Services;
use crate::{Collection, HomeSet};

#[derive(Debug, Clone)]
pub struct LocalDb {
    pool: SqlitePool,

    pub services: Services,
    pub home_sets: HomeSets,
    pub collections: Collections,
}

impl LocalDb {
    /// Opens a sqlite database connection.
    /// If `filename` is `None`, it opens an in-memory database.
    pub async fn open(filename: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let (options, pool_options) = if let Some(filename) = filename {
            tracing::info!(path = %filename.display(), "connecting to SQLite database");
            let options = SqliteConnectOptions::new()
                .filename(filename.to_str().ok_or("Invalid path encoding")?)
                .create_if_missing(true);
            (options, SqlitePoolOptions::new())
        } else {
            // every connection to :memory: is a separate database
            tracing::info!("connecting to in-memory SQLite database");
            let pool_options = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (SqliteConnectOptions::new().in_memory(true), pool_options)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| format!("Failed to connect to SQLite database: {e}"))?;

        sqlx::migrate!("src/localdb/migrations") // relative path from the crate root
            .run(&pool)
            .await
            .map_err(|e| format!("Failed to run migrations: {e}"))?;

        let services = Services::new(pool.clone());
        let home_sets = HomeSets::new(pool.clone());
        let collections = Collections::new(pool.clone());
        Ok(LocalDb {
            pool,
            services,
            home_sets,
            collections,
        })
    }

    /// Writes the result of a refresh for one service in a single transaction.
    ///
    /// Deletes run first, then home-sets are written so that collections can
    /// reference the identifiers of newly inserted home-sets.
    #[tracing::instrument(skip(self, diff))]
    pub async fn apply(&self, service_id: i64, diff: &StoreDiff) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        for id in &diff.collections.delete {
            Collections::delete(&mut *tx, *id).await?;
        }

        let mut index = diff.home_set_index.clone();
        for id in &diff.home_sets.delete {
            HomeSets::delete(&mut *tx, *id).await?;
            index.remove_by_right(id);
        }
        for (id, home_set) in &diff.home_sets.update {
            HomeSets::update(&mut *tx, *id, home_set).await?;
        }
        for home_set in &diff.home_sets.insert {
            let id = HomeSets::insert(&mut *tx, service_id, home_set).await?;
            index.insert(home_set.url.clone(), id);
        }

        let home_set_id = |collection: &Collection| {
            let url = collection.home_set.as_ref()?;
            let id = index.get_by_left(url).copied();
            if id.is_none() {
                tracing::warn!(
                    collection = %collection.url,
                    home_set = %url,
                    "home-set not stored, unlinking collection"
                );
            }
            id
        };
        for (id, collection) in &diff.collections.update {
            Collections::update(&mut *tx, *id, home_set_id(collection), collection).await?;
        }
        for collection in &diff.collections.insert {
            Collections::insert(&mut *tx, service_id, home_set_id(collection), collection).await?;
        }

        tx.commit().await?;
        tracing::debug!(
            home_sets = diff.home_sets.len(),
            collections = diff.collections.len(),
            "store changes committed"
        );
        Ok(())
    }

    pub async fn close(self) -> Result<(), Box<dyn Error>> {
        tracing::debug!("closing database connection");
        self.pool.close().await;
        Ok(())
    }
}

/// Changes to one kind of stored entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDiff<T> {
    /// New entities.
    pub insert: Vec<T>,

    /// Stored entities to rewrite, by identifier.
    pub update: Vec<(i64, T)>,

    /// Identifiers of stored entities to remove.
    pub delete: Vec<i64>,
}

impl<T> EntityDiff<T> {
    /// Total number of changes.
    pub fn len(&self) -> usize {
        self.insert.len() + self.update.len() + self.delete.len()
    }

    /// Whether nothing changes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for EntityDiff<T> {
    fn default() -> Self {
        Self {
            insert: Vec::new(),
            update: Vec::new(),
            delete: Vec::new(),
        }
    }
}

/// Everything a refresh writes back for one service.
#[derive(Debug, Clone, Default)]
pub struct StoreDiff {
    pub home_sets: EntityDiff<HomeSet>,
    pub collections: EntityDiff<Collection>,

    /// Stored home-sets by URL, used to link collections to home-sets.
    pub home_set_index: BiMap<Url, i64>,
}

impl StoreDiff {
    /// Whether applying this diff would leave the store unchanged.
    pub fn is_empty(&self) -> bool {
        self.home_sets.is_empty() && self.collections.is_empty()
    }
}
