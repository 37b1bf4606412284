// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use davsync_dav::Url;
use tokio::fs;

use crate::localdb::LocalDb;
use crate::{Collection, Config, HomeSet, RefreshOutcome, Service, ServiceKind, refresh_service};

/// Services and their collections, backed by the local database.
#[derive(Debug, Clone)]
pub struct DavSync {
    config: Config,
    db: LocalDb,
}

impl DavSync {
    /// Opens the database described by `config`, creating it if needed.
    pub async fn new(mut config: Config) -> Result<Self, Box<dyn Error>> {
        config.normalize()?;
        prepare(&config).await?;

        let db = LocalDb::open(config.database_path().as_deref())
            .await
            .map_err(|e| format!("Failed to initialize db: {e}"))?;

        Ok(Self { config, db })
    }

    /// Registers a new service.
    pub async fn add_service(
        &self,
        account_name: &str,
        kind: ServiceKind,
        principal: Option<&Url>,
    ) -> Result<Service, Box<dyn Error>> {
        let id = self
            .db
            .services
            .insert(account_name, kind, principal)
            .await
            .map_err(|e| format!("Failed to add service: {e}"))?;

        tracing::info!(id, account_name, %kind, "service added");
        self.db
            .services
            .get(id)
            .await?
            .ok_or_else(|| format!("Service {id} disappeared").into())
    }

    /// All registered services.
    pub async fn services(&self) -> Result<Vec<Service>, Box<dyn Error>> {
        Ok(self.db.services.list().await?)
    }

    /// Rediscovers the home-sets and collections of a service.
    pub async fn refresh(&self, service_id: i64) -> RefreshOutcome {
        refresh_service(&self.db, &self.config, service_id).await
    }

    /// The stored home-sets of a service.
    pub async fn home_sets(&self, service_id: i64) -> Result<Vec<HomeSet>, Box<dyn Error>> {
        Ok(self.db.home_sets.list_by_service(service_id).await?)
    }

    /// The stored collections of a service.
    pub async fn collections(&self, service_id: i64) -> Result<Vec<Collection>, Box<dyn Error>> {
        Ok(self.db.collections.list_by_service(service_id).await?)
    }

    /// Selects or deselects a collection for sync.
    pub async fn set_sync(&self, collection_id: i64, sync: bool) -> Result<(), Box<dyn Error>> {
        match self.db.collections.set_sync(collection_id, sync).await? {
            true => Ok(()),
            false => Err(format!("Collection {collection_id} not found").into()),
        }
    }

    /// Forces a collection to be read-only, or lifts the restriction.
    pub async fn set_force_read_only(
        &self,
        collection_id: i64,
        force_read_only: bool,
    ) -> Result<(), Box<dyn Error>> {
        match self
            .db
            .collections
            .set_force_read_only(collection_id, force_read_only)
            .await?
        {
            true => Ok(()),
            false => Err(format!("Collection {collection_id} not found").into()),
        }
    }

    /// Closes the database.
    pub async fn close(self) -> Result<(), Box<dyn Error>> {
        self.db.close().await
    }
}

async fn prepare(config: &Config) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = &config.state_dir {
        tracing::debug!(path = %parent.display(), "ensuring state directory exists");
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}
