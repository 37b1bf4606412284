// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Discovery of home-sets and collections for one service.
//!
//! A refresh runs four phases over a [`Discovery`] that is seeded from the
//! store and passed by value from phase to phase:
//!
//! 1. the resolver collects home-sets reachable from the principal,
//! 2. the enumerator lists the members of every home-set,
//! 3. the verifier re-queries stored collections that no home-set listed,
//! 4. the reconciler diffs the result against the store.
//!
//! Nothing is written until the last phase, so a failed refresh leaves the
//! store as it was.

mod enumerator;
mod reconciler;
mod resolver;
mod verifier;

use std::collections::BTreeMap;
use std::fmt;

use davsync_dav::{DavClient, PropertyQuery, Url};

use crate::localdb::{EntityDiff, LocalDb, StoreDiff};
use crate::refresh::enumerator::CollectionEnumerator;
use crate::refresh::reconciler::{Snapshot, reconcile};
use crate::refresh::resolver::HomeSetResolver;
use crate::refresh::verifier::OrphanVerifier;
use crate::{Collection, Config, HomeSet, Preselect, RefreshError, Service};

/// Home-sets and collections known during one refresh, keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub home_sets: BTreeMap<Url, HomeSet>,
    pub collections: BTreeMap<Url, Collection>,
}

/// Number of stored entities a refresh changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeCounts {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl<T> From<&EntityDiff<T>> for ChangeCounts {
    fn from(diff: &EntityDiff<T>) -> Self {
        Self {
            inserted: diff.insert.len(),
            updated: diff.update.len(),
            deleted: diff.delete.len(),
        }
    }
}

impl fmt::Display for ChangeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} new, {} updated, {} removed",
            self.inserted, self.updated, self.deleted
        )
    }
}

/// What a successful refresh changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSummary {
    pub service_id: i64,
    pub home_sets: ChangeCounts,
    pub collections: ChangeCounts,
}

/// Why a refresh failed, and for which account.
#[derive(Debug)]
pub struct RefreshFailure {
    pub service_id: i64,

    /// `None` when the service could not be loaded.
    pub account_name: Option<String>,

    pub error: RefreshError,
}

impl fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.account_name {
            Some(account) => write!(
                f,
                "Refreshing service {} ({account}) failed: {}",
                self.service_id, self.error
            ),
            None => write!(
                f,
                "Refreshing service {} failed: {}",
                self.service_id, self.error
            ),
        }
    }
}

/// Result of one refresh.
#[derive(Debug)]
pub enum RefreshOutcome {
    Success(RefreshSummary),
    Failure(RefreshFailure),
}

impl RefreshOutcome {
    fn failure(service_id: i64, account_name: Option<String>, error: RefreshError) -> Self {
        Self::Failure(RefreshFailure {
            service_id,
            account_name,
            error,
        })
    }

    /// Whether the refresh committed.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Refreshes the home-sets and collections of services stored in a [`LocalDb`].
#[derive(Debug)]
pub struct CollectionsRefresher<'a, Q: ?Sized> {
    db: &'a LocalDb,
    client: &'a Q,
    preselect: Preselect,
}

impl<'a, Q: PropertyQuery + ?Sized> CollectionsRefresher<'a, Q> {
    pub fn new(db: &'a LocalDb, client: &'a Q, preselect: Preselect) -> Self {
        Self {
            db,
            client,
            preselect,
        }
    }

    /// Runs a full refresh of one service.
    ///
    /// Queries are issued one at a time. The store is only written after
    /// every query succeeded, in a single transaction.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self, service_id: i64) -> RefreshOutcome {
        let service = match self.db.services.get(service_id).await {
            Ok(Some(service)) => service,
            Ok(None) => {
                let error = RefreshError::ServiceNotFound(service_id);
                tracing::error!(%error, "cannot refresh");
                return RefreshOutcome::failure(service_id, None, error);
            }
            Err(e) => return RefreshOutcome::failure(service_id, None, e.into()),
        };

        match self.run(&service).await {
            Ok(summary) => {
                tracing::info!(
                    account = %service.account_name,
                    home_sets = %summary.home_sets,
                    collections = %summary.collections,
                    "refresh finished"
                );
                RefreshOutcome::Success(summary)
            }
            Err(error) => {
                tracing::warn!(account = %service.account_name, %error, "refresh failed");
                RefreshOutcome::failure(service.id, Some(service.account_name), error)
            }
        }
    }

    async fn run(&self, service: &Service) -> Result<RefreshSummary, RefreshError> {
        let snapshot = Snapshot::load(self.db, service.id).await?;
        let mut discovery = snapshot.seed();

        match &service.principal {
            Some(principal) => {
                discovery = HomeSetResolver::new(self.client, service)
                    .resolve(principal, discovery)
                    .await?;
            }
            None => tracing::info!("no principal configured, only known home-sets are listed"),
        }

        let discovery = CollectionEnumerator::new(self.client, service, self.preselect)
            .enumerate(discovery)
            .await?;
        let discovery = OrphanVerifier::new(self.client, service)
            .verify(discovery)
            .await?;

        let diff = reconcile(&snapshot, discovery);
        if !diff.is_empty() {
            self.db.apply(service.id, &diff).await?;
        }

        Ok(RefreshSummary {
            service_id: service.id,
            home_sets: (&diff.home_sets).into(),
            collections: (&diff.collections).into(),
        })
    }
}

/// Refreshes one service over HTTP using the transport settings in `config`.
///
/// The HTTP client lives for exactly one refresh.
pub async fn refresh_service(db: &LocalDb, config: &Config, service_id: i64) -> RefreshOutcome {
    let client = match DavClient::new(config.dav.clone()) {
        Ok(client) => client,
        Err(e) => return RefreshOutcome::failure(service_id, None, e.into()),
    };

    CollectionsRefresher::new(db, &client, config.preselect)
        .refresh(service_id)
        .await
}
