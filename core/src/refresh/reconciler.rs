// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use bimap::BiMap;
use davsync_dav::Url;

use crate::localdb::{LocalDb, StoreDiff};
use crate::refresh::Discovery;
use crate::{Collection, HomeSet};

/// The stored home-sets and collections of one service at the start of a
/// refresh.
#[derive(Debug, Clone, Default)]
pub(crate) struct Snapshot {
    home_sets: Vec<HomeSet>,
    collections: Vec<Collection>,
}

impl Snapshot {
    pub(crate) async fn load(db: &LocalDb, service_id: i64) -> Result<Self, sqlx::Error> {
        let home_sets = db.home_sets.list_by_service(service_id).await?;
        let collections = db.collections.list_by_service(service_id).await?;
        tracing::debug!(
            home_sets = home_sets.len(),
            collections = collections.len(),
            "loaded stored state"
        );
        Ok(Self {
            home_sets,
            collections,
        })
    }

    /// The starting point of a refresh: everything stored, nothing confirmed.
    pub(crate) fn seed(&self) -> Discovery {
        Discovery {
            home_sets: self
                .home_sets
                .iter()
                .map(|h| (h.url.clone(), h.clone()))
                .collect(),
            collections: self
                .collections
                .iter()
                .map(|c| {
                    let collection = Collection {
                        confirmed: false,
                        ..c.clone()
                    };
                    (c.url.clone(), collection)
                })
                .collect(),
        }
    }
}

/// Stored identifiers by URL.
fn index<'a, T: 'a>(
    entities: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&T) -> Option<(Url, i64)>,
) -> BiMap<Url, i64> {
    entities.into_iter().filter_map(key).collect()
}

/// Computes the store changes that turn `snapshot` into `discovery`.
///
/// Entities are matched by URL. Matched entities keep their identifier and
/// are only rewritten if the server reported something new; matched
/// collections keep the user's sync and read-only choices.
pub(crate) fn reconcile(snapshot: &Snapshot, discovery: Discovery) -> StoreDiff {
    let mut diff = StoreDiff {
        home_set_index: index(&snapshot.home_sets, |h| Some((h.url.clone(), h.id?))),
        ..StoreDiff::default()
    };

    // home-sets
    let stored: HashMap<i64, &HomeSet> = snapshot
        .home_sets
        .iter()
        .filter_map(|h| Some((h.id?, h)))
        .collect();

    diff.home_sets.delete = diff
        .home_set_index
        .iter()
        .filter(|(url, _)| !discovery.home_sets.contains_key(*url))
        .map(|(_, id)| *id)
        .collect();
    diff.home_sets.delete.sort_unstable();

    for (url, mut home_set) in discovery.home_sets {
        match diff.home_set_index.get_by_left(&url) {
            Some(&id) => {
                home_set.id = Some(id);
                if !stored.get(&id).is_some_and(|old| **old == home_set) {
                    diff.home_sets.update.push((id, home_set));
                }
            }
            None => {
                home_set.id = None;
                diff.home_sets.insert.push(home_set);
            }
        }
    }

    // collections
    let collection_index = index(&snapshot.collections, |c| Some((c.url.clone(), c.id?)));
    let stored: HashMap<i64, &Collection> = snapshot
        .collections
        .iter()
        .filter_map(|c| Some((c.id?, c)))
        .collect();

    diff.collections.delete = collection_index
        .iter()
        .filter(|(url, _)| !discovery.collections.contains_key(*url))
        .map(|(_, id)| *id)
        .collect();
    diff.collections.delete.sort_unstable();

    for (url, mut collection) in discovery.collections {
        match collection_index.get_by_left(&url) {
            Some(&id) => {
                collection.id = Some(id);
                match stored.get(&id) {
                    Some(old) => {
                        collection.sync = old.sync;
                        collection.force_read_only = old.force_read_only;
                        if !collection.same_remote_state(old) {
                            diff.collections.update.push((id, collection));
                        }
                    }
                    None => diff.collections.update.push((id, collection)),
                }
            }
            None => {
                collection.id = None;
                diff.collections.insert.push(collection);
            }
        }
    }

    diff
}
