// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use davsync_dav::{Depth, PropertyQuery, Relation, Url};

use crate::error::{Classified, IgnorePolicy, classify};
use crate::refresh::Discovery;
use crate::{Collection, RefreshError, Service};

/// Re-checks known collections that no home-set listed in this refresh.
pub(crate) struct OrphanVerifier<'a, Q: ?Sized> {
    client: &'a Q,
    service: &'a Service,
}

impl<'a, Q: PropertyQuery + ?Sized> OrphanVerifier<'a, Q> {
    pub(crate) fn new(client: &'a Q, service: &'a Service) -> Self {
        Self { client, service }
    }

    /// Queries every unconfirmed collection directly. Collections that are
    /// still usable are kept without a home-set; all others are removed.
    pub(crate) async fn verify(&self, mut discovery: Discovery) -> Result<Discovery, RefreshError> {
        let orphans: Vec<Url> = discovery
            .collections
            .iter()
            .filter(|(_, collection)| !collection.confirmed)
            .map(|(url, _)| url.clone())
            .collect();

        for url in orphans {
            let Some(mut known) = discovery.collections.remove(&url) else {
                continue;
            };
            known.home_set = None;

            match self.describe(&url).await? {
                Some(fresh) => {
                    tracing::debug!(%url, "collection outside of home-sets still exists");
                    let collection = Collection {
                        id: known.id,
                        url: url.clone(),
                        sync: known.sync,
                        force_read_only: known.force_read_only,
                        confirmed: true,
                        ..fresh
                    };
                    discovery.collections.insert(url, collection);
                }
                None => tracing::info!(%url, "removing collection"),
            }
        }

        Ok(discovery)
    }

    /// The current description of the collection at `url`, or `None` if it is
    /// gone or no longer usable by this service.
    async fn describe(&self, url: &Url) -> Result<Option<Collection>, RefreshError> {
        let props = self.service.kind.collection_props();
        let responses = match self.client.propfind(url, Depth::Zero, props).await {
            Ok(responses) => responses,
            Err(e) => match classify(e, IgnorePolicy::Gone) {
                Classified::Ignorable(reason) => {
                    tracing::debug!(%url, %reason, "collection is gone");
                    return Ok(None);
                }
                Classified::Fatal(e) => return Err(e),
            },
        };

        let collection = responses
            .iter()
            .filter(|r| r.relation == Relation::SelfResource && r.is_success())
            .find_map(|r| Collection::from_response(self.service.id, r))
            .filter(|c| c.collection_type.is_compatible(self.service.kind));
        Ok(collection)
    }
}
