// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use davsync_dav::{DavResponse, Depth, PropertyQuery, Relation, Url};

use crate::error::{Classified, IgnorePolicy, classify};
use crate::refresh::Discovery;
use crate::{Collection, Preselect, RefreshError, Service};

/// Lists the members of every known home-set.
pub(crate) struct CollectionEnumerator<'a, Q: ?Sized> {
    client: &'a Q,
    service: &'a Service,
    preselect: Preselect,
}

impl<'a, Q: PropertyQuery + ?Sized> CollectionEnumerator<'a, Q> {
    pub(crate) fn new(client: &'a Q, service: &'a Service, preselect: Preselect) -> Self {
        Self {
            client,
            service,
            preselect,
        }
    }

    /// Lists each home-set in URL order. Home-sets that are gone are dropped
    /// from `discovery`; every usable member is recorded as confirmed.
    pub(crate) async fn enumerate(
        &self,
        mut discovery: Discovery,
    ) -> Result<Discovery, RefreshError> {
        let props = self.service.kind.collection_props();
        let urls: Vec<Url> = discovery.home_sets.keys().cloned().collect();

        for url in urls {
            let responses = match self.client.propfind(&url, Depth::One, props).await {
                Ok(responses) => responses,
                Err(e) => match classify(e, IgnorePolicy::Gone) {
                    Classified::Ignorable(reason) => {
                        tracing::info!(%url, %reason, "home-set is gone");
                        discovery.home_sets.remove(&url);
                        continue;
                    }
                    Classified::Fatal(e) => return Err(e),
                },
            };

            let mut found = 0;
            for response in responses.iter().filter(|r| r.is_success()) {
                match response.relation {
                    Relation::SelfResource => self.describe_home_set(&mut discovery, &url, response),
                    Relation::Member => {
                        if self.add_member(&mut discovery, &url, response) {
                            found += 1;
                        }
                    }
                }
            }
            tracing::debug!(%url, collections = found, "home-set listed");
        }

        tracing::info!(
            home_sets = discovery.home_sets.len(),
            collections = discovery.collections.values().filter(|c| c.confirmed).count(),
            "collections enumerated"
        );
        Ok(discovery)
    }

    fn describe_home_set(&self, discovery: &mut Discovery, url: &Url, response: &DavResponse) {
        if let Some(home_set) = discovery.home_sets.get_mut(url) {
            let props = &response.properties;
            home_set.display_name = props
                .display_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(ToString::to_string);
            home_set.priv_bind = props.privileges.is_none_or(|p| p.bind);
        }
    }

    /// Records `response` as a collection of the home-set at `url`, if it is
    /// one this service can sync.
    fn add_member(&self, discovery: &mut Discovery, url: &Url, response: &DavResponse) -> bool {
        let Some(mut collection) = Collection::from_response(self.service.id, response) else {
            tracing::trace!(url = %response.url, "not a collection");
            return false;
        };
        if !collection.collection_type.is_compatible(self.service.kind) {
            tracing::debug!(
                url = %collection.url,
                collection_type = %collection.collection_type,
                "ignoring collection of another service kind"
            );
            return false;
        }

        let personal = discovery.home_sets.get(url).is_some_and(|h| h.personal);
        collection.home_set = Some(url.clone());
        collection.sync = self.preselect.selects(personal);
        collection.confirmed = true;
        discovery
            .collections
            .insert(collection.url.clone(), collection);
        true
    }
}
