// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, HashSet};

use davsync_dav::{Depth, Prop, PropertyQuery, Url, resolve, with_trailing_slash};

use crate::error::{Classified, IgnorePolicy, classify};
use crate::refresh::Discovery;
use crate::{HomeSet, RefreshError, Service};

/// How far a principal is from the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// The account's own principal. Delegation and group relations are followed.
    Personal,

    /// A principal reached through a relation. Only its home-sets are read.
    Related,
}

/// Collects the home-sets reachable from a principal.
pub(crate) struct HomeSetResolver<'a, Q: ?Sized> {
    client: &'a Q,
    service: &'a Service,
}

impl<'a, Q: PropertyQuery + ?Sized> HomeSetResolver<'a, Q> {
    pub(crate) fn new(client: &'a Q, service: &'a Service) -> Self {
        Self { client, service }
    }

    /// Adds the home-sets of `principal` and of the principals it delegates
    /// to or is a member of to `discovery`.
    ///
    /// Related principals are never expanded further, and every URL is
    /// queried at most once.
    pub(crate) async fn resolve(
        &self,
        principal: &Url,
        mut discovery: Discovery,
    ) -> Result<Discovery, RefreshError> {
        let mut visited = HashSet::from([with_trailing_slash(principal.clone())]);

        let related = self
            .query(principal, Phase::Personal, &mut discovery.home_sets)
            .await?;

        for url in related {
            if !visited.insert(with_trailing_slash(url.clone())) {
                tracing::debug!(%url, "principal already queried");
                continue;
            }
            self.query(&url, Phase::Related, &mut discovery.home_sets)
                .await?;
        }

        tracing::info!(home_sets = discovery.home_sets.len(), "home-sets resolved");
        Ok(discovery)
    }

    /// Queries one principal, records its home-sets and returns the related
    /// principals to visit next.
    async fn query(
        &self,
        url: &Url,
        phase: Phase,
        home_sets: &mut BTreeMap<Url, HomeSet>,
    ) -> Result<Vec<Url>, RefreshError> {
        let kind = self.service.kind;
        let mut props = vec![kind.home_set_prop()];
        if phase == Phase::Personal {
            props.extend([
                Prop::CalendarProxyReadFor,
                Prop::CalendarProxyWriteFor,
                Prop::GroupMembership,
            ]);
        }

        let responses = match self.client.propfind(url, Depth::Zero, &props).await {
            Ok(responses) => responses,
            Err(e) => match classify(e, IgnorePolicy::AnyClientError) {
                Classified::Ignorable(reason) => {
                    tracing::warn!(%url, %reason, "skipping principal");
                    return Ok(Vec::new());
                }
                Classified::Fatal(e) => return Err(e),
            },
        };

        let personal = phase == Phase::Personal;
        let mut related = Vec::new();
        for response in responses.iter().filter(|r| r.is_success()) {
            for href in kind.home_set_hrefs(&response.properties) {
                let Some(home_set_url) = resolve_href(url, href) else {
                    continue;
                };
                merge(
                    home_sets,
                    HomeSet::new(self.service.id, personal, home_set_url),
                );
            }

            if personal {
                let props = &response.properties;
                let targets = props
                    .calendar_proxy_read_for
                    .iter()
                    .chain(&props.calendar_proxy_write_for)
                    .chain(&props.group_membership);
                for target in targets.filter_map(|href| resolve_href(url, href)) {
                    if !related.contains(&target) {
                        related.push(target);
                    }
                }
            }
        }

        tracing::debug!(%url, ?phase, related = related.len(), "principal queried");
        Ok(related)
    }
}

/// Records a home-set unless its URL is already known.
///
/// An entry found again from the account's own principal becomes personal, so
/// the result does not depend on which principal answered first.
fn merge(home_sets: &mut BTreeMap<Url, HomeSet>, home_set: HomeSet) {
    match home_sets.get_mut(&home_set.url) {
        Some(existing) => existing.personal |= home_set.personal,
        None => {
            tracing::debug!(url = %home_set.url, personal = home_set.personal, "found home-set");
            home_sets.insert(home_set.url.clone(), home_set);
        }
    }
}

fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    match resolve(base, href) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(%base, href, err = %e, "ignoring unresolvable href");
            None
        }
    }
}
