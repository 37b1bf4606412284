// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! A scripted `WebDAV` server answering PROPFIND queries in process.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use davsync_dav::{
    DavError, DavResponse, Depth, Prop, Properties, PropertyQuery, Relation, with_trailing_slash,
};
use davsync_core::Url;

const BASE: &str = "https://dav.example.com";

#[derive(Debug, Clone)]
enum Reply {
    Status(u16),
    Multistatus(Vec<DavResponse>),
}

/// Answers queries from a table of scripted replies keyed by URL.
///
/// URLs without a reply answer 404. Every query is recorded.
#[derive(Debug, Default)]
pub struct FakeServer {
    replies: Mutex<HashMap<Url, Reply>>,
    calls: Mutex<Vec<(String, Depth, Vec<Prop>)>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute URL of `path` on this server.
    pub fn url(path: &str) -> Url {
        Url::parse(BASE)
            .and_then(|base| base.join(path))
            .expect("valid test path")
    }

    /// Scripts a principal with the given properties.
    pub fn principal(&self, path: &str, properties: Properties) {
        let response = DavResponse {
            url: Self::url(path),
            relation: Relation::SelfResource,
            status: None,
            properties,
        };
        self.reply(path, Reply::Multistatus(vec![response]));
    }

    /// Scripts a home-set listing `members`, each described by
    /// `(path, properties)`.
    pub fn home_set(&self, path: &str, members: Vec<(&str, Properties)>) {
        let mut responses = vec![DavResponse {
            url: Self::url(path),
            relation: Relation::SelfResource,
            status: None,
            properties: Properties {
                display_name: Some(format!("Home {path}")),
                ..Default::default()
            },
        }];
        responses.extend(members.into_iter().map(|(member, properties)| DavResponse {
            url: Self::url(member),
            relation: Relation::Member,
            status: None,
            properties,
        }));
        self.reply(path, Reply::Multistatus(responses));
    }

    /// Scripts a collection answering a direct query.
    pub fn collection(&self, path: &str, properties: Properties) {
        self.principal(path, properties);
    }

    /// Scripts an error status for `path`.
    pub fn fail(&self, path: &str, status: u16) {
        self.reply(path, Reply::Status(status));
    }

    /// Paths queried so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _, _)| path.clone())
            .collect()
    }

    /// Number of times `path` was queried.
    pub fn call_count(&self, path: &str) -> usize {
        let path = with_trailing_slash(Self::url(path)).path().to_string();
        self.calls().iter().filter(|p| **p == path).count()
    }

    /// Properties requested by the first query of `path`.
    pub fn requested_props(&self, path: &str) -> Vec<Prop> {
        let path = with_trailing_slash(Self::url(path)).path().to_string();
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _, _)| *p == path)
            .map(|(_, _, props)| props.clone())
            .unwrap_or_default()
    }

    /// Depth of the first query of `path`.
    pub fn depth_of(&self, path: &str) -> Option<Depth> {
        let path = with_trailing_slash(Self::url(path)).path().to_string();
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _, _)| *p == path)
            .map(|(_, depth, _)| *depth)
    }

    fn reply(&self, path: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .insert(with_trailing_slash(Self::url(path)), reply);
    }
}

#[async_trait]
impl PropertyQuery for FakeServer {
    async fn propfind(
        &self,
        url: &Url,
        depth: Depth,
        props: &[Prop],
    ) -> Result<Vec<DavResponse>, DavError> {
        let key = with_trailing_slash(url.clone());
        self.calls
            .lock()
            .unwrap()
            .push((key.path().to_string(), depth, props.to_vec()));

        let reply = self.replies.lock().unwrap().get(&key).cloned();
        match reply {
            Some(Reply::Multistatus(responses)) => Ok(responses),
            Some(Reply::Status(status)) => Err(DavError::Status {
                url: url.to_string(),
                status,
            }),
            None => Err(DavError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
