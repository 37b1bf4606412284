// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `WebDAV` client for discovery queries.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Url};

use crate::config::DavConfig;
use crate::error::DavError;
use crate::http::HttpClient;
use crate::request::{Depth, Prop, PropFindRequest};
use crate::response::MultiStatusResponse;
use crate::types::DavResponse;

/// Depth-bounded property queries against a `WebDAV` server.
///
/// Implementations return one [`DavResponse`] per resource described by the
/// server, and fail with [`DavError::Status`] when the server answers the
/// query itself with a non-success status. When the query is redirected,
/// the resource that finally answered is the
/// [`SelfResource`](crate::Relation::SelfResource).
#[async_trait]
pub trait PropertyQuery: Send + Sync {
    /// Issues a PROPFIND for `props` against `url`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures, non-success statuses and
    /// unparsable responses.
    async fn propfind(
        &self,
        url: &Url,
        depth: Depth,
        props: &[Prop],
    ) -> Result<Vec<DavResponse>, DavError>;
}

/// `WebDAV` client over HTTP.
///
/// # Example
///
/// ```ignore
/// use davsync_dav::{DavClient, DavConfig, Depth, Prop, PropertyQuery, Url};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DavClient::new(DavConfig::default())?;
/// let url = Url::parse("https://dav.example.com/principals/user/")?;
/// let responses = client
///     .propfind(&url, Depth::Zero, &[Prop::CalendarHomeSet])
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DavClient {
    http: Arc<HttpClient>,
}

impl DavClient {
    /// Creates a new `WebDAV` client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: DavConfig) -> Result<Self, DavError> {
        let http = HttpClient::new(config)?;
        Ok(Self {
            http: Arc::new(http),
        })
    }
}

#[async_trait]
impl PropertyQuery for DavClient {
    async fn propfind(
        &self,
        url: &Url,
        depth: Depth,
        props: &[Prop],
    ) -> Result<Vec<DavResponse>, DavError> {
        let mut propfind = PropFindRequest::new();
        for prop in props {
            propfind.add_property(*prop);
        }
        let xml_body = propfind.build()?;

        tracing::debug!(%url, %depth, "PROPFIND");
        let resp = self
            .http
            .execute(
                self.http
                    .build_request(
                        Method::from_bytes(b"PROPFIND")
                            .map_err(|e| DavError::Http(format!("Invalid method: {e}")))?,
                        url.as_str(),
                    )
                    .header("Content-Type", "application/xml; charset=utf-8")
                    .header("Depth", depth.as_str())
                    .body(xml_body),
            )
            .await?;

        // Redirects are followed, so hrefs resolve against the final URL.
        let base = resp.url().clone();
        if base != *url {
            tracing::debug!(%url, %base, "PROPFIND redirected");
        }

        let xml = resp.text().await?;
        let multistatus = MultiStatusResponse::from_xml(&xml)?;
        Ok(multistatus.into_dav_responses(&base))
    }
}
