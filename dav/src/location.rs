// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! URL helpers for hrefs returned by `WebDAV` servers.

use reqwest::Url;

use crate::error::DavError;

/// Resolves an href against the URL it was returned for.
///
/// # Errors
///
/// Returns an error if the href is not a valid relative or absolute URL.
pub fn resolve(base: &Url, href: &str) -> Result<Url, DavError> {
    base.join(href)
        .map_err(|e| DavError::InvalidUrl(format!("{href} (relative to {base}): {e}")))
}

/// Returns the URL with a trailing slash appended to its path, if missing.
#[must_use]
pub fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Whether two URLs point to the same resource, ignoring a trailing slash.
#[must_use]
pub fn same_resource(a: &Url, b: &Url) -> bool {
    with_trailing_slash(a.clone()) == with_trailing_slash(b.clone())
}
