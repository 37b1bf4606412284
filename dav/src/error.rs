// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// `WebDAV` client errors.
#[non_exhaustive]
#[derive(Debug)]
pub enum DavError {
    /// Transport-level error (connection, TLS, timeout, body read).
    Http(String),

    /// The server answered with a non-success status.
    Status {
        /// The URL that answered, after redirects.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// XML parsing/writing error.
    Xml(String),

    /// A URL or href could not be parsed or resolved.
    InvalidUrl(String),
}

impl DavError {
    /// Returns the HTTP status code if this error was caused by a non-success response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for DavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Status { url, status } => write!(f, "HTTP {status} from {url}"),
            Self::Xml(e) => write!(f, "XML error: {e}"),
            Self::InvalidUrl(e) => write!(f, "Invalid URL: {e}"),
        }
    }
}

impl std::error::Error for DavError {}

impl From<reqwest::Error> for DavError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl From<quick_xml::Error> for DavError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

impl From<std::io::Error> for DavError {
    fn from(e: std::io::Error) -> Self {
        Self::Xml(format!("IO error: {e}"))
    }
}
