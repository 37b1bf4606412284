// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::ops::Deref;

use reqwest::Url;

use crate::response::Properties;

/// Resource href as it appears in a multistatus response.
///
/// An `Href` may be relative (e.g. `/dav/calendars/user/`) and must be
/// resolved against the queried URL before use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Href(String);

impl Href {
    /// Creates a new `Href` from a string.
    #[must_use]
    pub const fn new(href: String) -> Self {
        Self(href)
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Href {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Href {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Href {
    fn from(href: String) -> Self {
        Self(href)
    }
}

impl From<&str> for Href {
    fn from(href: &str) -> Self {
        Self(href.to_string())
    }
}

/// Decoded `resourcetype` property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(clippy::struct_excessive_bools)]
pub struct ResourceType {
    /// `DAV:collection`
    pub collection: bool,
    /// `CALDAV:calendar`
    pub calendar: bool,
    /// `CARDDAV:addressbook`
    pub addressbook: bool,
    /// `CS:subscribed`, a read-only calendar subscription.
    pub subscribed: bool,
}

impl ResourceType {
    pub(crate) fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut rt = Self::default();
        for name in names {
            match name.as_ref() {
                "collection" => rt.collection = true,
                "calendar" => rt.calendar = true,
                "addressbook" => rt.addressbook = true,
                "subscribed" => rt.subscribed = true,
                _ => {}
            }
        }
        rt
    }
}

/// Privileges of the current user, decoded from `current-user-privilege-set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Privileges {
    /// Members may be created (`bind`).
    pub bind: bool,
    /// Members may be removed (`unbind`).
    pub unbind: bool,
    /// Content may be modified (`write-content`).
    pub write_content: bool,
}

impl Privileges {
    pub(crate) fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut privileges = Self {
            bind: false,
            unbind: false,
            write_content: false,
        };
        for name in names {
            match name.as_ref() {
                "all" | "write" => {
                    privileges.bind = true;
                    privileges.unbind = true;
                    privileges.write_content = true;
                }
                "bind" => privileges.bind = true,
                "unbind" => privileges.unbind = true,
                "write-content" => privileges.write_content = true,
                _ => {}
            }
        }
        privileges
    }
}

/// Relation of a multistatus response entry to the resource that answered
/// the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// The entry describes the queried resource itself.
    SelfResource,
    /// The entry describes a member of the queried collection.
    Member,
}

/// One resource of a PROPFIND answer, with its href resolved to an absolute URL.
#[derive(Debug, Clone, PartialEq)]
pub struct DavResponse {
    /// Absolute URL of the resource.
    pub url: Url,
    /// Whether this is the queried resource or one of its members.
    pub relation: Relation,
    /// Response-level status code, if the server sent one.
    pub status: Option<u16>,
    /// Properties from all successful `propstat` elements.
    pub properties: Properties,
}

impl DavResponse {
    /// Whether the resource itself was found.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_none_or(|s| (200..300).contains(&s))
    }
}
