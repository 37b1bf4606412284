// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use davsync_dav::{DavResponse, Url, resolve, with_trailing_slash};

use crate::ServiceKind;

/// A container that may hold member collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeSet {
    /// Store identifier, `None` until first persisted.
    pub id: Option<i64>,

    /// Owning service.
    pub service_id: i64,

    /// Discovered from the account's own principal rather than through a
    /// delegation or group relation.
    pub personal: bool,

    /// Canonical URL, always with a trailing slash.
    pub url: Url,

    /// Display name reported by the server.
    pub display_name: Option<String>,

    /// Whether new collections may be created here.
    pub priv_bind: bool,
}

impl HomeSet {
    /// Creates a freshly discovered home-set.
    #[must_use]
    pub fn new(service_id: i64, personal: bool, url: Url) -> Self {
        Self {
            id: None,
            service_id,
            personal,
            url: with_trailing_slash(url),
            display_name: None,
            priv_bind: true,
        }
    }
}

/// The kind of a discovered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionType {
    /// A `CardDAV` address book.
    AddressBook,
    /// A `CalDAV` calendar.
    Calendar,
    /// A read-only calendar subscription.
    Webcal,
}

impl CollectionType {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddressBook => "addressbook",
            Self::Calendar => "calendar",
            Self::Webcal => "webcal",
        }
    }

    /// Whether a service of `kind` may own collections of this type.
    #[must_use]
    pub const fn is_compatible(self, kind: ServiceKind) -> bool {
        matches!(
            (self, kind),
            (Self::AddressBook, ServiceKind::CardDav)
                | (Self::Calendar | Self::Webcal, ServiceKind::CalDav)
        )
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addressbook" => Ok(Self::AddressBook),
            "calendar" => Ok(Self::Calendar),
            "webcal" => Ok(Self::Webcal),
            _ => Err(format!("Invalid collection type: {s}")),
        }
    }
}

/// A synchronizable resource, either a calendar or an address book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Store identifier, `None` until first persisted.
    pub id: Option<i64>,

    /// Owning service.
    pub service_id: i64,

    /// URL of the owning home-set, if the collection was found under one.
    pub home_set: Option<Url>,

    /// Canonical URL, always with a trailing slash.
    pub url: Url,

    /// Collection type.
    pub collection_type: CollectionType,

    /// Display name reported by the server.
    pub display_name: Option<String>,

    /// Calendar or address book description.
    pub description: Option<String>,

    /// Owner principal.
    pub owner: Option<Url>,

    /// Color as ARGB.
    pub color: Option<u32>,

    /// Calendar time zone, as iCalendar text.
    pub timezone: Option<String>,

    /// Whether events may be stored. `None` for address books.
    pub supports_vevent: Option<bool>,

    /// Whether tasks may be stored. `None` for address books.
    pub supports_vtodo: Option<bool>,

    /// Whether journals may be stored. `None` for address books.
    pub supports_vjournal: Option<bool>,

    /// Upstream URL of a calendar subscription.
    pub source: Option<Url>,

    /// Whether the current user may modify content.
    pub priv_write_content: bool,

    /// Whether the current user may delete members.
    pub priv_unbind: bool,

    /// Selected for synchronization by the user.
    pub sync: bool,

    /// Treated as read-only regardless of server privileges.
    pub force_read_only: bool,

    /// Rediscovered during the current refresh. Never persisted.
    pub confirmed: bool,
}

impl Collection {
    /// Describes the resource in `response`, if it is a calendar, address book
    /// or calendar subscription.
    ///
    /// A subscription without a usable source URL is not a collection.
    #[must_use]
    pub fn from_response(service_id: i64, response: &DavResponse) -> Option<Self> {
        let props = &response.properties;
        let resource_type = props.resource_type?;

        let source = props
            .source
            .as_ref()
            .filter(|href| !href.trim().is_empty())
            .and_then(|href| resolve(&response.url, href).ok());

        let collection_type = if resource_type.addressbook {
            CollectionType::AddressBook
        } else if resource_type.calendar {
            CollectionType::Calendar
        } else if resource_type.subscribed && source.is_some() {
            CollectionType::Webcal
        } else {
            return None;
        };

        let (supports_vevent, supports_vtodo, supports_vjournal) = match collection_type {
            CollectionType::AddressBook => (None, None, None),
            CollectionType::Calendar | CollectionType::Webcal => {
                match &props.supported_calendar_components {
                    Some(components) => {
                        let has = |name: &str| {
                            Some(components.iter().any(|c| c.eq_ignore_ascii_case(name)))
                        };
                        (has("VEVENT"), has("VTODO"), has("VJOURNAL"))
                    }
                    None => (Some(true), Some(true), Some(true)),
                }
            }
        };

        let description = match collection_type {
            CollectionType::AddressBook => props.addressbook_description.clone(),
            CollectionType::Calendar | CollectionType::Webcal => {
                props.calendar_description.clone()
            }
        };

        let owner = props
            .owner
            .as_ref()
            .and_then(|href| resolve(&response.url, href).ok());

        Some(Self {
            id: None,
            service_id,
            home_set: None,
            url: with_trailing_slash(response.url.clone()),
            collection_type,
            display_name: non_empty(props.display_name.as_deref()),
            description: non_empty(description.as_deref()),
            owner,
            color: props.calendar_color.as_deref().and_then(parse_color),
            timezone: non_empty(props.calendar_timezone.as_deref()),
            supports_vevent,
            supports_vtodo,
            supports_vjournal,
            source: source.filter(|_| collection_type == CollectionType::Webcal),
            priv_write_content: props.privileges.is_none_or(|p| p.write_content),
            priv_unbind: props.privileges.is_none_or(|p| p.unbind),
            sync: false,
            force_read_only: false,
            confirmed: false,
        })
    }

    /// Whether the collection must not be written to.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.force_read_only
            || !self.priv_write_content
            || self.collection_type == CollectionType::Webcal
    }

    /// Whether the server-reported attributes equal those of `other`.
    ///
    /// User flags and the confirmation marker are ignored.
    pub(crate) fn same_remote_state(&self, other: &Self) -> bool {
        let normalized = Self {
            id: other.id,
            sync: other.sync,
            force_read_only: other.force_read_only,
            confirmed: other.confirmed,
            ..self.clone()
        };
        normalized == *other
    }
}

/// Parses an Apple `calendar-color` value, `#RRGGBB` or `#RRGGBBAA`, into ARGB.
#[must_use]
pub fn parse_color(value: &str) -> Option<u32> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let rgba = u32::from_str_radix(hex, 16).ok()?;
    match hex.len() {
        6 => Some(0xFF00_0000 | rgba),
        8 => Some((rgba >> 8) | ((rgba & 0xFF) << 24)),
        _ => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
