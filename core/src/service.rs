// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use davsync_dav::{Href, Prop, Properties, Url};

/// The protocol a service speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// `CalDAV`, a collection of calendars.
    #[cfg_attr(feature = "clap", value(name = "caldav"))]
    CalDav,

    /// `CardDAV`, a collection of address books.
    #[cfg_attr(feature = "clap", value(name = "carddav"))]
    CardDav,
}

impl ServiceKind {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CalDav => "caldav",
            Self::CardDav => "carddav",
        }
    }

    /// The principal property listing home-sets of this kind.
    pub(crate) const fn home_set_prop(self) -> Prop {
        match self {
            Self::CalDav => Prop::CalendarHomeSet,
            Self::CardDav => Prop::AddressbookHomeSet,
        }
    }

    /// The home-set hrefs of this kind found in `props`.
    pub(crate) fn home_set_hrefs(self, props: &Properties) -> &[Href] {
        match self {
            Self::CalDav => &props.calendar_home_set,
            Self::CardDav => &props.addressbook_home_set,
        }
    }

    /// Properties needed to describe a collection of this kind.
    pub(crate) const fn collection_props(self) -> &'static [Prop] {
        match self {
            Self::CalDav => &[
                Prop::ResourceType,
                Prop::DisplayName,
                Prop::Owner,
                Prop::CurrentUserPrivilegeSet,
                Prop::CalendarDescription,
                Prop::CalendarColor,
                Prop::CalendarTimezone,
                Prop::SupportedCalendarComponentSet,
                Prop::Source,
            ],
            Self::CardDav => &[
                Prop::ResourceType,
                Prop::DisplayName,
                Prop::Owner,
                Prop::CurrentUserPrivilegeSet,
                Prop::AddressbookDescription,
            ],
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "caldav" => Ok(Self::CalDav),
            "carddav" => Ok(Self::CardDav),
            _ => Err(format!("Invalid service kind: {s}")),
        }
    }
}

/// One remote account integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// Store identifier.
    pub id: i64,

    /// Name of the account owning this service.
    pub account_name: String,

    /// Protocol kind.
    pub kind: ServiceKind,

    /// Entry point for home-set discovery.
    pub principal: Option<Url>,
}
