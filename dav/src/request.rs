// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Request builders for `WebDAV` PROPFIND queries.

use std::fmt;
use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::error::DavError;
use crate::xml::ns;

/// Value of the `Depth` header of a PROPFIND request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Depth {
    /// Only the requested resource itself.
    Zero,
    /// The requested resource and its direct members.
    One,
}

impl Depth {
    /// Returns the header value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// XML namespaces a requested property may live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Namespace {
    /// `DAV:`
    Dav,
    /// `urn:ietf:params:xml:ns:caldav`
    CalDav,
    /// `urn:ietf:params:xml:ns:carddav`
    CardDav,
    /// `http://calendarserver.org/ns/`
    CalendarServer,
    /// `http://apple.com/ns/ical/`
    AppleIcal,
}

impl Namespace {
    /// Prefix used for this namespace in request bodies.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Dav => "D",
            Self::CalDav => "C",
            Self::CardDav => "CARD",
            Self::CalendarServer => "CS",
            Self::AppleIcal => "I",
        }
    }

    /// Namespace URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Dav => ns::DAV,
            Self::CalDav => ns::CALDAV,
            Self::CardDav => ns::CARDDAV,
            Self::CalendarServer => ns::CALENDARSERVER,
            Self::AppleIcal => ns::APPLE_ICAL,
        }
    }
}

/// Properties to request in PROPFIND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prop {
    /// Display name.
    DisplayName,
    /// Resource type.
    ResourceType,
    /// Owner principal (RFC 3744).
    Owner,
    /// Privileges of the current user (RFC 3744).
    CurrentUserPrivilegeSet,
    /// Groups the principal is a member of (RFC 3744).
    GroupMembership,
    /// Calendar home set.
    CalendarHomeSet,
    /// Calendar description.
    CalendarDescription,
    /// Calendar timezone.
    CalendarTimezone,
    /// Supported calendar components.
    SupportedCalendarComponentSet,
    /// Address book home set.
    AddressbookHomeSet,
    /// Address book description.
    AddressbookDescription,
    /// Principals this principal is a read-only proxy for.
    CalendarProxyReadFor,
    /// Principals this principal is a read/write proxy for.
    CalendarProxyWriteFor,
    /// Upstream URL of a subscribed calendar.
    Source,
    /// Calendar color.
    CalendarColor,
}

impl Prop {
    /// Local element name of the property.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DisplayName => "displayname",
            Self::ResourceType => "resourcetype",
            Self::Owner => "owner",
            Self::CurrentUserPrivilegeSet => "current-user-privilege-set",
            Self::GroupMembership => "group-membership",
            Self::CalendarHomeSet => "calendar-home-set",
            Self::CalendarDescription => "calendar-description",
            Self::CalendarTimezone => "calendar-timezone",
            Self::SupportedCalendarComponentSet => "supported-calendar-component-set",
            Self::AddressbookHomeSet => "addressbook-home-set",
            Self::AddressbookDescription => "addressbook-description",
            Self::CalendarProxyReadFor => "calendar-proxy-read-for",
            Self::CalendarProxyWriteFor => "calendar-proxy-write-for",
            Self::Source => "source",
            Self::CalendarColor => "calendar-color",
        }
    }

    /// Namespace of the property.
    #[must_use]
    pub const fn namespace(self) -> Namespace {
        match self {
            Self::DisplayName
            | Self::ResourceType
            | Self::Owner
            | Self::CurrentUserPrivilegeSet
            | Self::GroupMembership => Namespace::Dav,
            Self::CalendarHomeSet
            | Self::CalendarDescription
            | Self::CalendarTimezone
            | Self::SupportedCalendarComponentSet => Namespace::CalDav,
            Self::AddressbookHomeSet | Self::AddressbookDescription => Namespace::CardDav,
            Self::CalendarProxyReadFor | Self::CalendarProxyWriteFor | Self::Source => {
                Namespace::CalendarServer
            }
            Self::CalendarColor => Namespace::AppleIcal,
        }
    }
}

/// PROPFIND request builder.
#[derive(Debug, Default)]
pub struct PropFindRequest {
    props: Vec<Prop>,
}

impl PropFindRequest {
    /// Creates a new PROPFIND request.
    #[must_use]
    pub fn new() -> Self {
        Self { props: Vec::new() }
    }

    /// Adds a property to the request. Duplicates are ignored.
    pub fn add_property(&mut self, prop: Prop) -> &mut Self {
        if !self.props.contains(&prop) {
            self.props.push(prop);
        }
        self
    }

    /// Builds the XML body for the PROPFIND request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, DavError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        let mut namespaces: Vec<Namespace> = self.props.iter().map(|p| p.namespace()).collect();
        namespaces.push(Namespace::Dav);
        namespaces.sort_unstable();
        namespaces.dedup();

        // <D:propfind xmlns:D="DAV:" ...>
        let mut propfind = BytesStart::new("D:propfind");
        for namespace in &namespaces {
            let attr = format!("xmlns:{}", namespace.prefix());
            propfind.push_attribute((attr.as_str(), namespace.uri()));
        }
        writer.write_event(Event::Start(propfind))?;

        writer.write_event(Event::Start(BytesStart::new("D:prop")))?;
        for prop in &self.props {
            let elem = format!("{}:{}", prop.namespace().prefix(), prop.name());
            writer.write_event(Event::Empty(BytesStart::new(elem)))?;
        }
        writer.write_event(Event::End(BytesEnd::new("D:prop")))?;

        writer.write_event(Event::End(BytesEnd::new("D:propfind")))?;

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| DavError::Xml(format!("UTF-8 error: {e}")))
    }
}
