// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Response parsers for `WebDAV` PROPFIND operations.

use quick_xml::events::Event;
use reqwest::Url;

use crate::error::DavError;
use crate::location::{resolve, same_resource};
use crate::types::{DavResponse, Href, Privileges, Relation, ResourceType};
use crate::xml;

/// `WebDAV` multistatus response.
#[derive(Debug, Clone)]
pub struct MultiStatusResponse {
    /// The response items.
    pub responses: Vec<ResponseItem>,
}

/// Individual response in multistatus.
#[derive(Debug, Clone)]
pub struct ResponseItem {
    /// The resource href, possibly relative.
    pub href: Href,
    /// One entry per `propstat` element.
    pub prop_stats: Vec<PropStat>,
    /// Response-level status line, sent for missing resources.
    pub status: Option<String>,
}

/// Property stat with status and value.
#[derive(Debug, Clone)]
pub struct PropStat {
    /// Properties reported under this status.
    pub props: Properties,
    /// Status line, e.g. `HTTP/1.1 200 OK`.
    pub status: String,
}

/// Discovery properties, decoded.
///
/// Multi-valued properties are empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    /// `DAV:displayname`
    pub display_name: Option<String>,
    /// `DAV:resourcetype`
    pub resource_type: Option<ResourceType>,
    /// `DAV:owner`, the owning principal.
    pub owner: Option<Href>,
    /// `DAV:current-user-privilege-set`
    pub privileges: Option<Privileges>,
    /// `DAV:group-membership`, groups the principal belongs to.
    pub group_membership: Vec<Href>,
    /// `CALDAV:calendar-home-set`
    pub calendar_home_set: Vec<Href>,
    /// `CARDDAV:addressbook-home-set`
    pub addressbook_home_set: Vec<Href>,
    /// `CS:calendar-proxy-read-for`, principals readable on behalf of.
    pub calendar_proxy_read_for: Vec<Href>,
    /// `CS:calendar-proxy-write-for`, principals writable on behalf of.
    pub calendar_proxy_write_for: Vec<Href>,
    /// `CALDAV:calendar-description`
    pub calendar_description: Option<String>,
    /// `CALDAV:calendar-timezone`, a `VTIMEZONE` component.
    pub calendar_timezone: Option<String>,
    /// `CALDAV:supported-calendar-component-set`, as component names.
    pub supported_calendar_components: Option<Vec<String>>,
    /// `CARDDAV:addressbook-description`
    pub addressbook_description: Option<String>,
    /// `CS:source`, the feed behind a calendar subscription.
    pub source: Option<Href>,
    /// `ICAL:calendar-color`, as sent by the server.
    pub calendar_color: Option<String>,
}

impl Properties {
    /// Fills every property still missing here from `other`.
    fn merge(&mut self, other: Self) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if slot.is_none() {
                *slot = value;
            }
        }

        take(&mut self.display_name, other.display_name);
        take(&mut self.resource_type, other.resource_type);
        take(&mut self.owner, other.owner);
        take(&mut self.privileges, other.privileges);
        self.group_membership.extend(other.group_membership);
        self.calendar_home_set.extend(other.calendar_home_set);
        self.addressbook_home_set.extend(other.addressbook_home_set);
        self.calendar_proxy_read_for
            .extend(other.calendar_proxy_read_for);
        self.calendar_proxy_write_for
            .extend(other.calendar_proxy_write_for);
        take(&mut self.calendar_description, other.calendar_description);
        take(&mut self.calendar_timezone, other.calendar_timezone);
        take(
            &mut self.supported_calendar_components,
            other.supported_calendar_components,
        );
        take(
            &mut self.addressbook_description,
            other.addressbook_description,
        );
        take(&mut self.source, other.source);
        take(&mut self.calendar_color, other.calendar_color);
    }
}

/// Extracts the numeric code of a status line such as `HTTP/1.1 404 Not Found`.
#[must_use]
pub fn parse_status(line: &str) -> Option<u16> {
    line.split_whitespace().nth(1)?.parse().ok()
}

fn is_success_status(line: &str) -> bool {
    parse_status(line).is_some_and(|s| (200..300).contains(&s))
}

fn first_href(hrefs: Vec<String>) -> Option<Href> {
    hrefs.into_iter().next().map(Href::new)
}

fn hrefs(hrefs: Vec<String>) -> Vec<Href> {
    hrefs.into_iter().map(Href::new).collect()
}

impl ResponseItem {
    /// Response-level status code, if present.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.status.as_deref().and_then(parse_status)
    }

    /// Properties of all successful `propstat` elements, merged.
    #[must_use]
    pub fn properties(&self) -> Properties {
        let mut props = Properties::default();
        for prop_stat in &self.prop_stats {
            if is_success_status(&prop_stat.status) {
                props.merge(prop_stat.props.clone());
            }
        }
        props
    }
}

impl MultiStatusResponse {
    /// Parses multistatus response from XML.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails.
    pub fn from_xml(xml: &str) -> Result<Self, DavError> {
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        reader.config_mut().check_end_names = true;

        let mut responses = Vec::new();
        let mut current_response: Option<ResponseItem> = None;
        let mut current_props = Properties::default();
        let mut current_status: Option<String> = None;
        let mut in_propstat = false;
        let mut in_prop = false;

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::End(ref e) if e.name().local_name().into_inner() == b"multistatus" => break,
                Event::Eof => break,

                Event::Start(ref e) => match e.name().local_name().into_inner() {
                    b"response" => {
                        current_response = Some(ResponseItem {
                            href: Href::new(String::new()),
                            prop_stats: Vec::new(),
                            status: None,
                        });
                    }
                    b"href" if !in_propstat => {
                        let href = xml::read_text(&mut reader)?;
                        if let Some(ref mut resp) = current_response {
                            resp.href = Href::new(href.trim().to_string());
                        }
                    }
                    b"status" if !in_propstat => {
                        let status = xml::read_text(&mut reader)?;
                        if let Some(ref mut resp) = current_response {
                            resp.status = Some(status);
                        }
                    }
                    b"propstat" => {
                        in_propstat = true;
                        current_props = Properties::default();
                        current_status = None;
                    }
                    b"prop" if in_propstat => in_prop = true,
                    b"status" if !in_prop => {
                        current_status = Some(xml::read_text(&mut reader)?);
                    }
                    name if in_prop => read_property(&mut reader, name, &mut current_props)?,
                    _ => {}
                },

                Event::Empty(ref e) if in_prop => {
                    if e.name().local_name().into_inner() == b"resourcetype" {
                        current_props.resource_type = Some(ResourceType::default());
                    }
                }

                Event::End(ref e) => match e.name().local_name().into_inner() {
                    b"response" => {
                        if let Some(resp) = current_response.take() {
                            responses.push(resp);
                        }
                    }
                    b"propstat" => {
                        in_propstat = false;
                        if let Some(ref mut resp) = current_response {
                            resp.prop_stats.push(PropStat {
                                props: std::mem::take(&mut current_props),
                                status: current_status.take().unwrap_or_default(),
                            });
                        }
                    }
                    b"prop" => in_prop = false,
                    _ => {}
                },
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { responses })
    }

    /// Resolves every response against the queried URL and tags its relation.
    ///
    /// Entries whose href cannot be resolved are skipped.
    #[must_use]
    pub fn into_dav_responses(self, base: &Url) -> Vec<DavResponse> {
        self.responses
            .into_iter()
            .filter_map(|item| {
                let url = match resolve(base, item.href.as_str()) {
                    Ok(url) => url,
                    Err(e) => {
                        tracing::warn!(href = %item.href, error = %e, "ignoring response with invalid href");
                        return None;
                    }
                };
                let relation = if same_resource(&url, base) {
                    Relation::SelfResource
                } else {
                    Relation::Member
                };
                Some(DavResponse {
                    status: item.status_code(),
                    properties: item.properties(),
                    url,
                    relation,
                })
            })
            .collect()
    }
}

fn read_property<R: std::io::BufRead>(
    reader: &mut quick_xml::Reader<R>,
    name: &[u8],
    props: &mut Properties,
) -> Result<(), DavError> {
    match name {
        b"displayname" => props.display_name = Some(xml::read_text(reader)?),
        b"resourcetype" => {
            let names = xml::read_child_names(reader)?;
            props.resource_type = Some(ResourceType::from_names(&names));
        }
        b"owner" => props.owner = first_href(xml::read_hrefs(reader)?),
        b"current-user-privilege-set" => {
            let names = xml::read_child_names(reader)?;
            props.privileges = Some(Privileges::from_names(&names));
        }
        b"group-membership" => props.group_membership = hrefs(xml::read_hrefs(reader)?),
        b"calendar-home-set" => props.calendar_home_set = hrefs(xml::read_hrefs(reader)?),
        b"addressbook-home-set" => props.addressbook_home_set = hrefs(xml::read_hrefs(reader)?),
        b"calendar-proxy-read-for" => {
            props.calendar_proxy_read_for = hrefs(xml::read_hrefs(reader)?);
        }
        b"calendar-proxy-write-for" => {
            props.calendar_proxy_write_for = hrefs(xml::read_hrefs(reader)?);
        }
        b"calendar-description" => props.calendar_description = Some(xml::read_text(reader)?),
        b"calendar-timezone" => props.calendar_timezone = Some(xml::read_text(reader)?),
        b"supported-calendar-component-set" => {
            props.supported_calendar_components = Some(xml::read_components(reader)?);
        }
        b"addressbook-description" => {
            props.addressbook_description = Some(xml::read_text(reader)?);
        }
        b"source" => props.source = first_href(xml::read_hrefs(reader)?),
        b"calendar-color" => props.calendar_color = Some(xml::read_text(reader)?),
        _ => xml::skip_element(reader)?,
    }
    Ok(())
}
