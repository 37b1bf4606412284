// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! XML utilities for WebDAV/CalDAV/CardDAV processing.
//!
//! The readers below are called right after the `Start` event of an element
//! and consume everything up to and including its matching `End` event.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesRef, Event};

use crate::error::DavError;

/// XML namespaces used in `WebDAV` discovery.
pub mod ns {
    /// `WebDAV` namespace.
    pub const DAV: &str = "DAV:";

    /// `CalDAV` namespace.
    pub const CALDAV: &str = "urn:ietf:params:xml:ns:caldav";

    /// `CardDAV` namespace.
    pub const CARDDAV: &str = "urn:ietf:params:xml:ns:carddav";

    /// Calendar server extensions (proxies, subscriptions).
    pub const CALENDARSERVER: &str = "http://calendarserver.org/ns/";

    /// Apple iCal extensions (calendar color).
    pub const APPLE_ICAL: &str = "http://apple.com/ns/ical/";
}

fn unexpected_eof() -> DavError {
    DavError::Xml("Unexpected EOF".to_string())
}

/// Reads the text content of the current element.
pub fn read_text<R: BufRead>(reader: &mut Reader<R>) -> Result<String, DavError> {
    let mut text = String::new();
    let mut depth = 1;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Text(e) => {
                let raw = e.decode().map_err(|e| DavError::Xml(e.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&raw)
                    .map_err(|e| DavError::Xml(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::GeneralRef(e) => text.push_str(&resolve_entity(&e)?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

/// Expands an entity or character reference such as `&amp;` or `&#38;`.
fn resolve_entity(entity: &BytesRef<'_>) -> Result<String, DavError> {
    if let Some(c) = entity
        .resolve_char_ref()
        .map_err(|e| DavError::Xml(e.to_string()))?
    {
        return Ok(c.to_string());
    }

    let name = entity.decode().map_err(|e| DavError::Xml(e.to_string()))?;
    quick_xml::escape::resolve_predefined_entity(&name)
        .map(ToString::to_string)
        .ok_or_else(|| DavError::Xml(format!("Unknown entity: &{name};")))
}

/// Reads all `href` children of the current element, at any depth.
pub fn read_hrefs<R: BufRead>(reader: &mut Reader<R>) -> Result<Vec<String>, DavError> {
    let mut hrefs = Vec::new();
    let mut depth = 1;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.name().local_name().into_inner() == b"href" => {
                let href = read_text(reader)?;
                let href = href.trim();
                if !href.is_empty() {
                    hrefs.push(href.to_string());
                }
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
        buf.clear();
    }

    Ok(hrefs)
}

/// Collects the local names of all descendant elements of the current element.
pub fn read_child_names<R: BufRead>(reader: &mut Reader<R>) -> Result<Vec<String>, DavError> {
    let mut names = Vec::new();
    let mut depth = 1;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                depth += 1;
                names.push(String::from_utf8_lossy(e.name().local_name().into_inner()).into());
            }
            Event::Empty(ref e) => {
                names.push(String::from_utf8_lossy(e.name().local_name().into_inner()).into());
            }
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
        buf.clear();
    }

    Ok(names)
}

/// Collects the `name` attribute of every `comp` child of the current element.
pub fn read_components<R: BufRead>(reader: &mut Reader<R>) -> Result<Vec<String>, DavError> {
    let mut components = Vec::new();
    let mut depth = 1;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match &event {
            Event::Start(e) | Event::Empty(e) => {
                if e.name().local_name().into_inner() == b"comp" {
                    if let Ok(Some(name_attr)) = e.try_get_attribute("name") {
                        let name = std::str::from_utf8(&name_attr.value)
                            .map_err(|e| DavError::Xml(format!("UTF-8 error: {e}")))?
                            .to_string();
                        components.push(name);
                    }
                }
                if matches!(event, Event::Start(_)) {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
        buf.clear();
    }

    Ok(components)
}

/// Skips the current element and all of its content.
pub fn skip_element<R: BufRead>(reader: &mut Reader<R>) -> Result<(), DavError> {
    let mut depth = 1;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
        buf.clear();
    }
}
