// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Test data factories for integration tests.

use davsync_core::{Collection, HomeSet, LocalDb, ServiceKind};
use davsync_dav::{Href, Privileges, Properties, ResourceType};

use super::FakeServer;

/// Opens an empty in-memory database.
pub async fn open_db() -> LocalDb {
    LocalDb::open(None)
        .await
        .expect("Failed to create test database")
}

/// Registers a `CalDAV` service whose principal lives at `principal`.
pub async fn caldav_service(db: &LocalDb, principal: Option<&str>) -> i64 {
    let principal = principal.map(FakeServer::url);
    db.services
        .insert("user@example.com", ServiceKind::CalDav, principal.as_ref())
        .await
        .expect("Failed to insert service")
}

/// Principal properties pointing at home-sets and related principals.
pub fn principal(
    home_sets: &[&str],
    proxy_write_for: &[&str],
    proxy_read_for: &[&str],
    groups: &[&str],
) -> Properties {
    let hrefs = |paths: &[&str]| -> Vec<Href> { paths.iter().map(|p| Href::from(*p)).collect() };
    Properties {
        calendar_home_set: hrefs(home_sets),
        calendar_proxy_write_for: hrefs(proxy_write_for),
        calendar_proxy_read_for: hrefs(proxy_read_for),
        group_membership: hrefs(groups),
        ..Default::default()
    }
}

/// A writable calendar.
pub fn calendar(name: &str) -> Properties {
    Properties {
        resource_type: Some(ResourceType {
            collection: true,
            calendar: true,
            ..Default::default()
        }),
        display_name: Some(name.to_string()),
        calendar_color: Some("#3366CC".to_string()),
        privileges: Some(Privileges {
            bind: true,
            unbind: true,
            write_content: true,
        }),
        ..Default::default()
    }
}

/// An address book.
pub fn addressbook(name: &str) -> Properties {
    Properties {
        resource_type: Some(ResourceType {
            collection: true,
            addressbook: true,
            ..Default::default()
        }),
        display_name: Some(name.to_string()),
        addressbook_description: Some(format!("{name} contacts")),
        ..Default::default()
    }
}

/// A calendar subscription, optionally without its upstream source.
pub fn subscription(source: Option<&str>) -> Properties {
    Properties {
        resource_type: Some(ResourceType {
            collection: true,
            subscribed: true,
            ..Default::default()
        }),
        source: source.map(Href::from),
        ..Default::default()
    }
}

/// A collection that is neither a calendar nor an address book.
pub fn plain_folder() -> Properties {
    Properties {
        resource_type: Some(ResourceType {
            collection: true,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Everything stored for a service.
pub async fn stored_state(db: &LocalDb, service_id: i64) -> (Vec<HomeSet>, Vec<Collection>) {
    let home_sets = db
        .home_sets
        .list_by_service(service_id)
        .await
        .expect("Failed to list home-sets");
    let collections = db
        .collections
        .list_by_service(service_id)
        .await
        .expect("Failed to list collections");
    (home_sets, collections)
}
