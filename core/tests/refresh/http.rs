// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Refresh over HTTP with wiremock.

use davsync_core::{
    CollectionType, Config, Preselect, RefreshError, RefreshOutcome, ServiceKind, Url,
    refresh_service,
};
use davsync_dav::DavError;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{open_db, stored_state};

const PRINCIPAL: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<D:multistatus xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:response>
    <D:href>/principals/user/</D:href>
    <D:propstat>
      <D:prop>
        <C:calendar-home-set><D:href>/calendars/user/</D:href></C:calendar-home-set>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
    <D:propstat>
      <D:prop>
        <D:group-membership/>
      </D:prop>
      <D:status>HTTP/1.1 404 Not Found</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"#;

const HOME_SET: &str = r##"<?xml version="1.0" encoding="utf-8" ?>
<D:multistatus xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav" xmlns:I="http://apple.com/ns/ical/">
  <D:response>
    <D:href>/calendars/user/</D:href>
    <D:propstat>
      <D:prop>
        <D:displayname>Calendars</D:displayname>
        <D:resourcetype><D:collection/></D:resourcetype>
        <D:current-user-privilege-set>
          <D:privilege><D:read/></D:privilege>
        </D:current-user-privilege-set>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/calendars/user/personal/</D:href>
    <D:propstat>
      <D:prop>
        <D:displayname>Personal</D:displayname>
        <D:resourcetype><D:collection/><C:calendar/></D:resourcetype>
        <I:calendar-color>#FF000080</I:calendar-color>
        <C:supported-calendar-component-set>
          <C:comp name="VEVENT"/>
        </C:supported-calendar-component-set>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"##;

fn config(preselect: Preselect) -> Config {
    Config {
        preselect,
        ..Config::default()
    }
}

#[tokio::test]
async fn refresh_service_over_http() {
    // Arrange
    let mock_server = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .and(path("/principals/user/"))
        .and(header("Depth", "0"))
        .and(body_string_contains("<C:calendar-home-set/>"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(PRINCIPAL, "application/xml"))
        .mount(&mock_server)
        .await;
    Mock::given(method("PROPFIND"))
        .and(path("/calendars/user/"))
        .and(header("Depth", "1"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(HOME_SET, "application/xml"))
        .mount(&mock_server)
        .await;

    let db = open_db().await;
    let principal = Url::parse(&format!("{}/principals/user/", mock_server.uri())).unwrap();
    let service_id = db
        .services
        .insert("user", ServiceKind::CalDav, Some(&principal))
        .await
        .unwrap();

    // Act
    let outcome = refresh_service(&db, &config(Preselect::All), service_id).await;

    // Assert
    assert!(outcome.is_success(), "{outcome:?}");
    let (home_sets, collections) = stored_state(&db, service_id).await;
    assert_eq!(home_sets.len(), 1);
    assert_eq!(home_sets[0].display_name.as_deref(), Some("Calendars"));
    assert!(!home_sets[0].priv_bind);
    assert!(home_sets[0].personal);

    assert_eq!(collections.len(), 1);
    let personal = &collections[0];
    assert_eq!(personal.url.path(), "/calendars/user/personal/");
    assert_eq!(personal.collection_type, CollectionType::Calendar);
    assert_eq!(personal.color, Some(0x80FF_0000));
    assert_eq!(personal.supports_vevent, Some(true));
    assert_eq!(personal.supports_vtodo, Some(false));
    assert!(personal.sync);
}

#[tokio::test]
async fn refresh_service_reports_server_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .and(path("/principals/user/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let db = open_db().await;
    let principal = Url::parse(&format!("{}/principals/user/", mock_server.uri())).unwrap();
    let service_id = db
        .services
        .insert("user", ServiceKind::CalDav, Some(&principal))
        .await
        .unwrap();

    let outcome = refresh_service(&db, &config(Preselect::None), service_id).await;

    match outcome {
        RefreshOutcome::Failure(failure) => {
            assert_eq!(failure.account_name.as_deref(), Some("user"));
            assert!(matches!(
                failure.error,
                RefreshError::Dav(DavError::Status { status: 500, .. })
            ));
        }
        RefreshOutcome::Success(_) => panic!("refresh must fail"),
    }
}

const MOVED_CALENDAR: &str = r##"<?xml version="1.0" encoding="utf-8" ?>
<D:multistatus xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:response>
    <D:href>/calendars/archive/personal/</D:href>
    <D:propstat>
      <D:prop>
        <D:displayname>Personal (archived)</D:displayname>
        <D:resourcetype><D:collection/><C:calendar/></D:resourcetype>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"##;

const EMPTY_HOME_SET: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>/calendars/user/</D:href>
    <D:propstat>
      <D:prop>
        <D:displayname>Calendars</D:displayname>
        <D:resourcetype><D:collection/></D:resourcetype>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"#;

async fn mount_principal(mock_server: &MockServer) {
    Mock::given(method("PROPFIND"))
        .and(path("/principals/user/"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(PRINCIPAL, "application/xml"))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn refresh_service_keeps_redirected_orphan() {
    // Arrange
    let mock_server = MockServer::start().await;
    mount_principal(&mock_server).await;
    Mock::given(method("PROPFIND"))
        .and(path("/calendars/user/"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(HOME_SET, "application/xml"))
        .mount(&mock_server)
        .await;

    let db = open_db().await;
    let principal = Url::parse(&format!("{}/principals/user/", mock_server.uri())).unwrap();
    let service_id = db
        .services
        .insert("user", ServiceKind::CalDav, Some(&principal))
        .await
        .unwrap();
    let config = config(Preselect::All);
    assert!(refresh_service(&db, &config, service_id).await.is_success());
    let (_, before) = stored_state(&db, service_id).await;
    let id = before[0].id.unwrap();
    db.collections.set_sync(id, false).await.unwrap();

    // Act - the calendar leaves the listing and its old URL redirects
    mock_server.reset().await;
    mount_principal(&mock_server).await;
    Mock::given(method("PROPFIND"))
        .and(path("/calendars/user/"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(EMPTY_HOME_SET, "application/xml"))
        .mount(&mock_server)
        .await;
    Mock::given(method("PROPFIND"))
        .and(path("/calendars/user/personal/"))
        .respond_with(ResponseTemplate::new(308).insert_header(
            "Location",
            format!("{}/calendars/archive/personal/", mock_server.uri()),
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("PROPFIND"))
        .and(path("/calendars/archive/personal/"))
        .and(header("Depth", "0"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(MOVED_CALENDAR, "application/xml"))
        .mount(&mock_server)
        .await;
    let outcome = refresh_service(&db, &config, service_id).await;

    // Assert
    assert!(outcome.is_success(), "{outcome:?}");
    let (_, collections) = stored_state(&db, service_id).await;
    assert_eq!(collections.len(), 1);
    let personal = &collections[0];
    assert_eq!(personal.id, Some(id));
    assert_eq!(personal.url.path(), "/calendars/user/personal/");
    assert_eq!(personal.display_name.as_deref(), Some("Personal (archived)"));
    assert_eq!(personal.home_set, None);
    assert!(!personal.sync);
}
