// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Error handling during refresh: skipped branches, pruning and aborts.

use davsync_core::{CollectionsRefresher, Preselect, RefreshError, RefreshOutcome};
use davsync_dav::DavError;

use crate::common::{
    FakeServer, caldav_service, calendar, open_db, plain_folder, principal, stored_state,
};

fn two_home_sets() -> FakeServer {
    let server = FakeServer::new();
    server.principal(
        "/principals/user/",
        principal(
            &["/calendars/user/", "/calendars/shared/"],
            &[],
            &[],
            &[],
        ),
    );
    server.home_set(
        "/calendars/user/",
        vec![
            ("/calendars/user/c1/", calendar("C1")),
            ("/calendars/user/c2/", calendar("C2")),
        ],
    );
    server.home_set(
        "/calendars/shared/",
        vec![("/calendars/shared/team/", calendar("Team"))],
    );
    server
}

fn assert_status_failure(outcome: RefreshOutcome, expected: u16) {
    match outcome {
        RefreshOutcome::Failure(failure) => match failure.error {
            RefreshError::Dav(DavError::Status { status, .. }) => assert_eq!(status, expected),
            other => panic!("unexpected error: {other}"),
        },
        RefreshOutcome::Success(summary) => panic!("refresh succeeded: {summary:?}"),
    }
}

#[tokio::test]
async fn refresh_prunes_orphan_that_is_gone() {
    // Arrange
    let db = open_db().await;
    let service_id = caldav_service(&db, Some("/principals/user/")).await;
    let server = two_home_sets();
    let refresher = CollectionsRefresher::new(&db, &server, Preselect::None);
    assert!(refresher.refresh(service_id).await.is_success());

    // Act - C2 disappears from the listing and answers 404
    server.home_set(
        "/calendars/user/",
        vec![("/calendars/user/c1/", calendar("C1"))],
    );
    let outcome = refresher.refresh(service_id).await;

    // Assert
    match outcome {
        RefreshOutcome::Success(summary) => assert_eq!(summary.collections.deleted, 1),
        RefreshOutcome::Failure(failure) => panic!("refresh failed: {failure}"),
    }
    let (_, collections) = stored_state(&db, service_id).await;
    assert!(
        collections
            .iter()
            .all(|c| c.url != FakeServer::url("/calendars/user/c2/"))
    );
    assert_eq!(collections.len(), 2);
    assert_eq!(server.call_count("/calendars/user/c2/"), 1);
}

#[tokio::test]
async fn refresh_prunes_orphan_that_is_no_longer_a_collection() {
    let db = open_db().await;
    let service_id = caldav_service(&db, Some("/principals/user/")).await;
    let server = two_home_sets();
    let refresher = CollectionsRefresher::new(&db, &server, Preselect::None);
    assert!(refresher.refresh(service_id).await.is_success());

    server.home_set(
        "/calendars/user/",
        vec![("/calendars/user/c1/", calendar("C1"))],
    );
    server.collection("/calendars/user/c2/", plain_folder());
    assert!(refresher.refresh(service_id).await.is_success());

    let (_, collections) = stored_state(&db, service_id).await;
    assert_eq!(collections.len(), 2);
}

#[tokio::test]
async fn refresh_removes_forbidden_home_set() {
    // Arrange
    let db = open_db().await;
    let service_id = caldav_service(&db, Some("/principals/user/")).await;
    let server = two_home_sets();
    let refresher = CollectionsRefresher::new(&db, &server, Preselect::None);
    assert!(refresher.refresh(service_id).await.is_success());

    // Act - access to the shared home-set and its calendar is revoked
    server.fail("/calendars/shared/", 403);
    server.fail("/calendars/shared/team/", 403);
    let outcome = refresher.refresh(service_id).await;

    // Assert
    assert!(outcome.is_success());
    let (home_sets, collections) = stored_state(&db, service_id).await;
    assert_eq!(home_sets.len(), 1);
    assert_eq!(home_sets[0].url, FakeServer::url("/calendars/user/"));
    let paths: Vec<&str> = collections.iter().map(|c| c.url.path()).collect();
    assert_eq!(paths, vec!["/calendars/user/c1/", "/calendars/user/c2/"]);
}

#[tokio::test]
async fn refresh_skips_unreachable_delegate() {
    let db = open_db().await;
    let service_id = caldav_service(&db, Some("/principals/user/")).await;
    let server = FakeServer::new();
    server.principal(
        "/principals/user/",
        principal(
            &["/calendars/user/"],
            &["/principals/boss/"],
            &["/principals/gone/"],
            &["/groups/staff/"],
        ),
    );
    server.fail("/principals/boss/", 401);
    server.fail("/groups/staff/", 403);
    // "/principals/gone/" is not scripted and answers 404
    server.home_set("/calendars/user/", Vec::new());

    let outcome = CollectionsRefresher::new(&db, &server, Preselect::None)
        .refresh(service_id)
        .await;

    assert!(outcome.is_success());
    let (home_sets, _) = stored_state(&db, service_id).await;
    assert_eq!(home_sets.len(), 1);
    assert_eq!(server.call_count("/principals/gone/"), 1);
}

#[tokio::test]
async fn refresh_aborts_on_server_error_without_writing() {
    // Arrange
    let db = open_db().await;
    let service_id = caldav_service(&db, Some("/principals/user/")).await;
    let server = two_home_sets();
    let refresher = CollectionsRefresher::new(&db, &server, Preselect::None);
    assert!(refresher.refresh(service_id).await.is_success());
    let before = stored_state(&db, service_id).await;

    // Act - one listing changes while another home-set fails
    server.home_set("/calendars/user/", Vec::new());
    server.fail("/calendars/shared/", 500);
    let outcome = refresher.refresh(service_id).await;

    // Assert
    assert_status_failure(outcome, 500);
    assert_eq!(stored_state(&db, service_id).await, before);
}

#[tokio::test]
async fn refresh_aborts_on_principal_error() {
    let db = open_db().await;
    let service_id = caldav_service(&db, Some("/principals/user/")).await;
    let server = two_home_sets();
    server.fail("/principals/user/", 503);

    let outcome = CollectionsRefresher::new(&db, &server, Preselect::None)
        .refresh(service_id)
        .await;

    match &outcome {
        RefreshOutcome::Failure(failure) => {
            assert_eq!(failure.service_id, service_id);
            assert_eq!(failure.account_name.as_deref(), Some("user@example.com"));
        }
        RefreshOutcome::Success(_) => panic!("refresh must fail"),
    }
    assert_status_failure(outcome, 503);
    let (home_sets, collections) = stored_state(&db, service_id).await;
    assert!(home_sets.is_empty() && collections.is_empty());
    assert_eq!(server.calls(), vec!["/principals/user/".to_string()]);
}

#[tokio::test]
async fn refresh_aborts_on_orphan_server_error() {
    let db = open_db().await;
    let service_id = caldav_service(&db, Some("/principals/user/")).await;
    let server = two_home_sets();
    let refresher = CollectionsRefresher::new(&db, &server, Preselect::None);
    assert!(refresher.refresh(service_id).await.is_success());
    let before = stored_state(&db, service_id).await;

    server.home_set("/calendars/shared/", Vec::new());
    server.fail("/calendars/shared/team/", 502);

    assert_status_failure(refresher.refresh(service_id).await, 502);
    assert_eq!(stored_state(&db, service_id).await, before);
}

#[tokio::test]
async fn refresh_missing_service_makes_no_queries() {
    let db = open_db().await;
    let server = two_home_sets();

    let outcome = CollectionsRefresher::new(&db, &server, Preselect::None)
        .refresh(42)
        .await;

    match outcome {
        RefreshOutcome::Failure(failure) => {
            assert!(matches!(failure.error, RefreshError::ServiceNotFound(42)));
            assert_eq!(failure.account_name, None);
            assert_eq!(
                failure.to_string(),
                "Refreshing service 42 failed: Service 42 not found"
            );
        }
        RefreshOutcome::Success(_) => panic!("refresh must fail"),
    }
    assert!(server.calls().is_empty());
}
