// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - A scripted in-process `WebDAV` server
//! - Response and database factories

mod fake_server;
mod fixtures;

#[allow(unused_imports)]
pub use fake_server::FakeServer;
#[allow(unused_imports)]
pub use fixtures::{
    addressbook, calendar, caldav_service, open_db, plain_folder, principal, stored_state,
    subscription,
};
