// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

mod collection;
mod config;
mod davsync;
mod error;
mod localdb;
mod refresh;
mod service;

pub use davsync_dav::Url;

pub use crate::collection::{Collection, CollectionType, HomeSet, parse_color};
pub use crate::config::{APP_NAME, Config, Preselect, expand_path, get_config_dir};
pub use crate::davsync::DavSync;
pub use crate::error::{Classified, IgnorePolicy, RefreshError, classify};
pub use crate::localdb::{EntityDiff, LocalDb, StoreDiff};
pub use crate::refresh::{
    ChangeCounts, CollectionsRefresher, Discovery, RefreshFailure, RefreshOutcome, RefreshSummary,
    refresh_service,
};
pub use crate::service::{Service, ServiceKind};
