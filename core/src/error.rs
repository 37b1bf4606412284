// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use davsync_dav::DavError;

/// Errors that abort a refresh.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// The service to refresh does not exist.
    #[error("Service {0} not found")]
    ServiceNotFound(i64),

    /// A discovery query failed in a way that cannot be ignored.
    #[error(transparent)]
    Dav(#[from] DavError),

    /// Reading or writing the local database failed.
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Which failed queries a discovery step may skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnorePolicy {
    /// Any 4xx status, for optional resources such as delegation targets.
    AnyClientError,

    /// 403, 404 and 410, for previously known resources that may be gone.
    Gone,
}

impl IgnorePolicy {
    const fn ignores(self, status: u16) -> bool {
        match self {
            Self::AnyClientError => status >= 400 && status < 500,
            Self::Gone => matches!(status, 403 | 404 | 410),
        }
    }
}

/// A failed query, sorted into skippable and fatal.
#[derive(Debug)]
pub enum Classified {
    /// The queried resource is treated as absent.
    Ignorable(String),

    /// The refresh must abort.
    Fatal(RefreshError),
}

/// Sorts a query failure according to `policy`.
///
/// Only HTTP error statuses can be ignored; transport and XML failures are
/// always fatal.
pub fn classify(err: DavError, policy: IgnorePolicy) -> Classified {
    match err.status() {
        Some(status) if policy.ignores(status) => Classified::Ignorable(err.to_string()),
        _ => Classified::Fatal(err.into()),
    }
}
