// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `WebDAV` property query client used for `CalDAV` (RFC 4791) and `CardDAV`
//! (RFC 6352) collection discovery.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

mod client;
mod config;
mod error;
mod http;
mod location;
mod request;
mod response;
mod types;
mod xml;

pub use reqwest::Url;

pub use crate::client::{DavClient, PropertyQuery};
pub use crate::config::{AuthMethod, DavConfig};
pub use crate::error::DavError;
pub use crate::location::{resolve, same_resource, with_trailing_slash};
pub use crate::request::{Depth, Namespace, Prop, PropFindRequest};
pub use crate::response::{MultiStatusResponse, PropStat, Properties, ResponseItem};
pub use crate::types::{DavResponse, Href, Privileges, Relation, ResourceType};
