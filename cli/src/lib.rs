// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end for davsync.

mod cli;
mod cmd_collections;
mod cmd_flags;
mod cmd_refresh;
mod cmd_service;
mod config;
mod table;

pub use crate::cli::{Cli, Commands, run};
pub use crate::cmd_collections::CmdCollections;
pub use crate::cmd_flags::{CmdReadOnly, CmdSelect};
pub use crate::cmd_refresh::CmdRefresh;
pub use crate::cmd_service::{CmdServiceAdd, CmdServiceList};
pub use crate::config::parse_config;
