// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Commands toggling the user-controlled flags of a collection.

use std::error::Error;

use clap::{Arg, ArgAction, ArgMatches, Command, arg, value_parser};
use colored::Colorize;
use davsync_core::DavSync;

fn collection_id() -> Arg {
    arg!(collection_id: <COLLECTION_ID> "The collection to change").value_parser(value_parser!(i64))
}

fn off(help: &'static str) -> Arg {
    arg!(--off)
        .help(help)
        .action(ArgAction::SetTrue)
}

fn get_args(matches: &ArgMatches) -> (i64, bool) {
    match matches.get_one::<i64>("collection_id") {
        Some(id) => (*id, matches.get_flag("off")),
        None => unreachable!(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdSelect {
    pub collection_id: i64,
    pub off: bool,
}

impl CmdSelect {
    pub const NAME: &str = "select";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Select a collection for sync")
            .arg(collection_id())
            .arg(off("Deselect the collection instead"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let (collection_id, off) = get_args(matches);
        Self { collection_id, off }
    }

    pub async fn run(self, davsync: &DavSync) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "changing sync selection...");
        davsync.set_sync(self.collection_id, !self.off).await?;

        let state = if self.off {
            "deselected".yellow()
        } else {
            "selected".green()
        };
        println!("Collection {} {state} for sync", self.collection_id);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdReadOnly {
    pub collection_id: i64,
    pub off: bool,
}

impl CmdReadOnly {
    pub const NAME: &str = "read-only";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ro")
            .about("Force a collection to be read-only")
            .arg(collection_id())
            .arg(off("Lift the forced read-only restriction"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let (collection_id, off) = get_args(matches);
        Self { collection_id, off }
    }

    pub async fn run(self, davsync: &DavSync) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "changing forced read-only...");
        davsync
            .set_force_read_only(self.collection_id, !self.off)
            .await?;

        if self.off {
            println!("Collection {} is no longer forced read-only", self.collection_id);
        } else {
            println!("Collection {} is {}", self.collection_id, "read-only".red());
        }
        Ok(())
    }
}
