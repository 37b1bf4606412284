// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg, value_parser};
use colored::Colorize;
use davsync_core::{DavSync, RefreshOutcome};

#[derive(Debug, Clone, Copy)]
pub struct CmdRefresh {
    pub service_id: i64,
}

impl CmdRefresh {
    pub const NAME: &str = "refresh";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Rediscover the home-sets and collections of a service")
            .arg(
                arg!(service_id: <SERVICE_ID> "The service to refresh")
                    .value_parser(value_parser!(i64)),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        match matches.get_one::<i64>("service_id") {
            Some(id) => Self { service_id: *id },
            None => unreachable!(),
        }
    }

    pub async fn run(self, davsync: &DavSync) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "refreshing service...");
        match davsync.refresh(self.service_id).await {
            RefreshOutcome::Success(summary) => {
                println!(
                    "{} service {}",
                    "Refreshed".green(),
                    summary.service_id.to_string().bold()
                );
                println!("  home-sets:   {}", summary.home_sets);
                println!("  collections: {}", summary.collections);
                Ok(())
            }
            RefreshOutcome::Failure(failure) => Err(failure.to_string().into()),
        }
    }
}
