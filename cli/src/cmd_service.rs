// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{ArgMatches, Command, arg, value_parser};
use colored::{Color, Colorize};
use davsync_core::{DavSync, Service, ServiceKind, Url};

use crate::table::{Column, PaddingDirection, Table};

#[derive(Debug, Clone)]
pub struct CmdServiceAdd {
    pub account: String,
    pub kind: ServiceKind,
    pub principal: Option<Url>,
}

impl CmdServiceAdd {
    pub const NAME: &str = "add";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("new")
            .about("Register a CalDAV or CardDAV service")
            .arg(arg!(account: <ACCOUNT> "Name of the account owning the service"))
            .arg(
                arg!(kind: <KIND> "Protocol spoken by the service")
                    .value_parser(value_parser!(ServiceKind)),
            )
            .arg(
                arg!(-p --principal <URL> "Principal URL where discovery starts")
                    .value_parser(value_parser!(Url)),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let (Some(account), Some(kind)) = (
            matches.get_one::<String>("account"),
            matches.get_one::<ServiceKind>("kind"),
        ) else {
            unreachable!()
        };

        Self {
            account: account.clone(),
            kind: *kind,
            principal: matches.get_one::<Url>("principal").cloned(),
        }
    }

    pub async fn run(self, davsync: &DavSync) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "adding service...");
        let service = davsync
            .add_service(&self.account, self.kind, self.principal.as_ref())
            .await?;

        println!(
            "{} {} service {} for {}",
            "Added".green(),
            service.kind,
            service.id.to_string().bold(),
            service.account_name,
        );
        if service.principal.is_none() {
            println!(
                "{} no principal URL, refresh will only revisit stored home-sets",
                "Note:".yellow(),
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdServiceList;

impl CmdServiceList {
    pub const NAME: &str = "list";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ls")
            .about("List registered services")
    }

    pub async fn run(self, davsync: &DavSync) -> Result<(), Box<dyn Error>> {
        tracing::debug!("listing services...");
        let services = davsync.services().await?;
        if services.is_empty() {
            println!("{}", "No services registered".italic());
            return Ok(());
        }

        let table = Table {
            columns: vec![
                ServiceColumn::Id,
                ServiceColumn::Kind,
                ServiceColumn::Account,
                ServiceColumn::Principal,
            ],
            separator: "  ".to_string(),
            padding: true,
            data: &services,
        };
        table.write_to(&mut io::stdout().lock())
    }
}

#[derive(Debug, Clone, Copy)]
enum ServiceColumn {
    Id,
    Kind,
    Account,
    Principal,
}

impl Column<Service> for ServiceColumn {
    fn header(&self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Kind => "KIND",
            Self::Account => "ACCOUNT",
            Self::Principal => "PRINCIPAL",
        }
    }

    fn format(&self, service: &Service) -> String {
        match self {
            Self::Id => service.id.to_string(),
            Self::Kind => service.kind.to_string(),
            Self::Account => service.account_name.clone(),
            Self::Principal => service
                .principal
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            Self::Id => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }

    fn get_color(&self, service: &Service) -> Option<Color> {
        match self {
            Self::Principal if service.principal.is_none() => Some(Color::BrightBlack),
            _ => None,
        }
    }
}
