// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io, io::Write};

use clap::{ArgMatches, Command, arg, value_parser};
use colored::{Color, Colorize};
use davsync_core::{Collection, CollectionType, DavSync, HomeSet};

use crate::table::{Column, PaddingDirection, Table};

#[derive(Debug, Clone, Copy)]
pub struct CmdCollections {
    pub service_id: i64,
}

impl CmdCollections {
    pub const NAME: &str = "collections";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ls")
            .about("List the home-sets and collections of a service")
            .arg(
                arg!(service_id: <SERVICE_ID> "The service to list")
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
        tracing::debug!(?self, "listing collections...");
        let home_sets = davsync.home_sets(self.service_id).await?;
        let collections = davsync.collections(self.service_id).await?;

        let mut stdout = io::stdout().lock();
        if home_sets.is_empty() && collections.is_empty() {
            writeln!(
                stdout,
                "{}",
                "Nothing discovered yet, run `davsync refresh` first".italic()
            )?;
            return Ok(());
        }

        writeln!(stdout, "{}", "Home-sets".underline())?;
        Table {
            columns: vec![
                HomeSetColumn::Id,
                HomeSetColumn::Personal,
                HomeSetColumn::Name,
                HomeSetColumn::Url,
            ],
            separator: "  ".to_string(),
            padding: true,
            data: &home_sets,
        }
        .write_to(&mut stdout)?;

        writeln!(stdout)?;
        writeln!(stdout, "{}", "Collections".underline())?;
        Table {
            columns: vec![
                CollectionColumn::Id,
                CollectionColumn::Sync,
                CollectionColumn::Access,
                CollectionColumn::Type,
                CollectionColumn::Name,
                CollectionColumn::Url,
            ],
            separator: "  ".to_string(),
            padding: true,
            data: &collections,
        }
        .write_to(&mut stdout)
    }
}

#[derive(Debug, Clone, Copy)]
enum HomeSetColumn {
    Id,
    Personal,
    Name,
    Url,
}

impl Column<HomeSet> for HomeSetColumn {
    fn header(&self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Personal => "OWNER",
            Self::Name => "NAME",
            Self::Url => "URL",
        }
    }

    fn format(&self, home_set: &HomeSet) -> String {
        match self {
            Self::Id => home_set.id.map_or_else(String::new, |id| id.to_string()),
            Self::Personal if home_set.personal => "personal".to_string(),
            Self::Personal => "shared".to_string(),
            Self::Name => home_set.display_name.clone().unwrap_or_default(),
            Self::Url => home_set.url.to_string(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            Self::Id => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }

    fn get_color(&self, home_set: &HomeSet) -> Option<Color> {
        match self {
            Self::Personal if home_set.personal => Some(Color::Green),
            Self::Url => Some(Color::BrightBlack),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CollectionColumn {
    Id,
    Sync,
    Access,
    Type,
    Name,
    Url,
}

impl Column<Collection> for CollectionColumn {
    fn header(&self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Sync => "SYNC",
            Self::Access => "ACCESS",
            Self::Type => "TYPE",
            Self::Name => "NAME",
            Self::Url => "URL",
        }
    }

    fn format(&self, collection: &Collection) -> String {
        match self {
            Self::Id => collection.id.map_or_else(String::new, |id| id.to_string()),
            Self::Sync if collection.sync => "yes".to_string(),
            Self::Sync => "no".to_string(),
            Self::Access if collection.force_read_only => "ro (forced)".to_string(),
            Self::Access if collection.is_read_only() => "ro".to_string(),
            Self::Access => "rw".to_string(),
            Self::Type => format_type(collection),
            Self::Name => collection.display_name.clone().unwrap_or_default(),
            Self::Url => collection.url.to_string(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            Self::Id => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }

    fn get_color(&self, collection: &Collection) -> Option<Color> {
        match self {
            Self::Sync if collection.sync => Some(Color::Green),
            Self::Access if collection.force_read_only => Some(Color::Red),
            Self::Name => collection.color.map(argb_to_color),
            Self::Url => Some(Color::BrightBlack),
            _ => None,
        }
    }
}

fn format_type(collection: &Collection) -> String {
    let components: Vec<&str> = [
        (collection.supports_vevent, "event"),
        (collection.supports_vtodo, "todo"),
        (collection.supports_vjournal, "journal"),
    ]
    .into_iter()
    .filter_map(|(supported, name)| (supported == Some(true)).then_some(name))
    .collect();

    match collection.collection_type {
        CollectionType::AddressBook => "addressbook".to_string(),
        kind if components.is_empty() => kind.to_string(),
        kind => format!("{kind} ({})", components.join(",")),
    }
}

/// Drops the alpha channel of an ARGB color.
fn argb_to_color(argb: u32) -> Color {
    let [_, r, g, b] = argb.to_be_bytes();
    Color::TrueColor { r, g, b }
}
