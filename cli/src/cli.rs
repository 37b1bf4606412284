// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use davsync_core::{APP_NAME, DavSync};
use futures::{FutureExt, future::BoxFuture};
use tracing_subscriber::EnvFilter;

use crate::cmd_collections::CmdCollections;
use crate::cmd_flags::{CmdReadOnly, CmdSelect};
use crate::cmd_refresh::CmdRefresh;
use crate::cmd_service::{CmdServiceAdd, CmdServiceList};
use crate::config::parse_config;

/// Run the davsync command-line interface.
pub async fn run() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse() {
        Ok(cli) => {
            if let Err(e) = cli.run().await {
                println!("{} {}", "Error:".red(), e);
            }
        }
        Err(e) => println!("{} {}", "Error:".red(), e),
    }
    Ok(())
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Discover and track the collections of CalDAV/CardDAV services.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $XDG_CONFIG_HOME/davsync/config.toml on Linux and \
MacOS, %LOCALAPPDATA%/davsync/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .subcommand(
                Command::new("service")
                    .alias("s")
                    .about("Manage registered services")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdServiceAdd::command())
                    .subcommand(CmdServiceList::command()),
            )
            .subcommand(CmdRefresh::command())
            .subcommand(CmdCollections::command())
            .subcommand(CmdSelect::command())
            .subcommand(CmdReadOnly::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(&matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(&matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::*;
        let command = match matches.subcommand() {
            Some(("service", matches)) => match matches.subcommand() {
                Some((CmdServiceAdd::NAME, matches)) => ServiceAdd(CmdServiceAdd::from(matches)),
                Some((CmdServiceList::NAME, _)) => ServiceList(CmdServiceList),
                _ => unreachable!(),
            },
            Some((CmdRefresh::NAME, matches)) => Refresh(CmdRefresh::from(matches)),
            Some((CmdCollections::NAME, matches)) => Collections(CmdCollections::from(matches)),
            Some((CmdSelect::NAME, matches)) => Select(CmdSelect::from(matches)),
            Some((CmdReadOnly::NAME, matches)) => ReadOnly(CmdReadOnly::from(matches)),
            _ => return Err("No command given".into()),
        };

        let config = matches.get_one("config").cloned();
        Ok(Cli { config, command })
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Register a service
    ServiceAdd(CmdServiceAdd),

    /// List registered services
    ServiceList(CmdServiceList),

    /// Rediscover the collections of a service
    Refresh(CmdRefresh),

    /// List the home-sets and collections of a service
    Collections(CmdCollections),

    /// Select a collection for sync
    Select(CmdSelect),

    /// Force a collection to be read-only
    ReadOnly(CmdReadOnly),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        match self {
            ServiceAdd(a)  => Self::run_with(config, |x| a.run(x).boxed()).await,
            ServiceList(a) => Self::run_with(config, |x| a.run(x).boxed()).await,
            Refresh(a)     => Self::run_with(config, |x| a.run(x).boxed()).await,
            Collections(a) => Self::run_with(config, |x| a.run(x).boxed()).await,
            Select(a)      => Self::run_with(config, |x| a.run(x).boxed()).await,
            ReadOnly(a)    => Self::run_with(config, |x| a.run(x).boxed()).await,
        }
    }

    async fn run_with<F>(config: Option<PathBuf>, f: F) -> Result<(), Box<dyn Error>>
    where
        F: for<'a> FnOnce(&'a DavSync) -> BoxFuture<'a, Result<(), Box<dyn Error>>>,
    {
        tracing::debug!("parsing configuration...");
        let core_config = parse_config(config).await?;
        let davsync = DavSync::new(core_config).await?;

        let result = f(&davsync).await;

        davsync.close().await?;
        result
    }
}
