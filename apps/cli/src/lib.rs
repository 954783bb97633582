//! # Census Loader CLI
//!
//! Command-line front end that runs the registry, site-config and data loads
//! against an in-memory store and prints what was stored as JSON.
//!
//! Logs go to stderr (and optionally to a rolling file); stdout only ever
//! carries the JSON result.

use anyhow::Context;
use census_domain::Model;
use census_kernel::config::ConfigResolver;
use census_loader::{DataLoad, Loader};
use census_sheets::{SheetSource, TabularSource};
use census_store::MemoryStore;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

const READ_ONLY_KEY: &str = "appconfig.readonly";

/// The `census-loader` command line.
#[derive(Debug, Parser)]
#[command(name = "census-loader")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Loads Open Data Census sheets into a store")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Settings file layered over the built-in defaults
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Directory holding the `submit.md` and `review.md` pages
    #[arg(long, global = true, value_name = "DIR")]
    pub pages: Option<PathBuf>,

    /// Also write rolling log files into this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Write the log file as JSON lines
    #[arg(long, global = true, requires = "log_dir")]
    pub json_logs: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the registry sheet and print its entries
    Registry,
    /// Load the registry, then the config sheet of one site
    Site {
        /// Census identifier of the site
        id: String,
    },
    /// Load the registry, the site config, then one data sheet
    Data {
        /// Census identifier of the site
        id: String,

        /// Site setting holding the sheet locator (e.g., `entries`)
        #[arg(long)]
        setting: String,

        /// Model the rows are stored as
        #[arg(long)]
        model: Model,

        /// Nest `field@locale` columns under `translations`
        #[arg(long)]
        translated: bool,

        /// Identity fields of the stored records, repeatable (default: `site` and `id`)
        #[arg(long = "key", value_name = "FIELD")]
        keys: Vec<String>,
    },
}

impl GlobalArgs {
    /// Builds the configuration resolver from the settings file, the pages
    /// directory and the `CENSUS__*` environment.
    ///
    /// # Errors
    /// Fails if the settings file or a page cannot be read, or the merged
    /// configuration is malformed.
    pub fn resolver(&self) -> anyhow::Result<ConfigResolver> {
        let mut builder = ConfigResolver::builder();
        if let Some(file) = &self.settings {
            builder = builder.file(file);
        }
        if let Some(pages) = &self.pages {
            builder = builder.pages(pages);
        }
        builder.build().context("Configuration is malformed")
    }
}

/// Runs `command` with `config` and writes the stored documents to `out`.
///
/// # Errors
/// Propagates the first load failure, or an output error.
pub async fn execute<F, W>(
    command: &Command,
    source: F,
    config: ConfigResolver,
    out: &mut W,
) -> anyhow::Result<()>
where
    F: TabularSource,
    W: Write,
{
    let read_only = config.get::<bool>(READ_ONLY_KEY)?.unwrap_or(false);
    let mut builder = MemoryStore::builder().read_only(read_only);
    if let Command::Data { model, keys, .. } = command
        && !keys.is_empty()
    {
        // Stored field names are lower-cased.
        builder = builder.key(*model, keys.iter().map(|key| key.to_lowercase()));
    }
    let store = Arc::new(builder.build());
    let loader = Loader::new(source, Arc::clone(&store), config);

    loader.load_registry().await.context("Registry load failed")?;

    match command {
        Command::Registry => print(out, &store.documents(Model::Registry)),
        Command::Site { id } => {
            let site = loader.load_config(id).await.with_context(|| format!("Config load failed for '{id}'"))?;
            print(out, &site)
        },
        Command::Data { id, setting, model, translated, .. } => {
            loader.load_config(id).await.with_context(|| format!("Config load failed for '{id}'"))?;

            let options = DataLoad::new(id.as_str(), setting.as_str(), *model);
            if *translated {
                loader.load_translated_data(&options).await
            } else {
                loader.load_data(&options).await
            }
            .with_context(|| format!("Loading '{setting}' for '{id}' failed"))?;
            debug!(%model, "Printing stored records");

            print(out, &store.documents(*model))
        },
    }
}

/// Builds the HTTP source and configuration for `cli`, then runs its command.
///
/// # Errors
/// See [`GlobalArgs::resolver`] and [`execute`].
pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.global.resolver()?;
    let source = SheetSource::new().context("HTTP client could not be created")?;
    execute(&cli.command, source, config, &mut std::io::stdout().lock()).await
}

fn print<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
