mod config;

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Result, WrapErr, eyre};
use ddf_parse::things::TAG as THINGS_TAG;
use ddf_parse::{Diagnostics, ReadInfo, ThingDb, ThingParser, peek_tag, read_ddf};
use ddf_types::MobjType;
use log::LevelFilter;

use crate::config::{LOCAL_CONFIG, Loader, Settings};

/// Read DDF files in order, report what they define and anything wrong
/// with them.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// DDF files, read in the order given.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Settings file layered over the built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat warn-errors and obsolete notices as fatal.
    #[arg(long, conflicts_with = "lax")]
    strict: bool,

    /// Downgrade lax errors to warnings.
    #[arg(long)]
    lax: bool,

    /// Don't collect warnings.
    #[arg(short, long)]
    quiet: bool,

    /// Print every thing read, as JSON.
    #[arg(long)]
    dump: bool,

    /// More logging; repeat for more.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut loader = match &cli.config {
        Some(path) => Loader::new().with_file(path, true),
        None => Loader::new().with_file(LOCAL_CONFIG, false),
    };
    if cli.strict {
        loader = loader.set_override("policy.strict_errors", true)?;
    }
    if cli.lax {
        loader = loader.set_override("policy.lax_errors", true)?;
    }
    if cli.quiet {
        loader = loader.set_override("policy.no_warnings", true)?;
    }
    loader.build().wrap_err("loading settings")
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let settings = load_settings(&cli)?;
    log::debug!("{settings:?}");

    let mut things = ThingDb::new();
    let mut warnings = 0;
    for path in &cli.files {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading {}", path.display()))?;
        let source = path.display().to_string();
        let tag = peek_tag(&text).ok_or_else(|| eyre!("{source}: file must start with a tag"))?;

        let report = match tag.as_str() {
            THINGS_TAG => {
                let info = ReadInfo {
                    message: Some("Loading things"),
                    engine_version: settings.engine.version,
                    ..ReadInfo::new(THINGS_TAG, &source)
                };
                let mut parser = ThingParser::new(&mut things);
                read_ddf(&text, &info, &mut parser, settings.policy)?
            }
            other => {
                log::warn!("{source}: no reader for <{other}> files, skipped");
                continue;
            }
        };
        warnings += report.warnings.len();
        for w in &report.warnings {
            println!("{w}");
        }
        println!("{source}: {} entries", report.entries);
    }

    let mut diag = Diagnostics::new(THINGS_TAG, settings.policy);
    things.link_references(&mut diag)?;
    for w in diag.take_warnings() {
        warnings += 1;
        println!("{w}");
    }

    let active: Vec<&MobjType> = things.things.active().collect();
    println!(
        "{} things ({} hidden by #CLEARALL), {} sprites, {warnings} warnings",
        active.len(),
        things.things.disabled_count(),
        things.names.sprites.len().saturating_sub(1),
    );
    if cli.dump {
        println!("{}", serde_json::to_string_pretty(&active)?);
    }
    Ok(())
}
