//! Binary entry point. Parses the command line, sets up logging, and either
//! launches the reader or runs one of the offline prep commands.
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use noble_quran::audio::RodioSink;
use noble_quran::cli::{Cli, Command, FetchArgs};
use noble_quran::config::AppPaths;
use noble_quran::db::open_preferences;
use noble_quran::logging::{init_logging, LogConfig};
use noble_quran::prep::{run_fetch, run_strip, FetchOptions, UpstreamClient};
use noble_quran::{run_app, App, ContentIndex};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.resolved_command();

    let paths = match AppPaths::discover() {
        Ok(paths) => paths.with_overrides(
            cli.content.as_deref(),
            cli.db.as_deref(),
            cli.log_file.as_deref(),
        ),
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    // the reader owns the terminal, so its logs always go to a file
    let log_file = match command {
        Command::Read => Some(paths.log_file.clone()),
        _ => cli.log_file.clone(),
    };
    let log_config = LogConfig::default()
        .with_level(cli.log_level.into())
        .with_log_file(log_file);
    if let Err(err) = init_logging(&log_config) {
        eprintln!("warning: logging disabled: {err}");
    }

    let result = match command {
        Command::Read => read(&paths),
        Command::Fetch(args) => fetch(&paths, &args),
        Command::StripBismillah { file } => strip(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize persistence, load the content file, and drive the event loop.
fn read(paths: &AppPaths) -> Result<()> {
    let conn = open_preferences(&paths.preferences)?;
    let content = ContentIndex::load(&paths.content);
    let sink = RodioSink::spawn().context("failed to start audio thread")?;

    let mut app = App::new(conn, content, Box::new(sink))?;
    info!(content = %paths.content.display(), "reader started");
    run_app(&mut app)
}

fn fetch(paths: &AppPaths, args: &FetchArgs) -> Result<()> {
    let options = FetchOptions {
        out: args.out.clone().unwrap_or_else(|| paths.content.clone()),
        keep_bismillah: args.keep_bismillah,
    };
    if options.keep_bismillah {
        warn!("keeping bismillah inside first verses");
    }
    let client = UpstreamClient::new()?;
    let summary = run_fetch(&client, &options)?;
    println!(
        "Wrote {} chapters, {} verses to {}",
        summary.chapters,
        summary.verses,
        options.out.display()
    );
    Ok(())
}

fn strip(file: &Path) -> Result<()> {
    let count = run_strip(file)?;
    println!("Stripped the bismillah from {count} first verses in {}", file.display());
    Ok(())
}
