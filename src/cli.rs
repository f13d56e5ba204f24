//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(
    name = "noble-quran",
    version,
    about = "Terminal Quran reader with recitation playback",
    long_about = "Read the Quran by chapter, juz, or ruku with Urdu and English \
                  translations, and listen to verse-by-verse recitation.\n\n\
                  Run `fetch` once to download the content file."
)]
pub struct Cli {
    /// Command to run; the reader starts when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Content file to read (default: ~/.noble-quran/quran_full.json).
    #[arg(long, value_name = "PATH", global = true)]
    pub content: Option<PathBuf>,

    /// Preferences database (default: ~/.noble-quran/preferences.sqlite).
    #[arg(long, value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    #[arg(long = "log-level", value_enum, default_value = "info", global = true)]
    pub log_level: LogLevelArg,

    /// Write logs to a file. The reader always logs to a file.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Read)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Open the interactive reader.
    Read,

    /// Download the upstream editions and write the content file.
    Fetch(FetchArgs),

    /// Strip the leading bismillah from first verses of an existing file.
    StripBismillah {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct FetchArgs {
    /// Output path (default: the content file path).
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Leave the bismillah inside the first verses.
    #[arg(long = "keep-bismillah")]
    pub keep_bismillah: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for Level {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Level::ERROR,
            LogLevelArg::Warn => Level::WARN,
            LogLevelArg::Info => Level::INFO,
            LogLevelArg::Debug => Level::DEBUG,
            LogLevelArg::Trace => Level::TRACE,
        }
    }
}
