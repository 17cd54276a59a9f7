// SPDX-License-Identifier: MIT
//
// gim: a small modal terminal text editor.
//
// Wiring only: parse arguments, set up file logging, read the rc file and
// colorscheme, open the session, and hand it to the terminal event loop.
// All editing behavior lives in `gim-editor`.

mod config;

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gim_editor::Session;
use gim_editor::storage::FsStorage;
use gim_term::event_loop::EventLoop;
use gim_term::terminal;
use gim_theme::Theme;

use crate::config::Config;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "GIM_LOG";

/// A small modal terminal text editor.
#[derive(Parser, Debug)]
#[command(name = "gim", version, about, long_about = None)]
struct Args {
    /// File to edit. Created on first write if it does not exist.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write logs here. The terminal is in raw mode, so logs never go to
    /// stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// rc file to read instead of ~/.govimrc.
    #[arg(long, value_name = "PATH")]
    rc: Option<PathBuf>,
}

impl Args {
    const fn default_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Logging is on when asked for by flag or environment.
    fn log_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.log_file {
            return Some(path.clone());
        }
        if self.verbose == 0 && std::env::var_os(LOG_ENV).is_none() {
            return None;
        }
        let dir = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
        Some(dir.join("gim").join("gim.log"))
    }
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let Some(path) = args.log_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(args.default_level()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting gim");
    Ok(())
}

/// The configured colorscheme, or `None`. Problems are logged, never fatal.
fn load_theme(rc: Option<&Path>) -> Option<Theme> {
    let rc_path = match rc {
        Some(path) => path.to_path_buf(),
        None => match Config::default_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "skipping rc file");
                return None;
            }
        },
    };

    let loaded = Config::load_from(&rc_path).and_then(|config| {
        let colors = Config::default_colors_dir()?;
        config.load_theme(&colors)
    });
    loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "running without a colorscheme");
        None
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    if !terminal::is_tty() {
        bail!("gim needs an interactive terminal");
    }

    let theme = load_theme(args.rc.as_deref());

    let mut event_loop = EventLoop::new();
    let size = event_loop.size();
    let storage = FsStorage::new();
    let mut session = match args.file {
        Some(path) => Session::open(storage, path, size),
        None => Session::new(storage, size),
    };
    if let Some(theme) = theme {
        session = session.with_theme(theme);
    }

    event_loop.run(&mut session).context("terminal I/O failed")?;
    tracing::info!("exiting");
    Ok(())
}
