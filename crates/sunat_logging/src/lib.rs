//! Shared logging setup for the SUNAT organizer binaries.
//!
//! Installs a `tracing` subscriber with two layers: a size-rotated log file
//! under `<home>/logs` and a console layer on stderr. Per-run packaging
//! reports are not written here; those live in `sunat_scout::ActionLog`.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DEFAULT_LOG_FILTER: &str = "sunat=info,sunat_scout=info";
const MAX_LOG_FILES: usize = 5;
const MAX_LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Logging configuration for one binary invocation.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    /// Mirror the file filter on the console instead of the default.
    pub verbose: bool,
    /// Keep the console down to warnings (used when stdout carries JSON).
    pub quiet_console: bool,
}

/// Initialize tracing with a rotating file writer and stderr output.
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let log_dir = ensure_logs_dir().context("Failed to ensure log directory")?;
    let file_writer = SharedRotatingWriter::open(&log_dir, config.app_name)
        .context("Failed to initialize rotating log writer")?;

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let console_filter = if config.quiet_console {
        EnvFilter::new("warn")
    } else if config.verbose {
        file_filter.clone()
    } else {
        EnvFilter::new("warn,sunat=info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(console_filter),
        )
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(())
}

/// Home directory for config and logs.
///
/// Priority:
/// 1) SUNAT_HOME
/// 2) the user's home directory + `.sunat`
/// 3) ./.sunat
pub fn sunat_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("SUNAT_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .map(|home| home.join(".sunat"))
        .unwrap_or_else(|| PathBuf::from(".").join(".sunat"))
}

/// Logs directory: <home>/logs
pub fn logs_dir() -> PathBuf {
    sunat_home().join("logs")
}

/// Default config file: <home>/config.toml
pub fn default_config_path() -> PathBuf {
    sunat_home().join("config.toml")
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

/// Append-only log file that rolls over to `<name>.log.N` past a size cap.
struct SizeRotatingFile {
    dir: PathBuf,
    base_name: String,
    keep: usize,
    max_size: u64,
    file: Option<File>,
    written: u64,
}

impl SizeRotatingFile {
    fn open(dir: &Path, base_name: &str, keep: usize, max_size: u64) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let mut rotating = Self {
            dir: dir.to_path_buf(),
            base_name: sanitize_name(base_name),
            keep: keep.max(1),
            max_size,
            file: None,
            written: 0,
        };
        rotating.reopen()?;
        if rotating.written > rotating.max_size {
            rotating.roll()?;
        }
        Ok(rotating)
    }

    fn active_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.base_name))
    }

    fn archived_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.log.{}", self.base_name, index))
    }

    fn reopen(&mut self) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.active_path())?;
        self.written = file.metadata()?.len();
        self.file = Some(file);
        Ok(())
    }

    fn roll(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }

        // keep == 1 means only the active file survives.
        let last = self.keep - 1;
        if last == 0 {
            let active = self.active_path();
            if active.exists() {
                fs::remove_file(active)?;
            }
            return self.reopen();
        }

        let oldest = self.archived_path(last);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..last).rev() {
            let from = self.archived_path(index);
            if from.exists() {
                fs::rename(&from, self.archived_path(index + 1))?;
            }
        }
        let active = self.active_path();
        if active.exists() {
            fs::rename(active, self.archived_path(1))?;
        }
        self.reopen()
    }
}

impl Write for SizeRotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_size {
            self.roll()?;
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file unavailable"))?;
        let n = file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// `MakeWriter` handle shared by every tracing event.
#[derive(Clone)]
struct SharedRotatingWriter {
    inner: Arc<Mutex<SizeRotatingFile>>,
}

impl SharedRotatingWriter {
    fn open(dir: &Path, app_name: &str) -> Result<Self> {
        let file = SizeRotatingFile::open(dir, app_name, MAX_LOG_FILES, MAX_LOG_FILE_SIZE)
            .with_context(|| format!("Failed to open log file for {}", app_name))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(file)),
        })
    }
}

struct WriterGuard {
    inner: Arc<Mutex<SizeRotatingFile>>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedRotatingWriter {
    type Writer = WriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        WriterGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Write for WriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?
            .flush()
    }
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}
