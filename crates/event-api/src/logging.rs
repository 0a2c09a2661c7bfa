//! Log file lifecycle and tracing setup.
//!
//! Each process run appends to its own file, `Logs_<n>.log`, where `n` is
//! one more than the number of entries already in the log directory. The
//! file is opened once at startup and closed at shutdown; it is never
//! rotated while the process runs.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// The log file for this process.
pub struct LogFile {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl LogFile {
    /// Create `dir` if needed and open the next `Logs_<n>.log` in it.
    pub fn open(dir: &Path) -> AppResult<Self> {
        fs::create_dir_all(dir)?;
        let existing = fs::read_dir(dir)?.count();
        let path = dir.join(format!("Logs_{}.log", existing + 1));

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file: Arc::new(Mutex::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A cloneable handle that appends to this file.
    pub fn writer(&self) -> LogWriter {
        LogWriter(self.file.clone())
    }

    /// Flush and sync the file. Writers still held elsewhere keep working
    /// until they are dropped, but nothing is buffered past this point.
    pub fn close(self) -> AppResult<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| AppError::Internal("log file lock poisoned".to_string()))?;
        file.flush()?;
        file.sync_all()?;
        Ok(())
    }
}

/// Appending handle to a [`LogFile`].
#[derive(Clone)]
pub struct LogWriter(Arc<Mutex<File>>);

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?
            .flush()
    }
}

/// Install the global subscriber: colored output on stdout and plain
/// timestamped lines in the log file.
pub fn init_tracing(log_file: &LogFile) -> AppResult<()> {
    let writer = log_file.writer();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,eventboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(move || writer.clone()),
        )
        .try_init()
        .map_err(|e| AppError::Internal(format!("Failed to install tracing subscriber: {}", e)))
}
