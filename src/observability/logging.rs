//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber from [`LoggingConfig`]
//! - Route records to stdout or an append-only log file
//! - Hand out a [`LogGuard`] that flushes and closes the sink at shutdown
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - Text format for terminals, JSON for machine parsing
//! - Records written after the guard is closed are dropped

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing::Dispatch;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use crate::config::schema::{LogFormat, LoggingConfig};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file {path}: {source}")]
    File { path: PathBuf, source: io::Error },

    #[error("invalid log filter: {0}")]
    Filter(String),

    #[error("logging already initialized: {0}")]
    Init(String),
}

enum Sink {
    Stdout,
    File(BufWriter<File>),
    Closed,
}

/// Writer shared by every formatting layer and the guard.
#[derive(Clone)]
struct SharedSink {
    inner: Arc<Mutex<Sink>>,
}

impl SharedSink {
    fn stdout() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Sink::Stdout)),
        }
    }

    fn file(path: &Path) -> Result<Self, LoggingError> {
        let open = || -> io::Result<File> {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            OpenOptions::new().create(true).append(true).open(path)
        };
        let file = open().map_err(|source| LoggingError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Sink::File(BufWriter::new(file)))),
        })
    }

    fn close(&self) {
        let mut sink = self.inner.lock();
        match &mut *sink {
            Sink::Stdout => {
                let _ = io::stdout().flush();
            }
            Sink::File(writer) => {
                let _ = writer.flush();
                *sink = Sink::Closed;
            }
            Sink::Closed => {}
        }
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut *self.inner.lock() {
            Sink::Stdout => io::stdout().write(buf),
            Sink::File(writer) => writer.write(buf),
            Sink::Closed => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.inner.lock() {
            Sink::Stdout => io::stdout().flush(),
            Sink::File(writer) => writer.flush(),
            Sink::Closed => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for SharedSink {
    type Writer = SharedSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Handle on the logging sink, released as the very last shutdown step.
#[derive(Clone, Default)]
pub struct LogGuard {
    sink: Option<SharedSink>,
}

impl LogGuard {
    /// Guard that owns nothing. Used when the subscriber is managed elsewhere.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Flush pending records and close the log file, if any.
    pub fn close(&self) {
        if let Some(sink) = &self.sink {
            sink.close();
        }
    }
}

impl std::fmt::Debug for LogGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogGuard")
            .field("active", &self.sink.is_some())
            .finish()
    }
}

/// Build a dispatcher for `config` without installing it.
///
/// The returned guard owns the same sink the dispatcher writes to.
pub fn build_logging(config: &LoggingConfig) -> Result<(Dispatch, LogGuard), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| LoggingError::Filter(e.to_string()))?;

    let sink = match &config.file {
        Some(path) => SharedSink::file(path)?,
        None => SharedSink::stdout(),
    };
    let ansi = config.file.is_none();

    let registry = tracing_subscriber::registry().with(filter);
    let dispatch = match config.format {
        LogFormat::Json => {
            Dispatch::new(registry.with(fmt::layer().json().with_writer(sink.clone())))
        }
        LogFormat::Text => Dispatch::new(
            registry.with(fmt::layer().with_ansi(ansi).with_writer(sink.clone())),
        ),
    };

    Ok((dispatch, LogGuard { sink: Some(sink) }))
}

/// Install the global subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<LogGuard, LoggingError> {
    let (dispatch, guard) = build_logging(config)?;
    tracing::dispatcher::set_global_default(dispatch)
        .map_err(|e| LoggingError::Init(e.to_string()))?;
    Ok(guard)
}
