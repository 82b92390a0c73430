use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::Level;

/// Destination for one formatted log record.
///
/// The terminal is in raw mode on the alternate screen while the desktop
/// runs, so stderr output would corrupt the display. Logs go to a file when
/// one is configured and are discarded otherwise.
pub enum DelegatingWriter<'a> {
    File(MutexGuard<'a, File>),
    Sink,
}

impl Write for DelegatingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            DelegatingWriter::File(f) => f.write(buf),
            DelegatingWriter::Sink => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            DelegatingWriter::File(f) => f.flush(),
            DelegatingWriter::Sink => Ok(()),
        }
    }
}

/// Hands each record the log file opened at startup, if any.
#[derive(Debug, Default)]
pub struct SubscriberMakeWriter {
    file: Option<Mutex<File>>,
}

impl SubscriberMakeWriter {
    /// Open `path` for appending, creating it if needed. `None` discards
    /// every record.
    pub fn open(path: Option<&Path>) -> io::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| {
                io::Error::new(
                    err.kind(),
                    format!("cannot open log file {}: {err}", path.display()),
                )
            })?;
        Ok(Self {
            file: Some(Mutex::new(file)),
        })
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        match &self.file {
            Some(file) => {
                DelegatingWriter::File(file.lock().unwrap_or_else(PoisonError::into_inner))
            }
            None => DelegatingWriter::Sink,
        }
    }
}

/// Install the global subscriber. With `log_file` set, records are appended
/// to that file; otherwise they are dropped. Later calls are no-ops once a
/// subscriber is installed, but an unopenable file is still an error.
pub fn init_default(log_file: Option<&Path>) -> io::Result<()> {
    let writer = SubscriberMakeWriter::open(log_file)?;
    let _ = tracing_subscriber::fmt()
        .compact()
        .with_max_level(Level::DEBUG)
        .with_writer(writer)
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(false)
        .try_init();
    Ok(())
}
