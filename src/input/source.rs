//! Line source over plain or gzip-compressed log files.

use crate::utils::error::InputError;
use flate2::read::MultiGzDecoder;
use log::debug;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Lazy, forward-only sequence of log lines
///
/// The underlying file is closed when this value is dropped.
pub struct LogLines {
    reader: Box<dyn BufRead>,
    buf: Vec<u8>,
}

impl LogLines {
    /// Wrap any buffered reader
    pub fn from_reader(reader: impl BufRead + 'static) -> Self {
        Self {
            reader: Box::new(reader),
            buf: Vec::new(),
        }
    }
}

impl Iterator for LogLines {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Open a log file for streaming
///
/// **Public** - main entry point for log input
///
/// Files ending in `.gz` are decompressed on the fly.
///
/// # Errors
/// * `InputError::Io` - File cannot be opened
pub fn open_log(path: &Path) -> Result<LogLines, InputError> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if is_gzip(path) {
        debug!("Opening {} as gzip", path.display());
        Ok(LogLines::from_reader(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        debug!("Opening {} as plain text", path.display());
        Ok(LogLines::from_reader(BufReader::new(file)))
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}
