//! Pick the newest dated access log in a directory.
//!
//! Log names carry their date after the last dash, e.g.
//! `nginx-access-ui.log-20170630` or `nginx-access-ui.log-20170630.gz`.

use crate::utils::error::InputError;
use chrono::NaiveDate;
use log::debug;
use std::path::{Path, PathBuf};

/// The log chosen for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub path: PathBuf,
    pub date: NaiveDate,
}

/// Date encoded in a log file name, if any
pub fn parse_log_date(file_name: &str) -> Option<NaiveDate> {
    let stem = file_name.strip_suffix(".gz").unwrap_or(file_name);
    let (_, suffix) = stem.rsplit_once('-')?;

    if suffix.len() != 8 || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    NaiveDate::parse_from_str(suffix, "%Y%m%d").ok()
}

/// Select the name with the greatest date
///
/// Undated names never win. Equal dates fall back to the greater name so the
/// choice does not depend on directory order.
pub fn select_latest_log<I, S>(names: I) -> Option<(S, NaiveDate)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| parse_log_date(name.as_ref()).map(|date| (name, date)))
        .max_by(|(a_name, a_date), (b_name, b_date)| {
            let (a_name, b_name): (&str, &str) = (a_name.as_ref(), b_name.as_ref());
            a_date.cmp(b_date).then_with(|| a_name.cmp(b_name))
        })
}

/// Find the newest log in `log_dir`
///
/// **Public** - used by the analyze command
///
/// # Returns
/// `Ok(None)` when the directory holds no dated log
///
/// # Errors
/// * `InputError::LogDirMissing` - Directory does not exist
/// * `InputError::Io` - Directory cannot be listed
pub fn find_latest_log(log_dir: &Path) -> Result<Option<LogFile>, InputError> {
    if !log_dir.is_dir() {
        return Err(InputError::LogDirMissing(log_dir.to_path_buf()));
    }

    let io_err = |source| InputError::Io {
        path: log_dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(log_dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => debug!("Skipping non UTF-8 file name {:?}", raw),
        }
    }

    debug!("Found {} files in {}", names.len(), log_dir.display());

    Ok(select_latest_log(names).map(|(name, date)| LogFile {
        path: log_dir.join(name),
        date,
    }))
}
