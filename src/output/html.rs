//! HTML report output.
//!
//! Reports are named after the log date. The report file doubles as the
//! "already processed" marker, so it only appears once fully written.

use super::validate_path;
use crate::aggregator::ReportRow;
use crate::utils::config::TABLE_PLACEHOLDER;
use crate::utils::error::OutputError;
use chrono::NaiveDate;
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Path of the report for a given log date
pub fn report_path(report_dir: &Path, date: NaiveDate) -> PathBuf {
    report_dir.join(format!("report-{}.html", date.format("%Y-%m-%d")))
}

/// Whether the report for `date` has already been produced
pub fn report_exists(report_dir: &Path, date: NaiveDate) -> bool {
    report_path(report_dir, date).is_file()
}

/// Read the report template
///
/// # Errors
/// * `OutputError::TemplateUnreadable` - File missing or unreadable
/// * `OutputError::MissingPlaceholder` - No `$table_json` in the template
pub fn load_template(path: &Path) -> Result<String, OutputError> {
    debug!("Loading report template from: {}", path.display());

    let template =
        std::fs::read_to_string(path).map_err(|source| OutputError::TemplateUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

    if !template.contains(TABLE_PLACEHOLDER) {
        return Err(OutputError::MissingPlaceholder(path.to_path_buf()));
    }

    Ok(template)
}

/// Substitute the rows, as a JSON array, into the template
///
/// URLs come straight from the log, so `<`, `>` and `&` are written as JSON
/// unicode escapes. The table then cannot close the surrounding `<script>`.
pub fn render_report(template: &str, rows: &[ReportRow]) -> Result<String, OutputError> {
    let table_json = serde_json::to_string(rows).map_err(OutputError::SerializationFailed)?;
    Ok(template.replace(TABLE_PLACEHOLDER, &escape_for_script(&table_json)))
}

/// Escape HTML-significant characters inside serialized JSON
///
/// These characters only occur inside JSON strings, where `\u003c` and friends
/// decode back to the same text.
fn escape_for_script(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Write a rendered report atomically
///
/// **Public** - main entry point for report output
///
/// Content goes to a temporary file next to `output_path` and is renamed into
/// place, so readers never observe a partial report.
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
/// * `OutputError::WriteFailed` - I/O error during write or rename
pub fn write_report(content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_path(output_path)?;

    let parent = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if !parent.exists() {
        debug!("Creating report directory: {}", parent.display());
        std::fs::create_dir_all(parent).map_err(|e| {
            OutputError::InvalidPath(format!(
                "Cannot create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut tmp = NamedTempFile::new_in(parent).map_err(OutputError::WriteFailed)?;
    tmp.write_all(content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    tmp.flush().map_err(OutputError::WriteFailed)?;

    tmp.persist(output_path)
        .map_err(|e| OutputError::WriteFailed(e.error))?;

    info!("Report written successfully ({} bytes)", content.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(url: &str) -> ReportRow {
        ReportRow {
            url: url.to_string(),
            count: 2,
            count_perc: 100.0,
            time_sum: 0.4,
            time_perc: 100.0,
            time_max: 0.3,
            time_avg: 0.2,
            time_med: 0.1,
        }
    }

    #[test]
    fn test_report_path_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2018, 3, 25).unwrap();
        assert_eq!(
            report_path(Path::new("./reports"), date),
            PathBuf::from("./reports/report-2018-03-25.html")
        );
    }

    #[test]
    fn test_report_exists() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2018, 3, 25).unwrap();

        assert!(!report_exists(dir.path(), date));
        std::fs::write(report_path(dir.path(), date), "done").unwrap();
        assert!(report_exists(dir.path(), date));
    }

    #[test]
    fn test_render_report_substitutes_json() {
        let html = render_report("<script>var table = $table_json;</script>", &[row("/a")]).unwrap();
        assert_eq!(
            html,
            r#"<script>var table = [{"url":"/a","count":2,"count_perc":100.0,"time_sum":0.4,"time_perc":100.0,"time_max":0.3,"time_avg":0.2,"time_med":0.1}];</script>"#
        );
    }

    #[test]
    fn test_escape_for_script() {
        assert_eq!(
            escape_for_script(r#"{"url":"/a?x=1&y=<b>"}"#),
            r#"{"url":"/a?x=1\u0026y=\u003cb\u003e"}"#
        );
    }

    #[test]
    fn test_render_empty_report() {
        assert_eq!(render_report("t=$table_json", &[]).unwrap(), "t=[]");
    }

    #[test]
    fn test_load_template_requires_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        std::fs::write(&path, "<html></html>").unwrap();

        assert!(matches!(
            load_template(&path),
            Err(OutputError::MissingPlaceholder(_))
        ));
    }

    #[test]
    fn test_load_template_missing() {
        assert!(matches!(
            load_template(Path::new("/no/such/template.html")),
            Err(OutputError::TemplateUnreadable { .. })
        ));
    }

    #[test]
    fn test_write_report_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report-2018-03-25.html");

        write_report("<html>ok</html>", &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html>ok</html>");
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_write_report_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_report("x", dir.path()).is_err());
    }
}
