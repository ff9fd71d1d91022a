//! Append-only CSV output with daily file rotation.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Datelike, Local};
use tracing::debug;

use crate::error::DeskwatchResult;

/// Writes rows to `data_YYYYMMDD.csv` files under a directory.
///
/// Files are opened in append mode and get a header row only when empty,
/// so restarts within the same day keep appending to the same file.
/// Rotation happens from [`CsvWriter::flush_or_rotate`], which the owner
/// is expected to call on every idle tick.
pub struct CsvWriter {
    dir: PathBuf,
    columns: &'static [&'static str],
    file: Option<File>,
    last_create: Option<DateTime<Local>>,
}

impl CsvWriter {
    pub fn new(dir: impl Into<PathBuf>, columns: &'static [&'static str]) -> DeskwatchResult<Self> {
        let mut writer = Self {
            dir: dir.into(),
            columns,
            file: None,
            last_create: None,
        };
        fs::create_dir_all(&writer.dir)?;
        writer.create_file()?;
        Ok(writer)
    }

    /// Append one row. The row must have one field per column.
    ///
    /// A failed write recreates the file once and retries, in case the
    /// file was removed or the handle went stale underneath us.
    pub fn write(&mut self, row: &[&str]) -> DeskwatchResult<()> {
        debug_assert_eq!(row.len(), self.columns.len());
        if self.write_record(row).is_err() {
            self.create_file()?;
            self.write_record(row)?;
        }
        Ok(())
    }

    /// Rotate to a fresh file if the calendar day changed, otherwise flush.
    pub fn flush_or_rotate(&mut self) -> DeskwatchResult<()> {
        let Some(created) = self.last_create else {
            return Ok(());
        };
        let now = Local::now();
        if now.day() != created.day() {
            self.create_file()?;
        } else if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    pub fn close(&mut self) -> DeskwatchResult<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }

    /// Path of the file currently being written.
    pub fn current_path(&self) -> Option<PathBuf> {
        self.last_create
            .map(|created| self.file_path_for(created))
    }

    fn file_path_for(&self, created: DateTime<Local>) -> PathBuf {
        self.dir
            .join(format!("data_{}.csv", created.format("%Y%m%d")))
    }

    fn create_file(&mut self) -> DeskwatchResult<()> {
        self.close()?;

        let created = Local::now();
        let path = self.file_path_for(created);
        let mut file = OpenOptions::new().append(true).create(true).open(&path)?;
        debug!(path = %path.display(), "opened csv file");

        if file.metadata()?.len() == 0 {
            write_row(&mut file, self.columns)?;
        }
        self.file = Some(file);
        self.last_create = Some(created);
        Ok(())
    }

    fn write_record(&mut self, row: &[&str]) -> std::io::Result<()> {
        match self.file.as_mut() {
            Some(file) => write_row(file, row),
            None => Err(std::io::Error::other("csv file is closed")),
        }
    }
}

fn write_row(file: &mut File, fields: &[&str]) -> std::io::Result<()> {
    let line = fields.iter().map(|f| escape(f)).collect::<Vec<_>>().join(",");
    writeln!(file, "{line}")
}

/// Quote a field if it contains the delimiter, a quote, or a line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
