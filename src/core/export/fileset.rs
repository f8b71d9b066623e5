//! Versioned export file naming
//!
//! Every file of a run is named `<prefix>_<dateStamp>_<runSeq>.<ext>`. The
//! run sequence is one more than the number of files already in the working
//! directory with the same prefix, date stamp and extension, or the next free
//! number after that when it is taken. It is computed when the file is about
//! to be written, never cached, so the three files of a run can end up with
//! different sequence numbers.

use crate::config::ExportConfig;
use crate::domain::{MailshiftError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// The three files of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Core attributes table
    Attributes,
    /// Routing addresses table
    Proxies,
    /// Run status log
    RunLog,
}

impl FileKind {
    /// Filename extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Attributes | FileKind::Proxies => "csv",
            FileKind::RunLog => "txt",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileKind::Attributes => "attributes",
            FileKind::Proxies => "proxies",
            FileKind::RunLog => "run log",
        })
    }
}

/// Naming scheme of one run's export files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFileSet {
    directory: PathBuf,
    date_stamp: String,
    attributes_prefix: String,
    proxies_prefix: String,
    log_prefix: String,
}

impl ExportFileSet {
    /// Builds the file set for a run on `date`
    ///
    /// # Errors
    ///
    /// Returns `MailshiftError::Configuration` if `date_format` cannot render `date`.
    pub fn from_config(config: &ExportConfig, date: NaiveDate) -> Result<Self> {
        Ok(Self {
            directory: PathBuf::from(&config.working_directory),
            date_stamp: date_stamp(date, &config.date_format)?,
            attributes_prefix: config.attributes_prefix.clone(),
            proxies_prefix: config.proxies_prefix.clone(),
            log_prefix: config.log_prefix.clone(),
        })
    }

    /// Target directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Date stamp shared by the run's files
    pub fn date_stamp(&self) -> &str {
        &self.date_stamp
    }

    /// Filename prefix for `kind`
    pub fn prefix(&self, kind: FileKind) -> &str {
        match kind {
            FileKind::Attributes => &self.attributes_prefix,
            FileKind::Proxies => &self.proxies_prefix,
            FileKind::RunLog => &self.log_prefix,
        }
    }

    /// Creates the next file of `kind` and opens it for writing
    ///
    /// Starts at the counted sequence and moves past numbers that are already
    /// taken, so a gap left by a removed file never blocks later runs. An
    /// existing file is never opened.
    ///
    /// # Errors
    ///
    /// Returns `MailshiftError::Io` if the directory cannot be listed or the
    /// file cannot be created.
    pub fn create_next(&self, kind: FileKind) -> Result<(PathBuf, File)> {
        let mut sequence = self.count_existing(kind)? + 1;
        loop {
            let path = self.path_for(kind, sequence);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::debug!(path = %path.display(), "Run sequence taken");
                    sequence += 1;
                }
                Err(e) => {
                    return Err(MailshiftError::Io(format!("{}: {e}", path.display())));
                }
            }
        }
    }

    /// Path of the file of `kind` with run sequence `sequence`
    pub fn path_for(&self, kind: FileKind, sequence: usize) -> PathBuf {
        self.directory.join(format!(
            "{}_{}_{sequence}.{}",
            self.prefix(kind),
            self.date_stamp,
            kind.extension()
        ))
    }

    fn count_existing(&self, kind: FileKind) -> Result<usize> {
        let stem = format!("{}_{}_", self.prefix(kind), self.date_stamp);
        let suffix = format!(".{}", kind.extension());

        let entries = std::fs::read_dir(&self.directory).map_err(|e| {
            MailshiftError::Io(format!("{}: {e}", self.directory.display()))
        })?;

        let mut existing = 0;
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.len() > stem.len() + suffix.len()
                && name.starts_with(&stem)
                && name.ends_with(&suffix)
            {
                existing += 1;
            }
        }

        Ok(existing)
    }
}

/// Formats `date` with a chrono format string
///
/// # Errors
///
/// Returns `MailshiftError::Configuration` for an unusable format.
pub fn date_stamp(date: NaiveDate, format: &str) -> Result<String> {
    let mut stamp = String::new();
    write!(stamp, "{}", date.format(format)).map_err(|_| {
        MailshiftError::Configuration(format!("invalid date format '{format}'"))
    })?;

    if stamp.is_empty() {
        return Err(MailshiftError::Configuration(format!(
            "date format '{format}' produced an empty stamp"
        )));
    }
    Ok(stamp)
}
