//! Export table writers
//!
//! Both tables are RFC 4180 CSV with a header row, written even when there
//! are no accounts. Every file is newly created; an existing file is never
//! opened. Rows reach the file whole: when a write fails the file is cut
//! back to the end of the last complete row before the error is returned.

use super::fileset::{ExportFileSet, FileKind};
use crate::core::transform::ProxyTable;
use crate::core::verification::calculate_checksum_bytes;
use crate::domain::{AttributeRow, MailshiftError, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A file written by the export writer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub kind: FileKind,
    pub path: PathBuf,

    /// Data rows, excluding the header
    pub rows: usize,

    /// Hex SHA-256 of the file contents
    pub sha256: String,
}

/// Writes a run's files into its file set
pub struct ExportWriter<'a> {
    files: &'a ExportFileSet,
}

impl<'a> ExportWriter<'a> {
    /// Creates a writer for `files`
    pub fn new(files: &'a ExportFileSet) -> Self {
        Self { files }
    }

    /// Writes the attributes table in one batch
    ///
    /// The table is encoded in memory and handed to the file as a single
    /// unit, so a failure leaves an empty file rather than a partial table.
    ///
    /// # Errors
    ///
    /// Returns `MailshiftError::Io` if the target cannot be created or written.
    pub fn write_attributes(&self, rows: &[AttributeRow]) -> Result<WrittenFile> {
        let mut csv = csv_writer(Vec::new());
        csv.write_record(AttributeRow::HEADER)?;
        for row in rows {
            csv.serialize(row)?;
        }
        let bytes = csv
            .into_inner()
            .map_err(|e| MailshiftError::Serialization(e.to_string()))?;

        let (path, file) = self.files.create_next(FileKind::Attributes)?;
        let mut sink = RowSink::new(file);
        sink.append(&bytes).map_err(|e| io_error(&path, e))?;
        sink.into_inner().sync_all().map_err(|e| io_error(&path, e))?;

        tracing::info!(path = %path.display(), rows = rows.len(), "Attributes table written");

        Ok(WrittenFile {
            kind: FileKind::Attributes,
            path,
            rows: rows.len(),
            sha256: calculate_checksum_bytes(&bytes),
        })
    }

    /// Writes the proxies table row by row
    ///
    /// Each row is encoded on its own and appended whole; a failure leaves
    /// only complete rows behind.
    ///
    /// # Errors
    ///
    /// Returns `MailshiftError::Io` if the target cannot be created or written.
    pub fn write_proxies(&self, table: &ProxyTable) -> Result<WrittenFile> {
        let (path, file) = self.files.create_next(FileKind::Proxies)?;
        let mut sink = RowSink::new(file);

        sink.append_record(table.header()).map_err(|e| in_file(&path, e))?;
        for row in table.rows() {
            sink.append_record(row.record()).map_err(|e| in_file(&path, e))?;
        }
        let sha256 = sink.checksum();
        sink.into_inner().sync_all().map_err(|e| io_error(&path, e))?;

        tracing::info!(
            path = %path.display(),
            rows = table.len(),
            width = table.width(),
            "Proxies table written"
        );

        Ok(WrittenFile {
            kind: FileKind::Proxies,
            path,
            rows: table.len(),
            sha256,
        })
    }

    /// Writes the rendered run log
    ///
    /// # Errors
    ///
    /// Returns `MailshiftError::Io` if the target cannot be created or written.
    pub fn write_run_log(&self, text: &str) -> Result<WrittenFile> {
        let (path, file) = self.files.create_next(FileKind::RunLog)?;
        let mut sink = RowSink::new(file);
        sink.append(text.as_bytes()).map_err(|e| io_error(&path, e))?;

        tracing::debug!(path = %path.display(), "Run log written");

        Ok(WrittenFile {
            kind: FileKind::RunLog,
            path,
            rows: text.lines().count(),
            sha256: calculate_checksum_bytes(text.as_bytes()),
        })
    }
}

/// A target that can be cut back to a byte length
trait Truncate {
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl Truncate for File {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Appends complete rows to a target
///
/// Tracks the length of what has been appended whole. A failed append cuts
/// the target back to that length, so no row is ever left half written.
struct RowSink<W> {
    inner: W,
    committed: u64,
    digest: Sha256,
}

impl<W: Write + Truncate> RowSink<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            committed: 0,
            digest: Sha256::new(),
        }
    }

    /// Encodes one CSV record and appends it
    fn append_record<I, T>(&mut self, record: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut csv = csv_writer(Vec::new());
        csv.write_record(record)?;
        let bytes = csv
            .into_inner()
            .map_err(|e| MailshiftError::Serialization(e.to_string()))?;
        self.append(&bytes)?;
        Ok(())
    }

    /// Appends `bytes` whole, or cuts the target back and fails
    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        if let Err(e) = self.inner.write_all(bytes).and_then(|_| self.inner.flush()) {
            if let Err(cut) = self.inner.truncate(self.committed) {
                tracing::warn!(
                    error = %cut,
                    length = self.committed,
                    "Failed to discard partial row"
                );
            }
            return Err(e);
        }

        self.committed += bytes.len() as u64;
        self.digest.update(bytes);
        Ok(())
    }

    /// Hex SHA-256 of everything appended so far
    fn checksum(&self) -> String {
        format!("{:x}", self.digest.clone().finalize())
    }

    fn into_inner(self) -> W {
        self.inner
    }
}

fn csv_writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(inner)
}

fn io_error(path: &Path, err: io::Error) -> MailshiftError {
    MailshiftError::Io(format!("{}: {err}", path.display()))
}

fn in_file(path: &Path, err: MailshiftError) -> MailshiftError {
    match err {
        MailshiftError::Io(msg) => MailshiftError::Io(format!("{}: {msg}", path.display())),
        other => other,
    }
}
