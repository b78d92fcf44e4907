//! JSON Lines output sink

use crate::error::{OutputError, ScraperError, WalkError};
use crate::types::CodeSample;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Buffered writer emitting one JSON object per line
pub struct JsonlWriter<W: Write = File> {
    inner: BufWriter<W>,
    label: String,
    records_written: usize,
}

impl JsonlWriter<File> {
    /// Open `path` for appending, creating it if needed.
    ///
    /// Existing records are kept; a re-run adds to them.
    pub fn open_append(path: &Path) -> Result<Self, ScraperError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| OutputError::OpenFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!("Opened {} for appending", path.display());
        Ok(Self::new(file, path.display().to_string()))
    }
}

impl<W: Write> JsonlWriter<W> {
    /// Wrap any writer; `label` names it in error messages
    pub fn new(inner: W, label: impl Into<String>) -> Self {
        Self {
            inner: BufWriter::new(inner),
            label: label.into(),
            records_written: 0,
        }
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Serialize and append one record.
    ///
    /// A serialization failure is a per-file [`WalkError`]; nothing is written in
    /// that case. I/O failures are [`OutputError`]s.
    pub fn write_sample(&mut self, sample: &CodeSample) -> Result<(), ScraperError> {
        let mut line = serde_json::to_vec(sample).map_err(|e| WalkError::SerializeFailed {
            file: sample.path.clone(),
            reason: e.to_string(),
        })?;
        line.push(b'\n');

        self.inner
            .write_all(&line)
            .map_err(|e| OutputError::WriteFailed {
                path: self.label.clone(),
                reason: e.to_string(),
            })?;

        self.records_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ScraperError> {
        self.inner.flush().map_err(|e| {
            OutputError::FlushFailed {
                path: self.label.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Flush buffered records and return how many were written
    pub fn finish(mut self) -> Result<usize, ScraperError> {
        self.flush()?;
        Ok(self.records_written)
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(mut self) -> Result<W, ScraperError> {
        self.flush()?;
        let label = self.label.clone();
        self.inner.into_inner().map_err(|e| {
            OutputError::FlushFailed {
                path: label,
                reason: e.error().to_string(),
            }
            .into()
        })
    }
}
