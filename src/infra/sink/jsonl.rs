//! File-backed completion sink using JSON lines.
//!
//! Each completed job is appended as one line, so the file is a durable
//! record of completion order that can be replayed with [`JsonlSink::load`].

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::{CompletedJob, CompletionSink, StationError};

/// Appends completed jobs to `<dir>/<stream>.jsonl`.
pub struct JsonlSink {
    file_path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl JsonlSink {
    /// Open (or create) the stream file for appending.
    pub fn new(dir: impl AsRef<Path>, stream: &str) -> Result<Self, StationError> {
        let dir = dir.as_ref();
        create_dir_all(dir).map_err(|e| StationError::Sink(e.to_string()))?;
        let file_path = dir.join(format!("{stream}.jsonl"));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .map_err(|e| StationError::Sink(format!("{}: {e}", file_path.display())))?;
        Ok(Self {
            file_path,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Path of the stream file.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Jobs written through this handle.
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<(), StationError> {
        self.writer
            .flush()
            .map_err(|e| StationError::Sink(e.to_string()))
    }

    /// Read every record from a stream file.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<CompletedJob>, StationError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(path).map_err(|e| StationError::Sink(e.to_string()))?;
        let mut jobs = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| StationError::Sink(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            let job: CompletedJob =
                serde_json::from_str(&line).map_err(|e| StationError::Sink(e.to_string()))?;
            jobs.push(job);
        }
        Ok(jobs)
    }
}

impl CompletionSink for JsonlSink {
    fn deliver(&mut self, job: CompletedJob) -> Result<(), StationError> {
        let line = serde_json::to_string(&job).map_err(|e| StationError::Sink(e.to_string()))?;
        writeln!(self.writer, "{line}").map_err(|e| StationError::Sink(e.to_string()))?;
        self.written += 1;
        Ok(())
    }
}

impl Drop for JsonlSink {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::error!("failed to flush {}: {}", self.file_path.display(), e);
        }
    }
}
