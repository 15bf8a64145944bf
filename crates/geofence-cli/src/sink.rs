//! NDJSON event sink for replay output

use geofence_core::error::Result;
use geofence_core::models::EventRecord;
use geofence_core::ports::EventSink;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes each delivered record as one JSON line
pub struct NdjsonEventSink<W: Write> {
    writer: W,
    written: usize,
}

impl NdjsonEventSink<BufWriter<File>> {
    /// Create (or truncate) `path` and write records to it
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> NdjsonEventSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> EventSink for NdjsonEventSink<W> {
    fn deliver(&mut self, records: &[EventRecord]) -> Result<()> {
        for record in records {
            serde_json::to_writer(&mut self.writer, record)?;
            self.writer.write_all(b"\n")?;
            self.written += 1;
        }
        Ok(())
    }
}
