//! Document hand-off to output collaborators.
//!
//! The core does not depend on any output format: it produces a
//! [`GeneratedDocument`] and passes ownership across the [`DocumentSink`]
//! boundary. The bundled [`TextFileSink`] writes rendered content as plain
//! text with an atomic temp-file-then-persist sequence, so readers never
//! observe a partially written document.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::model::GeneratedDocument;

/// Receiver for generated documents. Implementations own everything about
/// the output format; the engine only guarantees the document's content and
/// metadata are final when `write` is called.
pub trait DocumentSink {
    fn write(&self, document: &GeneratedDocument) -> Result<()>;
}

/// Writes each document's content to its destination path as UTF-8 text.
pub struct TextFileSink {
    output_dir: PathBuf,
}

impl TextFileSink {
    /// Creates the output directory if needed.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).with_context(|| {
            format!("failed to create output directory {}", output_dir.display())
        })?;
        Ok(Self { output_dir })
    }
}

impl DocumentSink for TextFileSink {
    fn write(&self, document: &GeneratedDocument) -> Result<()> {
        // Temp file lives in the destination directory so the final rename
        // stays on one filesystem and is atomic.
        let mut temp = NamedTempFile::new_in(&self.output_dir)
            .with_context(|| format!("failed to create temp file in {}", self.output_dir.display()))?;
        temp.write_all(document.content.as_bytes())
            .context("failed to write document content")?;
        temp.persist(&document.destination).with_context(|| {
            format!("failed to persist document to {}", document.destination.display())
        })?;
        debug!(
            id = document.id.as_str(),
            destination = %document.destination.display(),
            bytes = document.content.len(),
            "document written"
        );
        Ok(())
    }
}

/// Appends each document as one JSON object per line to a single file,
/// content and metadata together. Suited to corpus-building pipelines that
/// want one artifact per run instead of one file per document.
pub struct JsonLinesSink {
    path: PathBuf,
    writer: Mutex<BufWriter<fs::File>>,
}

impl JsonLinesSink {
    /// Creates (or truncates) the corpus file and its parent directory.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory {}", parent.display())
            })?;
        }
        let file = fs::File::create(&path)
            .with_context(|| format!("failed to create corpus file {}", path.display()))?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl DocumentSink for JsonLinesSink {
    fn write(&self, document: &GeneratedDocument) -> Result<()> {
        let line = serde_json::to_string(document).context("failed to serialize document")?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{line}").with_context(|| {
            format!("failed to append document to {}", self.path.display())
        })?;
        writer.flush().context("failed to flush corpus file")?;
        Ok(())
    }
}
