// src/serial/sink.rs

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Result as IoResult, Write};
use std::path::{Path, PathBuf};

use super::{Baud, SerialLink};

/// Writes the stream to a regular file instead of a terminal, for replay
/// with e.g. `cat dump > /dev/ttyUSB0` on a line already at speed.
#[derive(Debug)]
pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileSink {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create dump file {}", path.display()))?;
        Ok(FileSink {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
        })
    }
}

impl SerialLink for FileSink {
    fn drain(&mut self) -> Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))
    }

    /// A file has no line speed.
    fn set_baud(&mut self, baud: Baud) -> Result<()> {
        log::debug!("FileSink: ignoring speed change to {}", baud);
        Ok(())
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> IoResult<()> {
        self.writer.flush()
    }
}
