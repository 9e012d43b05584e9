// src/serial/device.rs

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{Result as IoResult, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, RawFd};
use std::path::{Path, PathBuf};

use nix::fcntl::OFlag;
use nix::sys::termios::{self, SetArg};

use super::{Baud, SerialLink};

/// A tty device driven through termios.
#[derive(Debug)]
pub struct NixSerial {
    file: File,
    path: PathBuf,
}

impl NixSerial {
    /// Opens `path` read/write, without making it the controlling terminal,
    /// with synchronous writes. The line keeps its current settings.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags((OFlag::O_NOCTTY | OFlag::O_SYNC).bits())
            .open(path)
            .with_context(|| format!("error opening {}", path.display()))?;
        log::debug!("NixSerial: opened {} as fd {}", path.display(), file.as_raw_fd());
        Ok(NixSerial {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SerialLink for NixSerial {
    fn drain(&mut self) -> Result<()> {
        termios::tcdrain(&self.file)
            .with_context(|| format!("tcdrain failed on {}", self.path.display()))
    }

    fn set_baud(&mut self, baud: Baud) -> Result<()> {
        let mut attrs = termios::tcgetattr(&self.file)
            .with_context(|| format!("tcgetattr failed on {}", self.path.display()))?;
        termios::cfsetospeed(&mut attrs, baud.termios_rate())
            .with_context(|| format!("cfsetospeed({}) failed", baud))?;
        termios::cfsetispeed(&mut attrs, baud.termios_rate())
            .with_context(|| format!("cfsetispeed({}) failed", baud))?;
        termios::tcsetattr(&self.file, SetArg::TCSADRAIN, &attrs)
            .with_context(|| format!("tcsetattr failed on {}", self.path.display()))?;
        log::trace!("NixSerial: {} now at {}", self.path.display(), baud);
        Ok(())
    }
}

impl Write for NixSerial {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> IoResult<()> {
        self.file.flush()
    }
}

impl AsFd for NixSerial {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl AsRawFd for NixSerial {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}
