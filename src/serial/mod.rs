// src/serial/mod.rs
//
// Serial transport - opens the terminal line, negotiates speed and frames
// the encoded image with the init sequence.

pub mod device;
pub mod sink;

use std::fmt;
use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use nix::sys::termios::BaudRate;
use serde::{Deserialize, Serialize};

use crate::error::UnsupportedBaud;
use crate::videotex::{self, VideotexCommand};

pub use device::NixSerial;
pub use sink::FileSink;

/// Line speeds the terminal can be switched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Baud {
    B300,
    B1200,
    B4800,
    B9600,
}

impl Baud {
    pub fn bits_per_second(self) -> u32 {
        match self {
            Baud::B300 => 300,
            Baud::B1200 => 1200,
            Baud::B4800 => 4800,
            Baud::B9600 => 9600,
        }
    }

    /// Last byte of the speed-selection sequence.
    pub fn selection_code(self) -> u8 {
        match self {
            Baud::B300 => videotex::SPEED_CODE_300,
            Baud::B1200 => videotex::SPEED_CODE_1200,
            Baud::B4800 => videotex::SPEED_CODE_4800,
            Baud::B9600 => videotex::SPEED_CODE_9600,
        }
    }

    pub fn termios_rate(self) -> BaudRate {
        match self {
            Baud::B300 => BaudRate::B300,
            Baud::B1200 => BaudRate::B1200,
            Baud::B4800 => BaudRate::B4800,
            Baud::B9600 => BaudRate::B9600,
        }
    }
}

impl TryFrom<u32> for Baud {
    type Error = UnsupportedBaud;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        match value {
            300 => Ok(Baud::B300),
            1200 => Ok(Baud::B1200),
            4800 => Ok(Baud::B4800),
            9600 => Ok(Baud::B9600),
            other => Err(UnsupportedBaud(other)),
        }
    }
}

impl From<Baud> for u32 {
    fn from(baud: Baud) -> u32 {
        baud.bits_per_second()
    }
}

impl fmt::Display for Baud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} baud", self.bits_per_second())
    }
}

/// A byte sink connected to the terminal.
pub trait SerialLink: Write {
    /// Blocks until everything written so far has left the line.
    fn drain(&mut self) -> Result<()>;

    /// Changes the local line speed once pending output has drained.
    fn set_baud(&mut self, baud: Baud) -> Result<()>;
}

/// Drives a terminal over a [`SerialLink`].
#[derive(Debug)]
pub struct MinitelSession<L: SerialLink> {
    link: L,
    settle_delay: Duration,
}

impl<L: SerialLink> MinitelSession<L> {
    /// `settle_delay` is waited between asking the terminal to change speed
    /// and changing the local line; the terminal misses the request otherwise.
    pub fn new(link: L, settle_delay: Duration) -> Self {
        MinitelSession { link, settle_delay }
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn into_inner(self) -> L {
        self.link
    }

    /// Writes a single command and waits for it to be sent.
    pub fn send(&mut self, command: VideotexCommand) -> Result<()> {
        self.link
            .write_all(&command.to_bytes())
            .with_context(|| format!("Failed to write {:?}", command))?;
        self.link.drain()
    }

    /// Clears the page and enters semigraphic mode, each drained separately.
    pub fn initialize(&mut self) -> Result<()> {
        for command in videotex::init_sequence() {
            self.send(command)?;
        }
        debug!("Terminal initialized");
        Ok(())
    }

    /// Asks the terminal to switch to `baud`, then follows on the local side.
    pub fn negotiate_speed(&mut self, baud: Baud) -> Result<()> {
        self.send(VideotexCommand::SelectSpeed(baud))
            .with_context(|| format!("Failed to request {}", baud))?;
        if !self.settle_delay.is_zero() {
            std::thread::sleep(self.settle_delay);
        }
        self.link
            .set_baud(baud)
            .with_context(|| format!("Failed to set local line to {}", baud))?;
        info!("Line speed set to {}", baud);
        Ok(())
    }

    /// Writes an encoded image in one go and waits until it is on the wire.
    /// The terminal only shows the whole picture once the line drains.
    pub fn transmit(&mut self, bytes: &[u8]) -> Result<()> {
        self.link
            .write_all(bytes)
            .context("Failed to write image stream")?;
        debug!("Wrote {} bytes", bytes.len());
        self.link.drain().context("Failed to drain image stream")?;
        debug!("Drained");
        Ok(())
    }

    /// Full sequence: init, speed up, send, then always fall back to
    /// `restore` so the terminal stays reachable. The first error wins.
    pub fn display(&mut self, bytes: &[u8], baud: Baud, restore: Baud) -> Result<()> {
        let sent = self.send_image(bytes, baud);
        let restored = self.negotiate_speed(restore);
        match (sent, restored) {
            (Err(e), Err(restore_err)) => {
                warn!("Failed to restore line speed: {:#}", restore_err);
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(()), restored) => restored,
        }
    }

    fn send_image(&mut self, bytes: &[u8], baud: Baud) -> Result<()> {
        self.initialize()?;
        self.negotiate_speed(baud)?;
        self.transmit(bytes)
    }
}

#[cfg(test)]
mod tests;
