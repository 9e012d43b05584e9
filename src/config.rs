// src/config.rs

//! Defines the configuration structures for `minitel-photo`.
//!
//! The configuration is deserialized from an optional JSON file. Every
//! section carries `#[serde(default)]`, so a file only needs to name the
//! settings it changes. Defaults match a standard 40x24 Minitel on a
//! 1200 baud line.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::raster::Screen;
use crate::serial::Baud;

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Terminal screen geometry in character cells.
    pub screen: ScreenConfig,
    /// Serial line settings.
    pub serial: SerialConfig,
}

impl Config {
    /// Loads the configuration from `path`, or returns the defaults when no
    /// path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            info!("Configuration loaded (using default).");
            return Ok(Config::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("Configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Validated screen geometry.
    pub fn screen(&self) -> Result<Screen> {
        Screen::new(self.screen.columns, self.screen.rows)
            .context("Invalid screen geometry in configuration")
    }
}

// --- Screen Configuration ---

/// Size of the terminal in character cells. Each cell holds a 2x3 pixel block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScreenConfig {
    pub columns: u16,
    pub rows: u16,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        ScreenConfig {
            columns: 40,
            rows: 24,
        }
    }
}

// --- Serial Configuration ---

/// Line speeds and handshake timing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SerialConfig {
    /// Speed used for a normal transfer.
    pub baud: Baud,
    /// Speed used when fast mode is requested.
    pub fast_baud: Baud,
    /// Speed the terminal is put back to once the image is sent.
    pub restore_baud: Baud,
    /// Pause between the speed-selection command and the local line change.
    /// The terminal ignores the command if the line changes too early.
    pub settle_delay_ms: u64,
}

impl SerialConfig {
    /// The speed to transfer at.
    pub fn transfer_baud(&self, fast: bool) -> Baud {
        if fast {
            self.fast_baud
        } else {
            self.baud
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            baud: Baud::B1200,
            fast_baud: Baud::B4800,
            restore_baud: Baud::B1200,
            settle_delay_ms: 500,
        }
    }
}
