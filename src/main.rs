// src/main.rs

//! Command-line entry point for `minitel-photo`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::info;

use minitel_photo::config::Config;
use minitel_photo::encoder;
use minitel_photo::raster::Raster;
use minitel_photo::serial::{FileSink, MinitelSession, NixSerial};

/// Display a grayscale photo on a Minitel in semigraphic mode.
#[derive(Parser, Debug)]
#[command(name = "minitel-photo", version, about)]
struct Cli {
    /// Serial device the terminal is attached to (or output file with --dump).
    device: PathBuf,

    /// Image of exactly (columns*2)x(rows*3) pixels, 80x72 by default.
    image: PathBuf,

    /// Transfer at the fast line speed (4800 baud by default).
    #[arg(long)]
    fast: bool,

    /// JSON configuration file.
    #[arg(long, env = "MINITEL_PHOTO_CONFIG")]
    config: Option<PathBuf>,

    /// Write the stream to DEVICE as a plain file instead of a terminal.
    #[arg(long)]
    dump: bool,
}

/// Main entry point for the `minitel-photo` application.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    info!("Starting minitel-photo...");

    let config = Config::load(cli.config.as_deref())?;
    let screen = config.screen()?;
    info!(
        "Screen: {}x{} cells, {}x{} pixels",
        screen.columns(),
        screen.rows(),
        screen.pixel_width(),
        screen.pixel_height()
    );

    // Everything that can fail on the image side happens before the
    // terminal is touched.
    let raster = Raster::open(&cli.image, &screen)
        .with_context(|| format!("Failed to read image {}", cli.image.display()))?;
    let bytes = encoder::encode_luma(raster, &screen).context("Failed to encode image")?;
    info!(
        "Encoded {} into {} bytes",
        cli.image.display(),
        bytes.len()
    );

    if cli.dump {
        let sink = FileSink::create(&cli.device)?;
        let mut session = MinitelSession::new(sink, Duration::ZERO);
        session.initialize()?;
        session.transmit(&bytes)?;
        info!("Stream written to {}", cli.device.display());
    } else {
        let serial = NixSerial::open(&cli.device)?;
        info!("Opened {}", serial.path().display());
        let mut session = MinitelSession::new(
            serial,
            Duration::from_millis(config.serial.settle_delay_ms),
        );
        session
            .display(
                &bytes,
                config.serial.transfer_baud(cli.fast),
                config.serial.restore_baud,
            )
            .with_context(|| format!("Failed to display image on {}", cli.device.display()))?;
        info!("Image sent to {}", cli.device.display());
    }

    Ok(())
}
