//! Configuration for tiff-pages.
//!
//! This module provides:
//! - [`DecodeOptions`], the library-level decoding limits
//! - The command-line interface via clap, with environment variable fallbacks
//!
//! # Environment Variables
//!
//! - `TIFF_PAGES_MAX_DECODE_MB` - Largest decode buffer for a single page in MiB (default: 512)
//! - `TIFF_PAGES_JPEG_QUALITY` - JPEG quality for `render` output (default: 90)

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tiff::decoder::Limits;

use crate::export::{ExportFormat, DEFAULT_JPEG_QUALITY, MAX_JPEG_QUALITY, MIN_JPEG_QUALITY};

// =============================================================================
// Default Values
// =============================================================================

/// Default upper bound on one page's decode buffer, in MiB.
pub const DEFAULT_MAX_DECODE_MB: usize = 512;

/// Default downsampling factor (full resolution).
pub const DEFAULT_SAMPLE_SIZE: u32 = 1;

// =============================================================================
// Decode Options
// =============================================================================

/// Limits applied while decoding pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Largest buffer the decoder may allocate for one page, in bytes.
    pub max_decode_bytes: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_decode_bytes: DEFAULT_MAX_DECODE_MB * 1024 * 1024,
        }
    }
}

impl DecodeOptions {
    /// Options with the decode buffer capped at `mb` MiB.
    pub fn with_max_decode_mb(mb: usize) -> Self {
        Self {
            max_decode_bytes: mb.saturating_mul(1024 * 1024),
        }
    }

    /// Translate into the decoder's limits.
    pub fn limits(&self) -> Limits {
        let mut limits = Limits::default();
        limits.decoding_buffer_size = self.max_decode_bytes;
        limits
    }
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// tiff-pages - Inspect and render pages of multi-page TIFF files.
#[derive(Parser, Debug, Clone)]
#[command(name = "tiff-pages")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the page count and the size of every page.
    Info(InfoConfig),

    /// Render one page to a PNG or JPEG file.
    Render(RenderConfig),
}

/// Output format of the `info` subcommand.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InfoFormat {
    /// Human readable table
    #[default]
    Text,
    /// JSON document
    Json,
}

/// Arguments of the `info` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InfoConfig {
    /// TIFF file to inspect.
    pub path: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = InfoFormat::Text)]
    pub format: InfoFormat,

    /// Largest decode buffer for a single page, in MiB.
    #[arg(long, default_value_t = DEFAULT_MAX_DECODE_MB, env = "TIFF_PAGES_MAX_DECODE_MB")]
    pub max_decode_mb: usize,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl InfoConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_decode_mb == 0 {
            return Err("max_decode_mb must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::with_max_decode_mb(self.max_decode_mb)
    }
}

/// Arguments of the `render` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RenderConfig {
    /// TIFF file to read.
    pub path: PathBuf,

    /// Output file; the extension selects PNG (.png) or JPEG (.jpg, .jpeg).
    #[arg(short, long)]
    pub output: PathBuf,

    /// Page to render (0-based).
    #[arg(short, long, default_value_t = 0)]
    pub page: usize,

    /// Downsampling factor; output dimensions are divided by this value.
    #[arg(short, long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: u32,

    /// JPEG quality (1-100), ignored for PNG output.
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "TIFF_PAGES_JPEG_QUALITY")]
    pub quality: u8,

    /// Largest decode buffer for a single page, in MiB.
    #[arg(long, default_value_t = DEFAULT_MAX_DECODE_MB, env = "TIFF_PAGES_MAX_DECODE_MB")]
    pub max_decode_mb: usize,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl RenderConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_size == 0 {
            return Err("sample_size must be at least 1".to_string());
        }

        if self.quality < MIN_JPEG_QUALITY || self.quality > MAX_JPEG_QUALITY {
            return Err(format!(
                "quality must be between {} and {}",
                MIN_JPEG_QUALITY, MAX_JPEG_QUALITY
            ));
        }

        if self.max_decode_mb == 0 {
            return Err("max_decode_mb must be greater than 0".to_string());
        }

        self.output_format()?;
        Ok(())
    }

    /// Output format derived from the output file extension.
    pub fn output_format(&self) -> Result<ExportFormat, String> {
        format_from_extension(&self.output).ok_or_else(|| {
            format!(
                "Cannot infer output format from '{}': use a .png, .jpg or .jpeg extension",
                self.output.display()
            )
        })
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::with_max_decode_mb(self.max_decode_mb)
    }
}

fn format_from_extension(path: &Path) -> Option<ExportFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some(ExportFormat::Png),
        "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
