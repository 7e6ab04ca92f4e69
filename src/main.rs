//! tiff-pages - Inspect and render pages of multi-page TIFF files.

use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tiff_pages::{
    config::{Cli, Command, InfoConfig, InfoFormat, RenderConfig},
    BitmapEncoder, PageSize, TiffImage,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Info(config) => run_info(config),
        Command::Render(config) => run_render(config),
    }
}

// =============================================================================
// Info Command
// =============================================================================

#[derive(Debug, Serialize)]
struct InfoReport<'a> {
    path: String,
    page_count: usize,
    pages: &'a [PageSize],
}

fn run_info(config: InfoConfig) -> ExitCode {
    // Initialize logging
    if config.verbose {
        init_logging(true);
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    // Open the image and collect page sizes
    let image = match TiffImage::try_open_with(&config.path, &config.decode_options()) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pages = match image.page_sizes() {
        Ok(pages) => pages,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Output based on format
    match config.format {
        InfoFormat::Text => {
            println!("{}", config.path.display());
            println!("─────────────────────────────────");
            for (index, size) in pages.iter().enumerate() {
                println!("  page {:>4}: {:>6} x {:<6}", index, size.width, size.height);
            }
            println!();
            println!("Total: {} page(s)", pages.len());
        }
        InfoFormat::Json => {
            let report = InfoReport {
                path: config.path.display().to_string(),
                page_count: pages.len(),
                pages,
            };
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Render Command
// =============================================================================

fn run_render(config: RenderConfig) -> ExitCode {
    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let format = match config.output_format() {
        Ok(format) => format,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Open the image and render the requested page
    let mut image = match TiffImage::try_open_with(&config.path, &config.decode_options()) {
        Ok(image) => image,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let bitmap = match image.render_page(config.page, config.sample_size) {
        Ok(bitmap) => bitmap,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    image.close();

    // Encode and write output
    let encoder = BitmapEncoder::new(config.quality);
    match encoder.save(&bitmap, format, &config.output) {
        Ok(written) => {
            info!(
                "Wrote page {} ({}x{}) to {} as {} ({} bytes)",
                config.page,
                bitmap.width(),
                bitmap.height(),
                config.output.display(),
                format.name(),
                written
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to write {}: {}", config.output.display(), e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so stdout only carries command output.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "tiff_pages=debug"
    } else {
        "tiff_pages=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
