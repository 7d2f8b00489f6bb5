// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plakat CLI. Thin boundary shell over the library crates: parse arguments,
// initialise logging, run the partition pipeline, write tile files and the
// optional assembled PDF.

mod output;

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use plakat_core::config::{JobConfig, PdfOptions};
use plakat_core::error::{PlakatError, Result};
use plakat_core::progress::ProgressObserver;
use plakat_core::types::{GridShape, PageSpec, ResizeMode};
use plakat_assembly::AssemblyWriter;
use plakat_partition::{
    resize_to_canvas, MemoryEstimate, PageGeometry, TileSequencer, BYTES_PER_PIXEL_RGBA,
};
use tracing::{debug, info, warn};

use output::{PdfRecord, RunSummary, TileFormat, TileRecord};

/// Peak projections above this trigger a warning before the canvas is
/// allocated.
const DEFAULT_ADVISORY_BYTES: u64 = 2 * 1024 * 1024 * 1024;

#[derive(Parser)]
#[command(name = "plakat")]
#[command(about = "Split an image into print-ready poster tiles and an assembled PDF")]
#[command(version)]
struct Cli {
    /// Source image
    #[arg(long, short = 'f')]
    file: PathBuf,

    /// Tile grid as ROWSxCOLS, e.g. 3x3
    #[arg(long, conflicts_with = "parts")]
    grid: Option<GridShape>,

    /// Split into N pages in a single strip along the longer image axis
    #[arg(long)]
    parts: Option<u32>,

    /// Print resolution in dots per inch
    #[arg(long, default_value_t = 300)]
    dpi: u32,

    /// How the image maps onto the tile canvas
    #[arg(long, default_value = "maintain")]
    resize_mode: ResizeMode,

    /// Directory for output files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Encoding for individual tile files
    #[arg(long, value_enum, default_value_t = TileFormat::Png)]
    format: TileFormat,

    /// Assemble the tiles into a multi-page PDF
    #[arg(long)]
    pdf: bool,

    /// Prepend an assembly-instructions page to the PDF
    #[arg(long)]
    pdf_instructions: bool,

    /// Draw a faint measurement grid on every tile page
    #[arg(long)]
    pdf_grid_overlay: bool,

    /// Omit page numbers from tile pages
    #[arg(long)]
    no_pdf_page_numbers: bool,

    /// Omit corner alignment marks from tile pages
    #[arg(long)]
    no_pdf_assembly_aids: bool,

    /// Add a position-reference back page behind every tile (duplex printing)
    #[arg(long)]
    pdf_duplex: bool,

    /// Store tile rasters uncompressed instead of as JPEG
    #[arg(long)]
    no_pdf_compress: bool,

    /// JPEG quality for compressed tile rasters (1-100)
    #[arg(long, default_value_t = 90)]
    pdf_quality: u8,

    /// Downsample tile rasters that exceed the target PDF resolution
    #[arg(long)]
    pdf_downsample: bool,

    /// Target resolution for --pdf-downsample
    #[arg(long, default_value_t = 300)]
    pdf_dpi: u32,

    /// Write a JSON run summary next to the tiles
    #[arg(long)]
    summary: bool,

    /// Debug-level logging
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn pdf_options(&self) -> PdfOptions {
        PdfOptions {
            instructions: self.pdf_instructions,
            grid_overlay: self.pdf_grid_overlay,
            page_numbers: !self.no_pdf_page_numbers,
            assembly_aids: !self.no_pdf_assembly_aids,
            duplex_back_pages: self.pdf_duplex,
            compress: !self.no_pdf_compress,
            quality: self.pdf_quality,
            downsample: self.pdf_downsample,
            downsample_dpi: self.pdf_dpi,
            ..PdfOptions::default()
        }
    }
}

/// `--grid` wins; `--parts N` builds a strip along the longer source axis.
fn resolve_grid(cli: &Cli, src_w: u32, src_h: u32) -> Result<GridShape> {
    match (cli.grid, cli.parts) {
        (Some(grid), _) => Ok(grid),
        (None, Some(parts)) => {
            if src_w >= src_h {
                GridShape::strip_horizontal(parts)
            } else {
                GridShape::strip_vertical(parts)
            }
        }
        (None, None) => Err(PlakatError::Configuration(
            "either --grid or --parts is required".into(),
        )),
    }
}

/// Logs pipeline progress as tiles and pages complete.
struct LogObserver;

impl ProgressObserver for LogObserver {
    fn tile_completed(&self, index: u32, total: u32) {
        info!("Tile {}/{} written", index, total);
    }

    fn page_completed(&self, page: u32, total: u32) {
        debug!("Assembled page {}/{}", page, total);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let source = image::open(&cli.file).map_err(|err| {
        PlakatError::InvalidImage(format!("cannot open {}: {}", cli.file.display(), err))
    })?;
    info!(
        source = %cli.file.display(),
        width = source.width(),
        height = source.height(),
        "Loaded source image"
    );

    let grid = resolve_grid(cli, source.width(), source.height())?;
    let page = PageSpec::a4(cli.dpi);
    let options = cli.pdf_options();

    let config = JobConfig {
        grid,
        page,
        resize_mode: cli.resize_mode,
        pdf: options.clone(),
    };
    config.validate()?;

    let geometry = PageGeometry::compute(&page, grid)?;
    info!(
        grid = %grid,
        cell = format!("{}x{}", geometry.cell_width, geometry.cell_height),
        canvas = format!("{}x{}", geometry.canvas_width, geometry.canvas_height),
        "Computed page geometry"
    );

    let estimate = MemoryEstimate::project(
        geometry.canvas_width,
        geometry.canvas_height,
        BYTES_PER_PIXEL_RGBA as u32,
        geometry.tile_count(),
    )?;
    if let Some(advisory) = estimate.advisory(DEFAULT_ADVISORY_BYTES) {
        warn!("{}", advisory.message);
    }

    let canvas = resize_to_canvas(
        &source,
        geometry.canvas_width,
        geometry.canvas_height,
        cli.resize_mode,
    )?;
    drop(source);

    fs::create_dir_all(&cli.output_dir)?;
    let stem = cli
        .file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "poster".into());

    let observer = LogObserver;
    let mut tile_records = Vec::with_capacity(grid.cells() as usize);
    for tile in TileSequencer::new(&canvas, grid)? {
        let path = output::write_tile(&cli.output_dir, &stem, &tile, cli.format)?;
        observer.tile_completed(tile.index, grid.cells());
        tile_records.push(TileRecord {
            index: tile.index,
            row: tile.row,
            col: tile.col,
            width: tile.bounds.width(),
            height: tile.bounds.height(),
            path: path.display().to_string(),
        });
    }

    let mut pdf_record = None;
    if cli.pdf {
        let mut writer = AssemblyWriter::new(page, grid, options);
        writer.set_title(stem.as_str());
        let doc = writer.build(TileSequencer::new(&canvas, grid)?, &observer)?;
        let pdf_path = cli.output_dir.join(format!("{}_poster.pdf", stem));
        doc.write_to_file(&pdf_path)?;
        info!(path = %pdf_path.display(), pages = doc.page_count, "Assembled poster PDF");
        pdf_record = Some(PdfRecord {
            path: pdf_path.display().to_string(),
            page_count: doc.page_count,
            bytes: doc.bytes.len() as u64,
        });
    }

    if cli.summary {
        let summary = RunSummary {
            source: cli.file.display().to_string(),
            grid: grid.to_string(),
            dpi: cli.dpi,
            resize_mode: cli.resize_mode,
            canvas_width: geometry.canvas_width,
            canvas_height: geometry.canvas_height,
            cell_width: geometry.cell_width,
            cell_height: geometry.cell_height,
            tiles: tile_records,
            pdf: pdf_record,
        };
        output::write_summary(&cli.output_dir, &stem, &summary)?;
    }

    info!("Done");
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if let Err(err) = run(&cli) {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(["plakat", "--file", "photo.png"].iter().copied().chain(args.iter().copied()))
    }

    #[test]
    fn explicit_grid_wins() {
        let cli = parse(&["--grid", "3x4"]);
        let grid = resolve_grid(&cli, 1000, 500).unwrap();
        assert_eq!((grid.rows, grid.cols), (3, 4));
    }

    /// `--parts` strips along the longer source axis.
    #[test]
    fn parts_follow_source_orientation() {
        let cli = parse(&["--parts", "4"]);
        let landscape = resolve_grid(&cli, 1920, 1080).unwrap();
        assert_eq!((landscape.rows, landscape.cols), (1, 4));

        let portrait = resolve_grid(&cli, 1080, 1920).unwrap();
        assert_eq!((portrait.rows, portrait.cols), (4, 1));
    }

    #[test]
    fn missing_grid_and_parts_is_an_error() {
        let cli = parse(&[]);
        assert!(matches!(
            resolve_grid(&cli, 100, 100),
            Err(PlakatError::Configuration(_))
        ));
    }

    #[test]
    fn grid_and_parts_conflict_at_parse_time() {
        let result = Cli::try_parse_from([
            "plakat", "--file", "a.png", "--grid", "2x2", "--parts", "4",
        ]);
        assert!(result.is_err());
    }

    /// Negative flags invert the option defaults; positives switch extras on.
    #[test]
    fn pdf_flags_map_onto_options() {
        let defaults = parse(&[]).pdf_options();
        assert!(defaults.page_numbers);
        assert!(defaults.assembly_aids);
        assert!(defaults.compress);
        assert!(!defaults.instructions);
        assert!(!defaults.duplex_back_pages);
        assert_eq!(defaults.quality, 90);

        let flipped = parse(&[
            "--pdf-instructions",
            "--pdf-grid-overlay",
            "--no-pdf-page-numbers",
            "--no-pdf-assembly-aids",
            "--pdf-duplex",
            "--no-pdf-compress",
            "--pdf-quality",
            "75",
            "--pdf-downsample",
            "--pdf-dpi",
            "150",
        ])
        .pdf_options();
        assert!(flipped.instructions);
        assert!(flipped.grid_overlay);
        assert!(!flipped.page_numbers);
        assert!(!flipped.assembly_aids);
        assert!(flipped.duplex_back_pages);
        assert!(!flipped.compress);
        assert_eq!(flipped.quality, 75);
        assert!(flipped.downsample);
        assert_eq!(flipped.downsample_dpi, 150);
    }

    #[test]
    fn resize_mode_parses_from_flag() {
        let cli = parse(&["--resize-mode", "pad_white"]);
        assert_eq!(cli.resize_mode, ResizeMode::PadWhite);
    }
}
