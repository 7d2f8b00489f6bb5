// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File output for the CLI: individual tile images named in reading order and
// an optional machine-readable run summary.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use image::{Rgb, RgbImage, Rgba};
use plakat_core::error::{PlakatError, Result};
use plakat_core::types::ResizeMode;
use plakat_partition::Tile;
use serde::Serialize;
use tracing::debug;

/// JPEG quality for individual tile files. The PDF path has its own quality
/// knob; tile files are kept near-lossless.
const TILE_JPEG_QUALITY: u8 = 95;

/// Encoding for individual tile files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TileFormat {
    Png,
    Jpg,
}

impl TileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpg => "jpg",
        }
    }
}

/// Write one tile to `<dir>/<stem>_part_<index>.<ext>` and return the path.
///
/// PNG keeps the alpha channel (letterboxed regions stay transparent); JPEG
/// flattens over white since the format has no alpha.
pub fn write_tile(dir: &Path, stem: &str, tile: &Tile, format: TileFormat) -> Result<PathBuf> {
    let path = dir.join(format!("{}_part_{}.{}", stem, tile.index, format.extension()));

    match format {
        TileFormat::Png => {
            tile.image.save(&path).map_err(|err| {
                PlakatError::Encoding(format!("writing {} failed: {}", path.display(), err))
            })?;
        }
        TileFormat::Jpg => {
            let rgb = flatten_over_white(&tile.image);
            let file = fs::File::create(&path)?;
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                BufWriter::new(file),
                TILE_JPEG_QUALITY,
            );
            rgb.write_with_encoder(encoder).map_err(|err| {
                PlakatError::Encoding(format!("writing {} failed: {}", path.display(), err))
            })?;
        }
    }

    debug!(tile = tile.index, path = %path.display(), "Wrote tile file");
    Ok(path)
}

fn flatten_over_white(image: &image::RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let blend =
            |c: u8| -> u8 { ((u16::from(c) * u16::from(a) + 255 * u16::from(255 - a)) / 255) as u8 };
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// One row of the run summary, per tile file written.
#[derive(Debug, Serialize)]
pub struct TileRecord {
    pub index: u32,
    pub row: u32,
    pub col: u32,
    pub width: u32,
    pub height: u32,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct PdfRecord {
    pub path: String,
    pub page_count: u32,
    pub bytes: u64,
}

/// Machine-readable record of a whole run, written next to the tiles.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub source: String,
    pub grid: String,
    pub dpi: u32,
    pub resize_mode: ResizeMode,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub tiles: Vec<TileRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<PdfRecord>,
}

/// Write the summary as pretty JSON to `<dir>/<stem>_summary.json`.
pub fn write_summary(dir: &Path, stem: &str, summary: &RunSummary) -> Result<PathBuf> {
    let path = dir.join(format!("{}_summary.json", stem));
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(&path, json)?;
    debug!(path = %path.display(), "Wrote run summary");
    Ok(path)
}
