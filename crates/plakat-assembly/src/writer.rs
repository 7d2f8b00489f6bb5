// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Assembly writer — consumes the tile stream and produces the poster PDF
// using `printpdf` 0.8. One physical page per tile; the tile raster is
// embedded with the transform DPI set so its pixels map exactly onto the
// page, with no rescaling. Tiles are embedded as they arrive and released
// immediately, preserving the partition engine's streaming contract.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use image::imageops::FilterType;
use image::{imageops, Rgb, RgbImage, Rgba, RgbaImage};
use plakat_core::config::PdfOptions;
use plakat_core::error::{PlakatError, Result};
use plakat_core::progress::ProgressObserver;
use plakat_core::types::{GridShape, PageSpec};
use plakat_partition::Tile;
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage,
    RawImageData, RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use crate::instructions::{blank_filler_page, duplex_back_page, instructions_page};
use crate::overlay::{corner_marks, grid_overlay, mm_to_pt, text_at, text_centered, MARGIN_MM};

/// The assembled multi-page document: serialised PDF bytes plus the page
/// accounting the caller can assert against.
#[derive(Debug, Clone)]
pub struct AssemblyDocument {
    pub bytes: Vec<u8>,
    pub page_count: u32,
    pub tile_count: u32,
}

impl AssemblyDocument {
    /// Write the document to `path`, atomically: bytes go to `<path>.tmp`
    /// first and are renamed into place, so a failure never leaves a
    /// truncated document visible under the final name.
    #[instrument(skip(self), fields(path = %path.as_ref().display(), bytes = self.bytes.len()))]
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let tmp = tmp_sibling(path);

        if let Err(err) = fs::write(&tmp, &self.bytes) {
            let _ = fs::remove_file(&tmp);
            return Err(PlakatError::Io(err));
        }
        if let Err(err) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(PlakatError::Io(err));
        }

        info!("Wrote assembled PDF to {}", path.display());
        Ok(())
    }
}

/// `<path>.tmp` next to the final target, so the rename stays on one
/// filesystem.
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Total document pages for a tile count under the given options:
/// tiles, plus the instructions page (and its duplex filler), plus one back
/// page per tile when duplex is enabled.
pub fn expected_page_count(tile_count: u32, options: &PdfOptions) -> u32 {
    let mut pages = tile_count;
    if options.instructions {
        pages += 1;
        if options.duplex_back_pages {
            pages += 1;
        }
    }
    if options.duplex_back_pages {
        pages += tile_count;
    }
    pages
}

/// Builds the poster PDF from a tile stream.
pub struct AssemblyWriter {
    page: PageSpec,
    grid: GridShape,
    options: PdfOptions,
    title: Option<String>,
}

impl AssemblyWriter {
    pub fn new(page: PageSpec, grid: GridShape, options: PdfOptions) -> Self {
        Self {
            page,
            grid,
            options,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Consume `tiles` and build the document. The stream must yield exactly
    /// `grid.cells()` tiles in reading order; the observer is invoked after
    /// each assembled page.
    #[instrument(skip(self, tiles, observer), fields(grid = %self.grid, dpi = self.page.dpi))]
    pub fn build(
        &self,
        tiles: impl Iterator<Item = Tile>,
        observer: &dyn ProgressObserver,
    ) -> Result<AssemblyDocument> {
        let (w_mm, h_mm) = self.page.paper.dimensions_mm();
        let (page_w, page_h) = (Mm(w_mm as f32), Mm(h_mm as f32));
        let page_w_pt = page_w.into_pt().0;
        let page_h_pt = page_h.into_pt().0;

        let total = self.grid.cells();
        let title = self.title.as_deref().unwrap_or("Plakat Poster");

        info!(total, title, compress = self.options.compress, "Assembling poster PDF");

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::new();

        if self.options.instructions {
            pages.push(PdfPage::new(
                page_w,
                page_h,
                instructions_page(page_w_pt, page_h_pt, self.grid),
            ));
            if self.options.duplex_back_pages {
                // Keeps the first tile off the back of the instructions.
                pages.push(PdfPage::new(
                    page_w,
                    page_h,
                    blank_filler_page(page_w_pt, page_h_pt),
                ));
            }
        }

        let mut produced = 0u32;
        for tile in tiles {
            produced += 1;
            let mut ops = vec![self.embed_tile(&mut doc, &tile)?];
            ops.extend(self.page_decorations(&tile, total, page_w_pt, page_h_pt));
            pages.push(PdfPage::new(page_w, page_h, ops));

            observer.page_completed(tile.index, total);

            if self.options.duplex_back_pages {
                pages.push(PdfPage::new(
                    page_w,
                    page_h,
                    duplex_back_page(page_w_pt, page_h_pt, self.grid, tile.index),
                ));
            }
            // `tile` drops here: one tile in flight at a time.
        }

        if produced != total {
            return Err(PlakatError::Pdf(format!(
                "tile stream ended early: got {} of {} tiles",
                produced, total
            )));
        }

        let page_count = pages.len() as u32;
        debug_assert_eq!(page_count, expected_page_count(total, &self.options));
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

        info!(page_count, bytes = bytes.len(), "Poster PDF assembled");

        Ok(AssemblyDocument {
            bytes,
            page_count,
            tile_count: total,
        })
    }

    /// Flatten, optionally downsample and JPEG-compress the tile raster,
    /// register it with the document, and return the placement op. The
    /// transform DPI is set so the raster fills the physical page exactly.
    fn embed_tile(&self, doc: &mut PdfDocument, tile: &Tile) -> Result<Op> {
        let mut rgb = flatten_over_white(&tile.image);
        let mut embed_dpi = self.page.dpi as f32;

        if self.options.downsample && self.page.dpi > self.options.downsample_dpi {
            let factor = self.options.downsample_dpi as f64 / self.page.dpi as f64;
            let new_w = ((rgb.width() as f64 * factor).round() as u32).max(1);
            let new_h = ((rgb.height() as f64 * factor).round() as u32).max(1);
            debug!(
                tile = tile.index,
                from = format!("{}x{}", rgb.width(), rgb.height()),
                to = format!("{}x{}", new_w, new_h),
                "Downsampling tile raster"
            );
            rgb = imageops::resize(&rgb, new_w, new_h, FilterType::Lanczos3);
            embed_dpi = self.options.downsample_dpi as f32;
        }

        let raw = if self.options.compress {
            // Re-encode as JPEG so the page stream carries DCT data instead
            // of raw pixels.
            let mut buffer = Vec::new();
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, self.options.quality);
            rgb.write_with_encoder(encoder).map_err(|err| {
                PlakatError::Encoding(format!("JPEG encoding of tile {} failed: {}", tile.index, err))
            })?;

            let mut warnings: Vec<PdfWarnMsg> = Vec::new();
            RawImage::decode_from_bytes(&buffer, &mut warnings).map_err(|err| {
                PlakatError::Encoding(format!(
                    "embedding compressed tile {} failed: {}",
                    tile.index, err
                ))
            })?
        } else {
            RawImage {
                pixels: RawImageData::U8(rgb.clone().into_raw()),
                width: rgb.width() as usize,
                height: rgb.height() as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            }
        };

        let xobject_id = doc.add_image(&raw);
        Ok(Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: None,
                scale_y: None,
                dpi: Some(embed_dpi),
                rotate: None,
            },
        })
    }

    /// Caption and alignment-aid ops for one tile page, per the option
    /// toggles.
    fn page_decorations(
        &self,
        tile: &Tile,
        total: u32,
        page_w_pt: f32,
        page_h_pt: f32,
    ) -> Vec<Op> {
        let mut ops = vec![Op::SetFillColor {
            col: printpdf::Color::Rgb(printpdf::Rgb::new(0.0, 0.0, 0.0, None)),
        }];

        if self.options.page_numbers {
            ops.extend(text_centered(
                &format!("Page {} of {}", tile.index, total),
                page_w_pt,
                mm_to_pt(10.0),
                12.0,
                BuiltinFont::HelveticaBold,
            ));
        }

        if self.options.dimension_caption {
            ops.extend(text_at(
                &format!(
                    "Part {}/{} - Size: {}x{} px",
                    tile.index,
                    total,
                    tile.bounds.width(),
                    tile.bounds.height()
                ),
                mm_to_pt(MARGIN_MM),
                mm_to_pt(MARGIN_MM),
                8.0,
                BuiltinFont::Helvetica,
            ));
        }

        if self.options.top_marker {
            ops.extend(text_at(
                "^ TOP ^",
                page_w_pt - mm_to_pt(30.0),
                page_h_pt - mm_to_pt(10.0),
                8.0,
                BuiltinFont::Helvetica,
            ));
        }

        if self.options.timestamp {
            let stamp = Local::now().format("%Y-%m-%d %H:%M");
            ops.extend(text_at(
                &format!("Created: {}", stamp),
                page_w_pt - mm_to_pt(45.0),
                mm_to_pt(5.0),
                8.0,
                BuiltinFont::Helvetica,
            ));
        }

        if self.options.assembly_aids {
            ops.extend(corner_marks(page_w_pt, page_h_pt));
        }

        if self.options.grid_overlay {
            let (w_mm, h_mm) = self.page.paper.dimensions_mm();
            ops.extend(grid_overlay(w_mm as f32, h_mm as f32));
        }

        ops
    }
}

/// Flatten RGBA over a white background. The letterboxed regions produced by
/// `ResizeMode::Maintain` are transparent; PDF rasters here are plain RGB.
fn flatten_over_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        if a == 255 {
            Rgb([r, g, b])
        } else {
            let blend = |c: u8| -> u8 {
                ((u16::from(c) * u16::from(a) + 255 * u16::from(255 - a)) / 255) as u8
            };
            Rgb([blend(r), blend(g), blend(b)])
        }
    })
}
