// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tile sequencer — lazily extracts grid cells from the canvas in reading
// order. At most one tile's pixel data is materialised at a time; the canvas
// itself is only borrowed. Abandoning the iterator mid-way needs no cleanup.

use image::{imageops, RgbaImage};
use plakat_core::error::{PlakatError, Result};
use plakat_core::types::{GridShape, TileBounds};
use tracing::{debug, trace};

/// One grid cell extracted from the canvas, corresponding to one printable
/// page. `index` is 1-based reading order; `row`/`col` are 1-based.
#[derive(Debug, Clone)]
pub struct Tile {
    pub index: u32,
    pub row: u32,
    pub col: u32,
    pub bounds: TileBounds,
    pub image: RgbaImage,
}

/// Lazy, finite, non-restartable sequence of [`Tile`]s in strict reading
/// order (row-major, 1-based).
///
/// Remainder policy: the per-cell size is `floor(canvas / axis)` and the last
/// row/column absorbs any remainder, so the final boundary always equals the
/// canvas edge. Canvases produced by `PageGeometry` + `resize_to_canvas` are
/// exact multiples and all cells come out equal.
///
/// The cursor (`next_index`) is plain state: partial consumption and
/// cancellation are directly testable, and `position()`/`remaining()` expose
/// it for progress reporting.
pub struct TileSequencer<'a> {
    canvas: &'a RgbaImage,
    grid: GridShape,
    cell_width: u32,
    cell_height: u32,
    next_index: u32,
}

impl<'a> TileSequencer<'a> {
    /// Create a sequencer over `canvas` for `grid`.
    ///
    /// Fails when the canvas is too small to give every cell at least one
    /// pixel on each axis.
    pub fn new(canvas: &'a RgbaImage, grid: GridShape) -> Result<Self> {
        let cell_width = canvas.width() / grid.cols;
        let cell_height = canvas.height() / grid.rows;
        if cell_width == 0 || cell_height == 0 {
            return Err(PlakatError::Configuration(format!(
                "canvas {}x{} too small for a {} grid",
                canvas.width(),
                canvas.height(),
                grid
            )));
        }

        debug!(
            canvas_w = canvas.width(),
            canvas_h = canvas.height(),
            grid = %grid,
            cell_width,
            cell_height,
            "Tile sequencer ready"
        );

        Ok(Self {
            canvas,
            grid,
            cell_width,
            cell_height,
            next_index: 1,
        })
    }

    /// Pixel bounds of the tile at a 1-based reading-order index.
    pub fn bounds_of(&self, index: u32) -> TileBounds {
        let (row, col) = self.grid.position(index);
        let x0 = (col - 1) * self.cell_width;
        let y0 = (row - 1) * self.cell_height;
        // Last row/column absorbs the remainder.
        let x1 = if col == self.grid.cols {
            self.canvas.width()
        } else {
            col * self.cell_width
        };
        let y1 = if row == self.grid.rows {
            self.canvas.height()
        } else {
            row * self.cell_height
        };
        TileBounds { x0, y0, x1, y1 }
    }

    /// `(row, col)` of the tile the next `next()` call will produce, or
    /// `None` when the sequence is exhausted.
    pub fn position(&self) -> Option<(u32, u32)> {
        (self.next_index <= self.grid.cells()).then(|| self.grid.position(self.next_index))
    }

    /// Number of tiles not yet produced.
    pub fn remaining(&self) -> u32 {
        self.grid.cells() - (self.next_index - 1)
    }

    /// Total tiles in the sequence.
    pub fn total(&self) -> u32 {
        self.grid.cells()
    }
}

impl Iterator for TileSequencer<'_> {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        if self.next_index > self.grid.cells() {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;

        let (row, col) = self.grid.position(index);
        let bounds = self.bounds_of(index);

        // The only materialisation point: one tile-sized copy off the
        // borrowed canvas.
        let image = imageops::crop_imm(self.canvas, bounds.x0, bounds.y0, bounds.width(), bounds.height())
            .to_image();

        trace!(index, row, col, ?bounds, "Extracted tile");

        Some(Tile {
            index,
            row,
            col,
            bounds,
            image,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileSequencer<'_> {}
