// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page geometry — maps a physical page target (paper size × DPI) and a grid
// shape onto exact pixel dimensions for one cell and for the whole canvas.

use plakat_core::error::{PlakatError, Result};
use plakat_core::types::{GridShape, PageSpec};
use tracing::debug;

/// Upper bound on either canvas axis. Guards against runaway DPI × grid
/// combinations before any allocation happens.
pub const MAX_CANVAS_DIM: u32 = 100_000;

/// Pixel geometry of the working canvas.
///
/// The canvas is an exact integer multiple of the cell size on both axes, so
/// a grid partition of it has no rounding slack: the last row/column boundary
/// lands exactly on the canvas edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub cell_width: u32,
    pub cell_height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub grid: GridShape,
}

impl PageGeometry {
    /// Compute the cell and canvas pixel sizes for a page target and grid.
    ///
    /// Cell size is `round(paper_inches * dpi)` per axis; the canvas is the
    /// cell size multiplied by the grid axis counts.
    pub fn compute(page: &PageSpec, grid: GridShape) -> Result<Self> {
        // Reject out-of-range grids even if the value bypassed GridShape::new.
        GridShape::new(grid.rows, grid.cols)?;

        if page.dpi == 0 {
            return Err(PlakatError::Configuration("dpi must be positive".into()));
        }
        let (w_in, h_in) = page.paper.dimensions_inches();
        if w_in <= 0.0 || h_in <= 0.0 {
            return Err(PlakatError::Configuration(format!(
                "paper dimensions must be positive, got {:.2}in x {:.2}in",
                w_in, h_in
            )));
        }

        let cell_width = (w_in * page.dpi as f64).round() as u32;
        let cell_height = (h_in * page.dpi as f64).round() as u32;

        let canvas_width = cell_width
            .checked_mul(grid.cols)
            .filter(|w| *w <= MAX_CANVAS_DIM);
        let canvas_height = cell_height
            .checked_mul(grid.rows)
            .filter(|h| *h <= MAX_CANVAS_DIM);
        let (canvas_width, canvas_height) = match (canvas_width, canvas_height) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                return Err(PlakatError::Configuration(format!(
                    "canvas {}x{} cells of {}x{} px exceeds the {} px axis limit; reduce dpi or grid size",
                    grid.cols, grid.rows, cell_width, cell_height, MAX_CANVAS_DIM
                )));
            }
        };

        debug!(
            cell_width,
            cell_height,
            canvas_width,
            canvas_height,
            grid = %grid,
            dpi = page.dpi,
            "Computed page geometry"
        );

        Ok(Self {
            cell_width,
            cell_height,
            canvas_width,
            canvas_height,
            grid,
        })
    }

    /// Total tile count for this geometry.
    pub fn tile_count(&self) -> u32 {
        self.grid.cells()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plakat_core::types::PaperSize;

    /// A4 at 300 DPI with a 3x3 grid: the reference example. 8.27in x 300 =
    /// 2481, 11.69in x 300 = 3507, canvas = 3x each.
    #[test]
    fn a4_300dpi_3x3_reference_geometry() {
        let geom =
            PageGeometry::compute(&PageSpec::a4(300), GridShape::new(3, 3).unwrap()).unwrap();
        assert_eq!(geom.cell_width, 2481);
        assert_eq!(geom.cell_height, 3507);
        assert_eq!(geom.canvas_width, 7443);
        assert_eq!(geom.canvas_height, 10521);
        assert_eq!(geom.tile_count(), 9);
    }

    #[test]
    fn canvas_is_exact_multiple_of_cell() {
        for (rows, cols) in [(1, 1), (2, 5), (10, 10), (20, 5), (1, 20)] {
            let grid = GridShape::new(rows, cols).unwrap();
            let geom = PageGeometry::compute(&PageSpec::a4(150), grid).unwrap();
            assert_eq!(geom.canvas_width, geom.cell_width * cols);
            assert_eq!(geom.canvas_height, geom.cell_height * rows);
        }
    }

    #[test]
    fn oversized_grid_axis_rejected() {
        let grid = GridShape { rows: 21, cols: 1 };
        assert!(matches!(
            PageGeometry::compute(&PageSpec::a4(300), grid),
            Err(PlakatError::Configuration(_))
        ));
    }

    #[test]
    fn zero_dpi_rejected() {
        let page = PageSpec::a4(0);
        assert!(PageGeometry::compute(&page, GridShape::new(2, 2).unwrap()).is_err());
    }

    #[test]
    fn runaway_canvas_rejected() {
        // 20 columns of A4 at 1200 DPI: 20 * 9924 px is within bounds, but a
        // huge custom paper pushes past the axis limit.
        let page = PageSpec {
            paper: PaperSize::Custom {
                width_mm: 5000.0,
                height_mm: 297.0,
            },
            dpi: 1200,
        };
        assert!(PageGeometry::compute(&page, GridShape::new(1, 20).unwrap()).is_err());
    }

    #[test]
    fn degenerate_custom_paper_rejected() {
        let page = PageSpec {
            paper: PaperSize::Custom {
                width_mm: -10.0,
                height_mm: 297.0,
            },
            dpi: 300,
        };
        assert!(PageGeometry::compute(&page, GridShape::new(1, 1).unwrap()).is_err());
    }
}
