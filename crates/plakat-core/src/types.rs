// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Plakat poster tiler.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PlakatError;

/// Largest allowed value for either grid axis.
pub const MAX_GRID_AXIS: u32 = 20;

/// Largest allowed total cell count (rows × cols).
pub const MAX_GRID_CELLS: u32 = 100;

/// Lowest DPI accepted for print output.
pub const MIN_DPI: u32 = 72;

/// Highest DPI accepted for print output.
pub const MAX_DPI: u32 = 1200;

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f64, height_mm: f64 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::A3 => (297.0, 420.0),
            Self::A5 => (148.0, 210.0),
            Self::Letter => (216.0, 279.0),
            Self::Legal => (216.0, 356.0),
            Self::Tabloid => (279.0, 432.0),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in inches (width, height). Used when mapping DPI to pixels.
    ///
    /// Standard sizes use the two-decimal print convention (A4 is 8.27 x
    /// 11.69 in), so an A4 cell at 300 DPI is exactly 2481 x 3507 px.
    pub fn dimensions_inches(&self) -> (f64, f64) {
        match self {
            Self::A4 => (8.27, 11.69),
            Self::A3 => (11.69, 16.54),
            Self::A5 => (5.83, 8.27),
            Self::Letter => (8.5, 11.0),
            Self::Legal => (8.5, 14.0),
            Self::Tabloid => (11.0, 17.0),
            Self::Custom {
                width_mm,
                height_mm,
            } => (width_mm / 25.4, height_mm / 25.4),
        }
    }
}

/// Physical page target: paper size plus print resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub paper: PaperSize,
    pub dpi: u32,
}

impl PageSpec {
    pub fn a4(dpi: u32) -> Self {
        Self {
            paper: PaperSize::A4,
            dpi,
        }
    }
}

/// Rows × columns partition of the canvas. Each cell is one output tile/page.
///
/// A 1-D strip is a grid with one axis fixed at 1. Tiles are numbered in
/// reading order: row-major, top row left-to-right, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: u32,
    pub cols: u32,
}

impl GridShape {
    /// Create a grid, enforcing the axis and total-cell ceilings.
    pub fn new(rows: u32, cols: u32) -> Result<Self, PlakatError> {
        if rows == 0 || cols == 0 {
            return Err(PlakatError::Configuration(format!(
                "grid rows and cols must be positive, got {}x{}",
                rows, cols
            )));
        }
        if rows > MAX_GRID_AXIS || cols > MAX_GRID_AXIS {
            return Err(PlakatError::Configuration(format!(
                "each grid dimension must be <= {}, got {}x{}",
                MAX_GRID_AXIS, rows, cols
            )));
        }
        if rows * cols > MAX_GRID_CELLS {
            return Err(PlakatError::Configuration(format!(
                "total pages (rows x cols) must be <= {}, got {}",
                MAX_GRID_CELLS,
                rows * cols
            )));
        }
        Ok(Self { rows, cols })
    }

    /// 1-D strip of `n` pages stacked top to bottom.
    pub fn strip_vertical(n: u32) -> Result<Self, PlakatError> {
        Self::new(n, 1)
    }

    /// 1-D strip of `n` pages side by side.
    pub fn strip_horizontal(n: u32) -> Result<Self, PlakatError> {
        Self::new(1, n)
    }

    /// Total number of cells.
    pub fn cells(&self) -> u32 {
        self.rows * self.cols
    }

    /// 1-based reading-order index of the cell at `(row, col)` (also 1-based).
    ///
    /// This is the single source of truth for tile numbering: the sequencer,
    /// the instructions diagram, and the duplex back pages all go through it.
    pub fn index_of(&self, row: u32, col: u32) -> u32 {
        (row - 1) * self.cols + col
    }

    /// Inverse of [`index_of`](Self::index_of): `(row, col)` for a 1-based index.
    pub fn position(&self, index: u32) -> (u32, u32) {
        let row = (index - 1) / self.cols + 1;
        let col = (index - 1) % self.cols + 1;
        (row, col)
    }
}

impl FromStr for GridShape {
    type Err = PlakatError;

    /// Parse a grid spec like `3x3` or `2X4` (also accepts the `×` glyph).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed
            .splitn(2, ['x', 'X', '×'])
            .map(str::trim)
            .collect();
        let invalid = || {
            PlakatError::Configuration(format!("invalid grid spec '{}', expected RxC like 3x3", s))
        };
        if parts.len() != 2 {
            return Err(invalid());
        }
        let rows: u32 = parts[0].parse().map_err(|_| invalid())?;
        let cols: u32 = parts[1].parse().map_err(|_| invalid())?;
        Self::new(rows, cols)
    }
}

impl std::fmt::Display for GridShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Policy for reconciling the source aspect ratio with the canvas aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// Scale to fit within the canvas, preserving aspect ratio; letterbox the
    /// remainder with a transparent background.
    #[default]
    Maintain,
    /// Scale each axis independently to exactly fill the canvas.
    Stretch,
    /// Scale to cover the canvas, preserving aspect ratio; centre-crop excess.
    Crop,
    /// Like Maintain, but the border fill is opaque white.
    PadWhite,
    /// Like Maintain, but the border fill is opaque black.
    PadBlack,
}

impl FromStr for ResizeMode {
    type Err = PlakatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "maintain" => Ok(Self::Maintain),
            "stretch" => Ok(Self::Stretch),
            "crop" => Ok(Self::Crop),
            "pad_white" => Ok(Self::PadWhite),
            "pad_black" => Ok(Self::PadBlack),
            other => Err(PlakatError::Configuration(format!(
                "unknown resize mode '{}' (expected maintain, stretch, crop, pad_white, or pad_black)",
                other
            ))),
        }
    }
}

/// Half-open pixel rectangle `[x0, x1) × [y0, y1)` of one tile on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileBounds {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl TileBounds {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}
