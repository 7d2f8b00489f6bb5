// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Job configuration: constructed and validated once at the boundary, then
// passed immutably through the pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{PlakatError, Result};
use crate::types::{GridShape, PageSpec, ResizeMode, MAX_DPI, MIN_DPI};

/// Toggles and parameters for the assembled PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfOptions {
    /// Leading instructions page with the numbered layout diagram.
    pub instructions: bool,
    /// 20 mm rule-line overlay on each tile page.
    pub grid_overlay: bool,
    /// "Page i of n" caption.
    pub page_numbers: bool,
    /// Corner registration marks for trimming/alignment.
    pub assembly_aids: bool,
    /// Tile pixel-size caption.
    pub dimension_caption: bool,
    /// "TOP" orientation marker for rotation-sensitive assembly.
    pub top_marker: bool,
    /// Creation timestamp caption.
    pub timestamp: bool,
    /// Position-diagram back page behind each tile page (duplex printing).
    pub duplex_back_pages: bool,
    /// Re-encode embedded tiles as JPEG at `quality`.
    pub compress: bool,
    /// JPEG quality factor, 1..=100.
    pub quality: u8,
    /// Downsample embedded tiles to `downsample_dpi` before embedding.
    pub downsample: bool,
    /// Target embed resolution when `downsample` is set.
    pub downsample_dpi: u32,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            instructions: false,
            grid_overlay: false,
            page_numbers: true,
            assembly_aids: true,
            dimension_caption: true,
            top_marker: true,
            timestamp: true,
            duplex_back_pages: false,
            compress: true,
            quality: 90,
            downsample: false,
            downsample_dpi: 300,
        }
    }
}

/// Complete configuration for one tiling job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub grid: GridShape,
    pub page: PageSpec,
    pub resize_mode: ResizeMode,
    pub pdf: PdfOptions,
}

impl JobConfig {
    /// Re-check every boundary invariant. Called once before any image I/O;
    /// all failures here are caller input problems, never retried.
    pub fn validate(&self) -> Result<()> {
        // GridShape::new enforces its own ceilings, but a deserialized config
        // bypasses the constructor.
        GridShape::new(self.grid.rows, self.grid.cols)?;

        if self.page.dpi < MIN_DPI || self.page.dpi > MAX_DPI {
            return Err(PlakatError::Configuration(format!(
                "dpi {} outside the printable range {}..={}",
                self.page.dpi, MIN_DPI, MAX_DPI
            )));
        }

        let (w_mm, h_mm) = self.page.paper.dimensions_mm();
        if w_mm <= 0.0 || h_mm <= 0.0 {
            return Err(PlakatError::Configuration(format!(
                "paper dimensions must be positive, got {}mm x {}mm",
                w_mm, h_mm
            )));
        }

        if self.pdf.quality == 0 || self.pdf.quality > 100 {
            return Err(PlakatError::Configuration(format!(
                "pdf quality must be 1..=100, got {}",
                self.pdf.quality
            )));
        }
        if self.pdf.downsample && self.pdf.downsample_dpi == 0 {
            return Err(PlakatError::Configuration(
                "downsample dpi must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaperSize;

    fn valid_config() -> JobConfig {
        JobConfig {
            grid: GridShape::new(3, 3).unwrap(),
            page: PageSpec::a4(300),
            resize_mode: ResizeMode::Maintain,
            pdf: PdfOptions::default(),
        }
    }

    #[test]
    fn default_config_validates() {
        valid_config().validate().expect("valid");
    }

    #[test]
    fn dpi_outside_printable_range_rejected() {
        let mut cfg = valid_config();
        cfg.page.dpi = 50;
        assert!(cfg.validate().is_err());
        cfg.page.dpi = 1201;
        assert!(cfg.validate().is_err());
        cfg.page.dpi = 72;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialized_grid_is_revalidated() {
        // A grid built by deserialization can carry out-of-range axes.
        let mut cfg = valid_config();
        cfg.grid = GridShape { rows: 21, cols: 1 };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn degenerate_custom_paper_rejected() {
        let mut cfg = valid_config();
        cfg.page.paper = PaperSize::Custom {
            width_mm: 0.0,
            height_mm: 297.0,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn quality_bounds_enforced() {
        let mut cfg = valid_config();
        cfg.pdf.quality = 0;
        assert!(cfg.validate().is_err());
        cfg.pdf.quality = 100;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = valid_config();
        let json = serde_json::to_string(&cfg).expect("serialize");
        let back: JobConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.grid, cfg.grid);
        assert_eq!(back.page.dpi, 300);
        assert_eq!(back.resize_mode, ResizeMode::Maintain);
    }
}
