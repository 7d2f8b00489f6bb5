// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Memory estimator — projects the peak footprint of a configuration before
// any pixels are allocated. The streaming tile contract keeps at most one
// tile plus the full canvas resident, so the projection is canvas + one tile
// + a fixed working overhead, never a per-tile accumulation.

use plakat_core::error::{PlakatError, Result};
use tracing::{debug, warn};

/// Fixed allowance for decoder scratch space, encoder buffers, and the
/// in-flight PDF op list.
pub const WORKING_OVERHEAD_BYTES: u64 = 16 * 1024 * 1024;

/// Bytes per pixel of the RGBA working representation.
pub const BYTES_PER_PIXEL_RGBA: u64 = 4;

/// Projected memory footprint for a tiling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryEstimate {
    pub canvas_bytes: u64,
    pub per_tile_bytes: u64,
    pub peak_bytes: u64,
}

/// Non-fatal advisory produced when the projection exceeds a threshold.
/// Surfaced to the caller, who decides whether to proceed; never aborts
/// processing on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceAdvisory {
    pub peak_bytes: u64,
    pub threshold_bytes: u64,
    pub message: String,
}

impl MemoryEstimate {
    /// Project peak memory for a canvas of `canvas_w` x `canvas_h` pixels at
    /// `bytes_per_pixel`, split into `tile_count` tiles.
    pub fn project(
        canvas_w: u32,
        canvas_h: u32,
        bytes_per_pixel: u32,
        tile_count: u32,
    ) -> Result<Self> {
        if tile_count == 0 || bytes_per_pixel == 0 {
            return Err(PlakatError::Configuration(
                "tile count and bytes per pixel must be positive".into(),
            ));
        }

        let canvas_bytes =
            u64::from(canvas_w) * u64::from(canvas_h) * u64::from(bytes_per_pixel);
        // One tile; tiles divide the canvas, rounded up for uneven splits.
        let per_tile_bytes = canvas_bytes.div_ceil(u64::from(tile_count));
        let peak_bytes = canvas_bytes + per_tile_bytes + WORKING_OVERHEAD_BYTES;

        debug!(
            canvas_bytes,
            per_tile_bytes, peak_bytes, tile_count, "Projected memory footprint"
        );

        Ok(Self {
            canvas_bytes,
            per_tile_bytes,
            peak_bytes,
        })
    }

    /// Check the projection against an advisory threshold.
    ///
    /// Returns `Some` with a caller-facing message when the projected peak
    /// exceeds `threshold_bytes`; the caller decides whether to proceed.
    pub fn advisory(&self, threshold_bytes: u64) -> Option<ResourceAdvisory> {
        if self.peak_bytes <= threshold_bytes {
            return None;
        }
        let peak_mb = self.peak_bytes / (1024 * 1024);
        let threshold_mb = threshold_bytes / (1024 * 1024);
        warn!(peak_mb, threshold_mb, "Projected peak memory exceeds threshold");
        Some(ResourceAdvisory {
            peak_bytes: self.peak_bytes,
            threshold_bytes,
            message: format!(
                "projected peak memory {} MB exceeds the {} MB advisory threshold; \
                 consider reducing dpi or grid size",
                peak_mb, threshold_mb
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_accounts_for_canvas_one_tile_and_overhead() {
        let est = MemoryEstimate::project(1000, 1000, 4, 4).unwrap();
        assert_eq!(est.canvas_bytes, 4_000_000);
        assert_eq!(est.per_tile_bytes, 1_000_000);
        assert_eq!(est.peak_bytes, 5_000_000 + WORKING_OVERHEAD_BYTES);
    }

    #[test]
    fn estimate_monotone_in_resolution() {
        let mut last = 0u64;
        for dim in [500u32, 1000, 2000, 7443, 20_000] {
            let est = MemoryEstimate::project(dim, dim, 4, 9).unwrap();
            assert!(est.peak_bytes >= last);
            last = est.peak_bytes;
        }
    }

    #[test]
    fn estimate_does_not_scale_with_tile_count() {
        // The streaming contract means more tiles never cost more memory:
        // each tile only gets smaller.
        let few = MemoryEstimate::project(8000, 8000, 4, 4).unwrap();
        let many = MemoryEstimate::project(8000, 8000, 4, 100).unwrap();
        assert!(many.peak_bytes <= few.peak_bytes);
        assert_eq!(many.canvas_bytes, few.canvas_bytes);
    }

    #[test]
    fn advisory_only_above_threshold() {
        let est = MemoryEstimate::project(7443, 10521, 4, 9).unwrap();
        assert!(est.advisory(u64::MAX).is_none());

        let advisory = est.advisory(1024 * 1024).expect("should warn");
        assert_eq!(advisory.peak_bytes, est.peak_bytes);
        assert!(advisory.message.contains("advisory threshold"));
    }

    #[test]
    fn zero_tile_count_rejected() {
        assert!(MemoryEstimate::project(100, 100, 4, 0).is_err());
    }
}
