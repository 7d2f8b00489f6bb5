// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// plakat-partition — Partition engine for the Plakat poster tiler.
//
// Computes the working-canvas geometry from a physical page target, adapts the
// source image onto that canvas under one of five resize policies, and streams
// tiles off the canvas one at a time in reading order. A memory estimator
// projects the peak footprint of a configuration before any pixels move.

pub mod geometry;
pub mod memory;
pub mod resize;
pub mod tiles;

pub use geometry::PageGeometry;
pub use memory::{MemoryEstimate, ResourceAdvisory, BYTES_PER_PIXEL_RGBA};
pub use resize::resize_to_canvas;
pub use tiles::{Tile, TileSequencer};
