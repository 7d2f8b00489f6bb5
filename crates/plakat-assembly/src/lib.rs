// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// plakat-assembly — Assembly generator for the Plakat poster tiler.
//
// Consumes the partition engine's tile stream and produces a paginated PDF:
// one physical page per tile, optional alignment overlays, optional leading
// instructions page, optional duplex back pages, and JPEG compression /
// downsampling of the embedded rasters. Built on `printpdf` 0.8's
// data-oriented API: pages are `Vec<Op>` operation lists serialised via
// `PdfDocument::save()`.

pub mod instructions;
pub mod overlay;
pub mod writer;

pub use writer::{AssemblyDocument, AssemblyWriter};
