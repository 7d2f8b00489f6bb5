// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the partition engine: full resize-and-tile pass on
// a small synthetic image.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, Rgba, RgbaImage};

use plakat_core::types::{GridShape, ResizeMode};
use plakat_partition::{resize_to_canvas, TileSequencer};

/// Resize a 640x360 synthetic image onto a 900x1200 canvas and stream all
/// nine tiles off it. Small enough to iterate quickly, but it exercises the
/// same Lanczos + per-tile copy path as a full-size poster run.
fn bench_resize_and_tile(c: &mut Criterion) {
    let source = DynamicImage::ImageRgba8(RgbaImage::from_fn(640, 360, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    }));
    let grid = GridShape::new(3, 3).expect("3x3 grid");

    c.bench_function("resize_and_tile (640x360 -> 3x3)", |b| {
        b.iter(|| {
            let canvas =
                resize_to_canvas(black_box(&source), 900, 1200, ResizeMode::Maintain).unwrap();
            let seq = TileSequencer::new(&canvas, grid).unwrap();
            for tile in seq {
                black_box(tile.bounds);
            }
        });
    });
}

criterion_group!(benches, bench_resize_and_tile);
criterion_main!(benches);
