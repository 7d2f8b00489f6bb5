// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Resize adapter — transforms the source image into a canvas of exactly the
// target dimensions under one of five aspect-ratio policies. The exact-size
// guarantee is load-bearing: the tile sequencer partitions the result by
// integer arithmetic and assumes no slack.

use image::imageops::FilterType;
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use plakat_core::error::{PlakatError, Result};
use plakat_core::types::ResizeMode;
use tracing::{debug, info, instrument};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Resize `source` onto a canvas of exactly `target_w` x `target_h`.
///
/// All modes use Lanczos3 filtering. `Maintain` letterboxes onto a
/// transparent background; the pad modes use opaque white/black; `Crop`
/// centre-crops the dominant axis; `Stretch` fills both axes ignoring aspect
/// ratio. A source whose aspect ratio already matches the target degenerates
/// to a pure scale in every mode.
#[instrument(skip(source), fields(src_w = source.width(), src_h = source.height(), target_w, target_h, ?mode))]
pub fn resize_to_canvas(
    source: &DynamicImage,
    target_w: u32,
    target_h: u32,
    mode: ResizeMode,
) -> Result<RgbaImage> {
    let (src_w, src_h) = (source.width(), source.height());
    if src_w == 0 || src_h == 0 {
        return Err(PlakatError::InvalidImage(format!(
            "source image has degenerate dimensions {}x{}",
            src_w, src_h
        )));
    }
    if target_w == 0 || target_h == 0 {
        return Err(PlakatError::Configuration(format!(
            "target canvas has degenerate dimensions {}x{}",
            target_w, target_h
        )));
    }

    info!(
        from = format!("{}x{}", src_w, src_h),
        to = format!("{}x{}", target_w, target_h),
        "Resizing source onto canvas"
    );

    let aspect = src_w as f64 / src_h as f64;
    let target_ratio = target_w as f64 / target_h as f64;

    let canvas = match mode {
        ResizeMode::Stretch => source
            .resize_exact(target_w, target_h, FilterType::Lanczos3)
            .to_rgba8(),

        ResizeMode::Crop => {
            // Scale to cover the target, then centre-crop the dominant axis.
            let (cover_w, cover_h) = if aspect > target_ratio {
                (scaled_axis(target_h as f64 * aspect), target_h)
            } else {
                (target_w, scaled_axis(target_w as f64 / aspect))
            };
            let scaled = source.resize_exact(cover_w, cover_h, FilterType::Lanczos3);
            let left = (cover_w - target_w) / 2;
            let top = (cover_h - target_h) / 2;
            debug!(cover_w, cover_h, left, top, "Cover-scaled, centre-cropping");
            scaled.crop_imm(left, top, target_w, target_h).to_rgba8()
        }

        ResizeMode::Maintain | ResizeMode::PadWhite | ResizeMode::PadBlack => {
            // Scale to fit within the target, then letterbox the remainder.
            let (fit_w, fit_h) = if aspect > target_ratio {
                (target_w, scaled_axis(target_w as f64 / aspect))
            } else {
                (scaled_axis(target_h as f64 * aspect), target_h)
            };
            let scaled = source
                .resize_exact(fit_w, fit_h, FilterType::Lanczos3)
                .to_rgba8();

            let fill = match mode {
                ResizeMode::PadWhite => WHITE,
                ResizeMode::PadBlack => BLACK,
                _ => TRANSPARENT,
            };
            let mut canvas = RgbaImage::from_pixel(target_w, target_h, fill);
            let x_off = i64::from((target_w - fit_w) / 2);
            let y_off = i64::from((target_h - fit_h) / 2);
            debug!(fit_w, fit_h, x_off, y_off, "Fit-scaled, letterboxing");
            imageops::overlay(&mut canvas, &scaled, x_off, y_off);
            canvas
        }
    };

    debug_assert_eq!((canvas.width(), canvas.height()), (target_w, target_h));
    Ok(canvas)
}

/// Round a scaled axis length, clamping to at least one pixel so extreme
/// aspect ratios never produce a zero-size intermediate.
fn scaled_axis(len: f64) -> u32 {
    (len.round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_source(w: u32, h: u32, rgba: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba(rgba)))
    }

    const RED: [u8; 4] = [200, 10, 10, 255];

    #[test]
    fn stretch_fills_target_exactly_with_no_padding() {
        let src = solid_source(1000, 500, RED);
        let out = resize_to_canvas(&src, 800, 800, ResizeMode::Stretch).unwrap();
        assert_eq!((out.width(), out.height()), (800, 800));
        // No border pixels of any kind: every pixel comes from the source.
        assert!(out.pixels().all(|p| p.0 == RED));
    }

    #[test]
    fn maintain_letterboxes_wide_source_top_and_bottom() {
        let src = solid_source(1000, 500, RED);
        let out = resize_to_canvas(&src, 800, 800, ResizeMode::Maintain).unwrap();
        assert_eq!((out.width(), out.height()), (800, 800));

        // Fitted content is 800x400 centred vertically; rows above and below
        // stay transparent, content rows stay source-coloured (never cropped).
        assert_eq!(out.get_pixel(400, 0).0[3], 0);
        assert_eq!(out.get_pixel(400, 799).0[3], 0);
        assert_eq!(out.get_pixel(400, 400).0, RED);
        assert_eq!(out.get_pixel(0, 400).0, RED);
        assert_eq!(out.get_pixel(799, 400).0, RED);
    }

    #[test]
    fn pad_modes_fill_border_with_fixed_color() {
        let src = solid_source(500, 1000, RED);
        let white = resize_to_canvas(&src, 800, 800, ResizeMode::PadWhite).unwrap();
        let black = resize_to_canvas(&src, 800, 800, ResizeMode::PadBlack).unwrap();

        // Tall source centred horizontally: left/right columns are padding.
        assert_eq!(white.get_pixel(0, 400).0, [255, 255, 255, 255]);
        assert_eq!(black.get_pixel(0, 400).0, [0, 0, 0, 255]);
        assert_eq!(white.get_pixel(400, 400).0, RED);
        assert_eq!(black.get_pixel(400, 400).0, RED);
    }

    #[test]
    fn crop_fills_target_with_no_border() {
        let src = solid_source(1000, 500, RED);
        let out = resize_to_canvas(&src, 800, 800, ResizeMode::Crop).unwrap();
        assert_eq!((out.width(), out.height()), (800, 800));
        assert!(out.pixels().all(|p| p.0 == RED));
    }

    #[test]
    fn matching_aspect_converges_to_pure_scale_in_all_modes() {
        let src = solid_source(400, 800, RED);
        for mode in [
            ResizeMode::Maintain,
            ResizeMode::Stretch,
            ResizeMode::Crop,
            ResizeMode::PadWhite,
            ResizeMode::PadBlack,
        ] {
            let out = resize_to_canvas(&src, 200, 400, mode).unwrap();
            assert_eq!((out.width(), out.height()), (200, 400));
            assert!(
                out.pixels().all(|p| p.0 == RED),
                "mode {:?} introduced non-source pixels",
                mode
            );
        }
    }

    #[test]
    fn degenerate_source_rejected_before_resize() {
        let src = DynamicImage::ImageRgba8(RgbaImage::new(0, 100));
        assert!(matches!(
            resize_to_canvas(&src, 800, 800, ResizeMode::Maintain),
            Err(PlakatError::InvalidImage(_))
        ));
    }

    #[test]
    fn degenerate_target_rejected() {
        let src = solid_source(10, 10, RED);
        assert!(matches!(
            resize_to_canvas(&src, 0, 800, ResizeMode::Stretch),
            Err(PlakatError::Configuration(_))
        ));
    }

    #[test]
    fn extreme_aspect_never_produces_zero_axis() {
        let src = solid_source(4000, 2, RED);
        let out = resize_to_canvas(&src, 100, 100, ResizeMode::Maintain).unwrap();
        assert_eq!((out.width(), out.height()), (100, 100));
    }
}
