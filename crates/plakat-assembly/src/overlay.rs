// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Overlay op-list builders: text captions, corner registration marks, and the
// rule-line grid overlay. Everything here produces plain `Vec<Op>` fragments
// that the writer appends to a page.

use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, Point, Pt, Rgb, TextItem,
};

/// Page margin used by captions and corner marks.
pub const MARGIN_MM: f32 = 5.0;

/// Length of each corner registration mark.
pub const CORNER_MARK_MM: f32 = 10.0;

/// Spacing of the alignment grid overlay rule lines.
pub const GRID_STEP_MM: f32 = 20.0;

pub fn mm_to_pt(mm: f32) -> f32 {
    Mm(mm).into_pt().0
}

/// Estimated rendered width of `text` in points.
///
/// Builtin fonts expose no metrics through printpdf, so centring uses the
/// same average-glyph-width approximation as the text layout code: a
/// Helvetica glyph averages roughly half the font size.
pub fn estimate_text_width_pt(text: &str, font_size_pt: f32) -> f32 {
    text.chars().count() as f32 * 0.50 * font_size_pt
}

/// Op sequence writing `text` with its baseline starting at `(x_pt, y_pt)`.
pub fn text_at(text: &str, x_pt: f32, y_pt: f32, size_pt: f32, font: BuiltinFont) -> Vec<Op> {
    vec![
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point {
                x: Pt(x_pt),
                y: Pt(y_pt),
            },
        },
        Op::SetFontSizeBuiltinFont {
            size: Pt(size_pt),
            font,
        },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font,
        },
        Op::EndTextSection,
    ]
}

/// Op sequence writing `text` horizontally centred on a page of `page_w_pt`.
pub fn text_centered(
    text: &str,
    page_w_pt: f32,
    y_pt: f32,
    size_pt: f32,
    font: BuiltinFont,
) -> Vec<Op> {
    let x = (page_w_pt - estimate_text_width_pt(text, size_pt)) / 2.0;
    text_at(text, x.max(0.0), y_pt, size_pt, font)
}

/// A straight stroke between two points.
pub fn stroke(x0: f32, y0: f32, x1: f32, y1: f32) -> Op {
    Op::DrawLine {
        line: Line {
            points: vec![
                LinePoint {
                    p: Point {
                        x: Pt(x0),
                        y: Pt(y0),
                    },
                    bezier: false,
                },
                LinePoint {
                    p: Point {
                        x: Pt(x1),
                        y: Pt(y1),
                    },
                    bezier: false,
                },
            ],
            is_closed: false,
        },
    }
}

/// A closed rectangle outline with corner `(x, y)` and the given size.
pub fn rect_outline(x: f32, y: f32, w: f32, h: f32) -> Op {
    let corner = |px: f32, py: f32| LinePoint {
        p: Point {
            x: Pt(px),
            y: Pt(py),
        },
        bezier: false,
    };
    Op::DrawLine {
        line: Line {
            points: vec![
                corner(x, y),
                corner(x + w, y),
                corner(x + w, y + h),
                corner(x, y + h),
            ],
            is_closed: true,
        },
    }
}

pub fn outline_color(r: f32, g: f32, b: f32) -> Op {
    Op::SetOutlineColor {
        col: Color::Rgb(Rgb::new(r, g, b, None)),
    }
}

pub fn outline_thickness(pt: f32) -> Op {
    Op::SetOutlineThickness { pt: Pt(pt) }
}

/// Short L-shaped registration marks at the four page corners, for trimming
/// and alignment when taping pages together.
pub fn corner_marks(page_w_pt: f32, page_h_pt: f32) -> Vec<Op> {
    let margin = mm_to_pt(MARGIN_MM);
    let len = mm_to_pt(CORNER_MARK_MM);
    let (w, h) = (page_w_pt, page_h_pt);

    vec![
        outline_color(0.0, 0.0, 0.0),
        outline_thickness(0.2),
        // Top-left
        stroke(margin, h - margin, margin + len, h - margin),
        stroke(margin, h - margin, margin, h - margin - len),
        // Top-right
        stroke(w - margin, h - margin, w - margin - len, h - margin),
        stroke(w - margin, h - margin, w - margin, h - margin - len),
        // Bottom-left
        stroke(margin, margin, margin + len, margin),
        stroke(margin, margin, margin, margin + len),
        // Bottom-right
        stroke(w - margin, margin, w - margin - len, margin),
        stroke(w - margin, margin, w - margin, margin + len),
    ]
}

/// Thin gray rule lines every [`GRID_STEP_MM`] across the whole page, as a
/// visual alignment aid over the tile.
pub fn grid_overlay(page_w_mm: f32, page_h_mm: f32) -> Vec<Op> {
    let page_w_pt = mm_to_pt(page_w_mm);
    let page_h_pt = mm_to_pt(page_h_mm);

    let mut ops = vec![
        Op::SaveGraphicsState,
        outline_color(0.5, 0.5, 0.5),
        outline_thickness(0.1),
    ];

    let mut x_mm = 0.0;
    while x_mm < page_w_mm {
        let x = mm_to_pt(x_mm);
        ops.push(stroke(x, 0.0, x, page_h_pt));
        x_mm += GRID_STEP_MM;
    }
    let mut y_mm = 0.0;
    while y_mm < page_h_mm {
        let y = mm_to_pt(y_mm);
        ops.push(stroke(0.0, y, page_w_pt, y));
        y_mm += GRID_STEP_MM;
    }

    ops.push(Op::RestoreGraphicsState);
    ops
}

/// Pull every written string out of an op list, in emission order. Test
/// support for asserting on page content without parsing PDF output.
#[cfg(test)]
pub(crate) fn texts_in(ops: &[Op]) -> Vec<String> {
    ops.iter()
        .filter_map(|op| match op {
            Op::WriteTextBuiltinFont { items, .. } => Some(items),
            _ => None,
        })
        .flat_map(|items| {
            items.iter().filter_map(|item| match item {
                TextItem::Text(s) => Some(s.clone()),
                _ => None,
            })
        })
        .collect()
}
