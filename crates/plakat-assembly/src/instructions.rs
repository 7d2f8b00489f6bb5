// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Instructions page and duplex back pages. Both render a miniature version of
// the grid; cell numbering always goes through `GridShape::index_of`, the
// same reading-order source the tile sequencer uses.

use plakat_core::types::GridShape;
use printpdf::{BuiltinFont, Color, Op, Rgb};

use crate::overlay::{
    estimate_text_width_pt, mm_to_pt, outline_color, outline_thickness, rect_outline, stroke,
    text_at, text_centered,
};

const LINE_HEIGHT_PT: f32 = 20.0;

fn fill_black() -> Op {
    Op::SetFillColor {
        col: Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)),
    }
}

fn fill_gray() -> Op {
    Op::SetFillColor {
        col: Color::Rgb(Rgb::new(0.5, 0.5, 0.5, None)),
    }
}

/// Op list for the leading assembly-instructions page: title, layout
/// summary, numbered steps, and a miniature diagram of the grid with each
/// cell labelled by its 1-based reading-order index.
pub fn instructions_page(page_w_pt: f32, page_h_pt: f32, grid: GridShape) -> Vec<Op> {
    let mut ops = vec![fill_black()];

    ops.extend(text_centered(
        "Poster Assembly Instructions",
        page_w_pt,
        page_h_pt - 40.0,
        24.0,
        BuiltinFont::HelveticaBold,
    ));
    ops.push(outline_color(0.0, 0.0, 0.0));
    ops.push(outline_thickness(1.0));
    ops.push(stroke(40.0, page_h_pt - 50.0, page_w_pt - 40.0, page_h_pt - 50.0));

    let mut y = page_h_pt - 80.0;
    ops.extend(text_at(
        &format!("Total parts: {}", grid.cells()),
        40.0,
        y,
        12.0,
        BuiltinFont::Helvetica,
    ));
    y -= LINE_HEIGHT_PT;
    ops.extend(text_at(
        &format!("Arrangement: {} row(s) x {} column(s)", grid.rows, grid.cols),
        40.0,
        y,
        12.0,
        BuiltinFont::Helvetica,
    ));
    y -= LINE_HEIGHT_PT * 2.0;

    ops.extend(text_at(
        "Assembly Steps:",
        40.0,
        y,
        14.0,
        BuiltinFont::HelveticaBold,
    ));
    y -= LINE_HEIGHT_PT * 1.5;

    let steps = [
        "1. Print all pages at 100% scale (no scaling/resizing).",
        "2. Cut along the edges of each part if needed.",
        "3. Arrange the parts in order according to the page numbers.",
        "4. Arrange in a grid: top row left to right, then each row below.",
        "5. Use the corner marks and TOP indicators to ensure proper alignment.",
        "6. Tape or glue the parts together from the back side.",
        "7. For best results, use a straight edge when joining parts.",
    ];
    for step in steps {
        ops.extend(text_at(step, 40.0, y, 12.0, BuiltinFont::Helvetica));
        y -= LINE_HEIGHT_PT;
    }
    y -= LINE_HEIGHT_PT;

    ops.extend(text_at(
        "Layout Diagram:",
        40.0,
        y,
        14.0,
        BuiltinFont::HelveticaBold,
    ));
    y -= LINE_HEIGHT_PT * 1.5;

    ops.extend(layout_diagram(page_w_pt, y, grid));

    ops.extend(text_centered(
        "Created with Plakat",
        page_w_pt,
        20.0,
        10.0,
        BuiltinFont::Helvetica,
    ));

    ops
}

/// The miniature grid diagram, anchored with its top edge at `top_y`.
fn layout_diagram(page_w_pt: f32, top_y: f32, grid: GridShape) -> Vec<Op> {
    let (rows, cols) = (grid.rows as f32, grid.cols as f32);

    // Base 300x200 pt, stretched toward the true layout aspect.
    let mut diagram_w = 300.0;
    let mut diagram_h = 200.0;
    if rows > cols {
        diagram_h = (diagram_w * rows / cols).min(300.0);
    } else {
        diagram_w = (diagram_h * cols / rows).min(400.0);
    }
    let cell_w = diagram_w / cols;
    let cell_h = diagram_h / rows;
    let start_x = (page_w_pt - diagram_w) / 2.0;
    let start_y = top_y - diagram_h;

    let mut ops = vec![outline_color(0.0, 0.0, 0.0), outline_thickness(2.0)];
    for i in 0..=grid.rows {
        let y = start_y + i as f32 * cell_h;
        ops.push(stroke(start_x, y, start_x + diagram_w, y));
    }
    for i in 0..=grid.cols {
        let x = start_x + i as f32 * cell_w;
        ops.push(stroke(x, start_y, x, start_y + diagram_h));
    }

    // Cell labels in reading order. PDF y runs bottom-up, so row 1 sits at
    // the top band of the diagram.
    for row in 1..=grid.rows {
        for col in 1..=grid.cols {
            let label = grid.index_of(row, col).to_string();
            let x = start_x + (col as f32 - 1.0) * cell_w + cell_w / 2.0
                - estimate_text_width_pt(&label, 16.0) / 2.0;
            let y = start_y + (rows - row as f32) * cell_h + cell_h / 2.0;
            ops.extend(text_at(&label, x, y, 16.0, BuiltinFont::Helvetica));
        }
    }

    ops
}

/// Op list for the blank filler page inserted after the instructions page
/// when duplex back pages are enabled, keeping fronts and backs aligned.
pub fn blank_filler_page(page_w_pt: f32, page_h_pt: f32) -> Vec<Op> {
    let mut ops = vec![fill_gray()];
    ops.extend(text_centered(
        "This page intentionally left blank for duplex printing",
        page_w_pt,
        page_h_pt / 2.0,
        10.0,
        BuiltinFont::Helvetica,
    ));
    ops.push(fill_black());
    ops
}

/// Op list for the duplex back page behind tile `index`: position heading, a
/// mini grid with the current cell drawn with a heavy double border, and
/// neighbour page numbers.
pub fn duplex_back_page(page_w_pt: f32, page_h_pt: f32, grid: GridShape, index: u32) -> Vec<Op> {
    let total = grid.cells();
    let (row, col) = grid.position(index);

    let mut ops = vec![fill_black()];
    ops.extend(text_centered(
        &format!("Page {} of {}", index, total),
        page_w_pt,
        page_h_pt - 50.0,
        24.0,
        BuiltinFont::HelveticaBold,
    ));
    ops.extend(text_centered(
        &format!("Row {}, Column {}", row, col),
        page_w_pt,
        page_h_pt - 80.0,
        16.0,
        BuiltinFont::Helvetica,
    ));

    // Mini grid diagram, centred slightly above the page middle.
    let cell = (mm_to_pt(150.0) / grid.cols as f32).min(mm_to_pt(180.0) / grid.rows as f32);
    let grid_w = cell * grid.cols as f32;
    let grid_h = cell * grid.rows as f32;
    let start_x = (page_w_pt - grid_w) / 2.0;
    let start_y = (page_h_pt - grid_h) / 2.0 - 20.0;

    for r in 1..=grid.rows {
        for c in 1..=grid.cols {
            let cell_index = grid.index_of(r, c);
            let is_current = cell_index == index;
            let x = start_x + (c as f32 - 1.0) * cell;
            let y = start_y + (grid.rows - r) as f32 * cell;

            if is_current {
                // Heavy double border instead of a fill: reads clearly
                // without spending ink.
                ops.push(outline_color(0.0, 0.0, 0.0));
                ops.push(outline_thickness(4.0));
                ops.push(rect_outline(x, y, cell, cell));
                ops.push(outline_thickness(1.0));
                let inset = 3.0;
                ops.push(rect_outline(
                    x + inset,
                    y + inset,
                    cell - 2.0 * inset,
                    cell - 2.0 * inset,
                ));
            } else {
                ops.push(outline_color(0.5, 0.5, 0.5));
                ops.push(outline_thickness(0.5));
                ops.push(rect_outline(x, y, cell, cell));
            }

            let size = if is_current { 16.0 } else { 10.0 };
            let font = if is_current {
                BuiltinFont::HelveticaBold
            } else {
                BuiltinFont::Helvetica
            };
            let label = cell_index.to_string();
            ops.extend(text_at(
                &label,
                x + (cell - estimate_text_width_pt(&label, size)) / 2.0,
                y + cell / 2.0 - size / 3.0,
                size,
                font,
            ));
        }
    }

    let mut y_legend = start_y - 30.0;
    ops.extend(text_centered(
        &format!("Grid: {} rows x {} columns", grid.rows, grid.cols),
        page_w_pt,
        y_legend,
        11.0,
        BuiltinFont::Helvetica,
    ));
    y_legend -= 20.0;
    let hint = if grid.cols > 1 {
        "Arrange left to right, top to bottom"
    } else {
        "Arrange top to bottom"
    };
    ops.extend(text_centered(hint, page_w_pt, y_legend, 11.0, BuiltinFont::Helvetica));
    y_legend -= 30.0;

    let neighbors = neighbor_summary(grid, index);
    if !neighbors.is_empty() {
        ops.extend(text_centered(
            &format!("Neighbors: {}", neighbors.join(" | ")),
            page_w_pt,
            y_legend,
            10.0,
            BuiltinFont::Helvetica,
        ));
    }

    ops.extend(text_centered(
        "Back side for duplex printing - position behind the matching poster piece",
        page_w_pt,
        30.0,
        9.0,
        BuiltinFont::Helvetica,
    ));

    ops
}

/// Page numbers adjacent to `index` in the assembled layout.
fn neighbor_summary(grid: GridShape, index: u32) -> Vec<String> {
    let (row, col) = grid.position(index);
    let mut out = Vec::new();
    if row > 1 {
        out.push(format!("Above: Page {}", index - grid.cols));
    }
    if row < grid.rows {
        out.push(format!("Below: Page {}", index + grid.cols));
    }
    if col > 1 {
        out.push(format!("Left: Page {}", index - 1));
    }
    if col < grid.cols {
        out.push(format!("Right: Page {}", index + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::texts_in;

    #[test]
    fn diagram_labels_follow_reading_order() {
        let grid = GridShape::new(3, 3).unwrap();
        let ops = instructions_page(595.0, 842.0, grid);
        let texts = texts_in(&ops);

        // The nine cell labels appear in reading order 1..=9, matching the
        // tile sequencer's numbering exactly.
        let labels: Vec<&String> = texts
            .iter()
            .filter(|t| t.parse::<u32>().is_ok())
            .collect();
        assert_eq!(
            labels.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            vec!["1", "2", "3", "4", "5", "6", "7", "8", "9"]
        );
    }

    #[test]
    fn instructions_mention_arrangement() {
        let grid = GridShape::new(2, 4).unwrap();
        let texts = texts_in(&instructions_page(595.0, 842.0, grid));
        assert!(texts.iter().any(|t| t.contains("Total parts: 8")));
        assert!(texts.iter().any(|t| t.contains("2 row(s) x 4 column(s)")));
    }

    #[test]
    fn duplex_back_page_reports_position_and_neighbors() {
        let grid = GridShape::new(3, 3).unwrap();
        // Centre cell of a 3x3 grid: all four neighbours present.
        let texts = texts_in(&duplex_back_page(595.0, 842.0, grid, 5));
        assert!(texts.iter().any(|t| t == "Page 5 of 9"));
        assert!(texts.iter().any(|t| t == "Row 2, Column 2"));
        let neighbors = texts.iter().find(|t| t.starts_with("Neighbors:")).unwrap();
        assert!(neighbors.contains("Above: Page 2"));
        assert!(neighbors.contains("Below: Page 8"));
        assert!(neighbors.contains("Left: Page 4"));
        assert!(neighbors.contains("Right: Page 6"));
    }

    #[test]
    fn duplex_corner_cell_has_two_neighbors() {
        let grid = GridShape::new(3, 3).unwrap();
        assert_eq!(
            neighbor_summary(grid, 1),
            vec!["Below: Page 4", "Right: Page 2"]
        );
        assert_eq!(
            neighbor_summary(grid, 9),
            vec!["Above: Page 6", "Left: Page 8"]
        );
    }

    #[test]
    fn vertical_strip_back_page_hints_top_to_bottom() {
        let grid = GridShape::strip_vertical(4).unwrap();
        let texts = texts_in(&duplex_back_page(595.0, 842.0, grid, 2));
        assert!(texts.iter().any(|t| t == "Arrange top to bottom"));
        let neighbors = texts.iter().find(|t| t.starts_with("Neighbors:")).unwrap();
        assert!(neighbors.contains("Above: Page 1"));
        assert!(neighbors.contains("Below: Page 3"));
        assert!(!neighbors.contains("Left"));
    }
}
