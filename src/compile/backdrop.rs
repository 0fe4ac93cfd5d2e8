//! Editor-chrome backdrop: the simulated code editor that every gaze layer
//! draws over. Pure function of the source file and token map, so it is
//! identical across frames of a session.

use kurbo::{Cap, Join, Shape, Stroke, StrokeOpts};

use crate::compile::plan::{DrawOp, TextAlign};
use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::session::model::SourceFile;
use crate::session::tokens::{TokenMap, token_color};

/// Vertical advance of one text row in surface units.
pub const LINE_HEIGHT: f64 = 20.0;
/// Left edge of the code column.
pub const CODE_X: f64 = 150.0;
/// Horizontal advance per character of monospace source text.
pub const CHAR_ADVANCE: f64 = 8.0;

const BACKGROUND: Rgba8 = Rgba8::rgb(0x1e, 0x1e, 0x1e);
const SIDEBAR: Rgba8 = Rgba8::rgb(0x25, 0x25, 0x26);
const CHROME_LINE: Rgba8 = Rgba8::rgb(0x3e, 0x3e, 0x3e);
const TOP_BAR: Rgba8 = Rgba8::rgb(0x2d, 0x2d, 0x30);
const GUTTER_TEXT: Rgba8 = Rgba8::rgb(0x85, 0x85, 0x85);
const TAB_TEXT: Rgba8 = Rgba8::rgb(0xcc, 0xcc, 0xcc);
const CARET: Rgba8 = Rgba8::rgb(0xff, 0xff, 0xff);

const SIDEBAR_WIDTH: f64 = 60.0;
const DIVIDER_X: f64 = 140.0;
const TOP_BAR_HEIGHT: f64 = 30.0;
const TAB_X0: f64 = 140.0;
const TAB_X1: f64 = 240.0;
const GUTTER_NUMBER_X: f64 = 130.0;
const GUTTER_BASELINE_NUDGE: f64 = 5.0;
const CODE_SIZE: f32 = 14.0;
const TAB_LABEL_SIZE: f32 = 12.0;
const TAB_LABEL_X: f64 = 150.0;
const TAB_LABEL_BASELINE: f64 = 20.0;
const CARET_X: f64 = 250.0;
const CARET_Y: f64 = 145.0;
const CARET_WIDTH: f64 = 2.0;
const CARET_HEIGHT: f64 = 18.0;

/// Compiles the editor backdrop for `source` and its token map.
///
/// Fills and the gutter divider come first, then gutter numbers and token
/// text, then the top bar and file tab so overlong rows tuck underneath,
/// then the caret.
pub(crate) fn compile_backdrop(
    canvas: Canvas,
    source: &SourceFile,
    tokens: &TokenMap,
) -> Vec<DrawOp> {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let mut ops = Vec::new();

    ops.push(DrawOp::FillRect {
        rect: Rect::new(0.0, 0.0, w, h),
        color: BACKGROUND,
    });
    ops.push(DrawOp::FillRect {
        rect: Rect::new(0.0, 0.0, SIDEBAR_WIDTH, h),
        color: SIDEBAR,
    });
    ops.push(DrawOp::FillRect {
        rect: Rect::new(DIVIDER_X - 0.5, 0.0, DIVIDER_X + 0.5, h),
        color: CHROME_LINE,
    });

    // Gutter numbers for every row whose baseline lands on the surface.
    let rows = ((h - GUTTER_BASELINE_NUDGE) / LINE_HEIGHT) as u32;
    for row in 1..=rows {
        ops.push(DrawOp::Label {
            text: row.to_string(),
            origin: Point::new(
                GUTTER_NUMBER_X,
                f64::from(row) * LINE_HEIGHT + GUTTER_BASELINE_NUDGE,
            ),
            size_px: CODE_SIZE,
            color: GUTTER_TEXT,
            align: TextAlign::Right,
        });
    }

    for token in tokens.iter() {
        let y = f64::from(token.start.line) * LINE_HEIGHT;
        if y > h {
            continue;
        }
        let x = CODE_X + f64::from(token.start.column.saturating_sub(1)) * CHAR_ADVANCE;
        ops.push(DrawOp::Label {
            text: token.text.clone(),
            origin: Point::new(x, y),
            size_px: CODE_SIZE,
            color: token_color(&token.kind),
            align: TextAlign::Left,
        });
    }

    ops.push(DrawOp::FillRect {
        rect: Rect::new(0.0, 0.0, w, TOP_BAR_HEIGHT),
        color: TOP_BAR,
    });
    ops.push(DrawOp::FillRect {
        rect: Rect::new(TAB_X0, 0.0, TAB_X1, TOP_BAR_HEIGHT),
        color: BACKGROUND,
    });
    let border = Rect::new(TAB_X0, 0.0, TAB_X1, TOP_BAR_HEIGHT).to_path(0.1);
    let style = Stroke::new(1.0).with_caps(Cap::Butt).with_join(Join::Miter);
    ops.push(DrawOp::FillPath {
        path: kurbo::stroke(border, &style, &StrokeOpts::default(), 0.1),
        color: CHROME_LINE,
    });
    ops.push(DrawOp::Label {
        text: source.basename().to_owned(),
        origin: Point::new(TAB_LABEL_X, TAB_LABEL_BASELINE),
        size_px: TAB_LABEL_SIZE,
        color: TAB_TEXT,
        align: TextAlign::Left,
    });
    ops.push(DrawOp::FillRect {
        rect: Rect::new(CARET_X, CARET_Y, CARET_X + CARET_WIDTH, CARET_Y + CARET_HEIGHT),
        color: CARET,
    });
    ops
}

#[cfg(test)]
#[path = "../../tests/unit/compile/backdrop.rs"]
mod tests;
