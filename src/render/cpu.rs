//! CPU raster backend powered by `vello_cpu`, with Parley for label layout.
//!
//! The backend holds its raster context and font machinery across frames, so
//! interactive replay does not reallocate per tick. Text is optional: without
//! a configured label font, label ops are skipped (and counted), while all
//! geometry still renders.

use std::sync::Arc;

use kurbo::PathEl;

use crate::compile::plan::{DrawOp, RenderPlan, TextAlign};
use crate::foundation::core::{Affine, BezPath, Rgba8};
use crate::foundation::error::{GazelineError, GazelineResult};
use crate::render::backend::{FrameRGBA, RenderBackend};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
struct LabelBrush {
    /// Red channel.
    r: u8,
    /// Green channel.
    g: u8,
    /// Blue channel.
    b: u8,
    /// Alpha channel.
    a: u8,
}

/// Stateful helper for building Parley layouts from the configured label font.
struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<LabelBrush>,
    family: Option<String>,
}

impl TextLayoutEngine {
    fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            family: None,
        }
    }

    /// Register the label font once; later layouts resolve it by family name.
    fn register_font(&mut self, font_bytes: &[u8]) -> GazelineResult<()> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            GazelineError::validation("no font families registered from font bytes")
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| GazelineError::validation("registered font family has no name"))?
            .to_string();
        self.family = Some(family_name);
        Ok(())
    }

    /// Shape and lay out a single-line label in the registered font.
    fn layout_label(
        &mut self,
        text: &str,
        size_px: f32,
        brush: LabelBrush,
    ) -> GazelineResult<parley::Layout<LabelBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(GazelineError::validation(
                "label size_px must be finite and > 0",
            ));
        }
        let family = self
            .family
            .clone()
            .ok_or_else(|| GazelineError::evaluation("no label font registered"))?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<LabelBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// CPU backend powered by `vello_cpu` for vector/text rasterization.
pub struct CpuRenderer {
    ctx: Option<vello_cpu::RenderContext>,
    text_engine: TextLayoutEngine,
    label_font: Option<vello_cpu::peniko::FontData>,
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuRenderer {
    /// Construct a backend without a label font. Label ops are skipped.
    pub fn new() -> Self {
        Self {
            ctx: None,
            text_engine: TextLayoutEngine::new(),
            label_font: None,
        }
    }

    /// Construct a backend that renders labels with the given font bytes
    /// (TTF/OTF). The first face in the blob is used.
    pub fn with_label_font(font_bytes: Vec<u8>) -> GazelineResult<Self> {
        let mut text_engine = TextLayoutEngine::new();
        text_engine.register_font(&font_bytes)?;
        let label_font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            ctx: None,
            text_engine,
            label_font: Some(label_font),
        })
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> GazelineResult<R>,
    ) -> GazelineResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn exec_op(
        &mut self,
        op: &DrawOp,
        ctx: &mut vello_cpu::RenderContext,
        skipped_labels: &mut usize,
    ) -> GazelineResult<()> {
        match op {
            DrawOp::FillRect { rect, color } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    rect.x0, rect.y0, rect.x1, rect.y1,
                ));
                Ok(())
            }
            DrawOp::FillPath { path, color } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color_to_cpu(*color));
                let cpu_path = bezpath_to_cpu(path);
                ctx.fill_path(&cpu_path);
                Ok(())
            }
            DrawOp::Blit { image } => {
                let paint = rgba_straight_to_image_premul(&image.rgba, image.width, image.height)?;
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(image.width),
                    f64::from(image.height),
                ));
                Ok(())
            }
            DrawOp::Label {
                text,
                origin,
                size_px,
                color,
                align,
            } => {
                let Some(font) = self.label_font.clone() else {
                    *skipped_labels += 1;
                    return Ok(());
                };
                let brush = LabelBrush {
                    r: color.r,
                    g: color.g,
                    b: color.b,
                    a: color.a,
                };
                let layout = self.text_engine.layout_label(text, *size_px, brush)?;

                // Layout coordinates run from the top-left of the text box;
                // the op's origin anchors the first baseline instead.
                let dx = match align {
                    TextAlign::Left => 0.0,
                    TextAlign::Center => -f64::from(layout.width()) / 2.0,
                    TextAlign::Right => -f64::from(layout.width()),
                };
                let baseline = layout
                    .lines()
                    .next()
                    .map(|line| line.metrics().baseline)
                    .unwrap_or(0.0);
                ctx.set_transform(affine_to_cpu(Affine::translate((
                    origin.x + dx,
                    origin.y - f64::from(baseline),
                ))));

                for line in layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        let b = run.style().brush;
                        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(b.r, b.g, b.b, b.a));
                        let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        ctx.glyph_run(&font)
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
                Ok(())
            }
        }
    }
}

impl RenderBackend for CpuRenderer {
    fn render_plan(&mut self, plan: &RenderPlan) -> GazelineResult<FrameRGBA> {
        let width = plan.canvas.width;
        let height = plan.canvas.height;
        let w: u16 = width
            .try_into()
            .map_err(|_| GazelineError::evaluation("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| GazelineError::evaluation("surface height exceeds u16"))?;

        self.with_ctx_mut(w, h, |this, ctx| {
            let mut skipped_labels = 0usize;
            for pass in &plan.passes {
                for op in &pass.ops {
                    this.exec_op(op, ctx, &mut skipped_labels)?;
                }
            }
            if skipped_labels > 0 {
                tracing::debug!(skipped_labels, "no label font configured; labels skipped");
            }

            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            ctx.render_to_pixmap(&mut pixmap);
            Ok(FrameRGBA {
                width,
                height,
                data: pixmap.data_as_u8_slice().to_vec(),
                premultiplied: true,
            })
        })
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> GazelineResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| GazelineError::evaluation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| GazelineError::evaluation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(GazelineError::evaluation("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; these bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn rgba_straight_to_image_premul(
    bytes_rgba: &[u8],
    width: u32,
    height: u32,
) -> GazelineResult<vello_cpu::Image> {
    let mut tmp = bytes_rgba.to_vec();
    premultiply_rgba8_in_place(&mut tmp);
    let pixmap = pixmap_from_premul_bytes(&tmp, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
