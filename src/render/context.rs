//! The per-instance drawing context over the CPU rasterizer.

use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{StagefxError, StagefxResult};
use std::collections::HashMap;
use std::sync::Arc;

/// One finished frame: straight-forward premultiplied RGBA8 bytes, row-major.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GlowKey {
    color: [u8; 4],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    top: [u8; 4],
    bottom: [u8; 4],
    h: u32,
}

/// Resolution of the cached radial glow tile; drawn scaled to the requested radius.
const GLOW_TILE: u32 = 128;

/// The shared drawing context handed to every animation instance.
///
/// Wraps a `vello_cpu` render context plus per-context raster caches (radial glows,
/// vertical gradients). All transform and alpha changes are bracketed: every
/// `with_*` helper restores the entry state before returning, so no instance can
/// leak paint state into the next layer or the next frame.
pub struct SceneCtx {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    transform_stack: Vec<Affine>,

    glow_cache: HashMap<GlowKey, vello_cpu::Image>,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
}

impl SceneCtx {
    /// Create a context for a canvas.
    pub fn new(canvas: Canvas) -> StagefxResult<Self> {
        let (w, h) = canvas_u16(canvas)?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            transform_stack: vec![Affine::IDENTITY],
            glow_cache: HashMap::new(),
            gradient_cache: HashMap::new(),
        })
    }

    /// Canvas this context rasterizes to.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Reset drawing state for a new frame. Raster caches survive across frames.
    pub fn begin_frame(&mut self) {
        self.ctx.reset();
        self.transform_stack.clear();
        self.transform_stack.push(Affine::IDENTITY);
        self.apply_transform();
    }

    /// Flush pending geometry and return the rasterized frame.
    pub fn finish_frame(&mut self) -> StagefxResult<FrameRGBA> {
        self.ctx.flush();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.pixmap);
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
        })
    }

    fn current_transform(&self) -> Affine {
        *self
            .transform_stack
            .last()
            .unwrap_or(&Affine::IDENTITY)
    }

    fn apply_transform(&mut self) {
        let t = self.current_transform();
        self.ctx.set_transform(affine_to_cpu(t));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    /// Run `f` with `transform` composed onto the current transform, then restore.
    pub fn with_transform(
        &mut self,
        transform: Affine,
        f: impl FnOnce(&mut Self) -> StagefxResult<()>,
    ) -> StagefxResult<()> {
        let composed = self.current_transform() * transform;
        self.transform_stack.push(composed);
        self.apply_transform();
        let out = f(self);
        self.transform_stack.pop();
        self.apply_transform();
        out
    }

    /// Run `f` inside an opacity layer, then pop it. `alpha` is clamped to `[0, 1]`.
    pub fn with_alpha(
        &mut self,
        alpha: f64,
        f: impl FnOnce(&mut Self) -> StagefxResult<()>,
    ) -> StagefxResult<()> {
        let a = alpha.clamp(0.0, 1.0) as f32;
        self.ctx.push_opacity_layer(a);
        let out = f(self);
        self.ctx.pop_layer();
        out
    }

    /// Fill a rectangle with a solid color.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
    }

    /// Fill a rounded rectangle with a solid color.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) {
        let rr = kurbo::RoundedRect::from_rect(rect, radius);
        let mut p = BezPath::new();
        for el in kurbo::Shape::path_elements(&rr, 0.1) {
            p.push(el);
        }
        self.fill_path(&p, color);
    }

    /// Fill a circle with a solid color.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        let c = kurbo::Circle::new(center, radius.max(0.0));
        let mut p = BezPath::new();
        for el in kurbo::Shape::path_elements(&c, 0.1) {
            p.push(el);
        }
        self.fill_path(&p, color);
    }

    /// Fill an arbitrary path with a solid color.
    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Fill `rect` with a vertical gradient from `top` to `bottom`.
    ///
    /// The gradient strip is rasterized once per `(top, bottom, height)` and cached.
    pub fn fill_vertical_gradient(
        &mut self,
        rect: Rect,
        top: Rgba8,
        bottom: Rgba8,
    ) -> StagefxResult<()> {
        let h = rect.height().max(1.0) as u32;
        let key = GradientKey {
            top: [top.r, top.g, top.b, top.a],
            bottom: [bottom.r, bottom.g, bottom.b, bottom.a],
            h,
        };
        let img = match self.gradient_cache.get(&key) {
            Some(img) => img.clone(),
            None => {
                let img = gradient_strip(top, bottom, h)?;
                self.gradient_cache.insert(key, img.clone());
                img
            }
        };

        // The 1px-wide strip is stretched horizontally across the rect.
        let t = Affine::translate((rect.x0, rect.y0)) * Affine::scale_non_uniform(rect.width(), 1.0);
        self.with_transform(t, |ctx| {
            ctx.ctx.set_paint(img);
            ctx.ctx
                .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, 1.0, f64::from(h)));
            Ok(())
        })
    }

    /// Draw a radial glow: a soft falloff disc of `color`, scaled to `radius` and
    /// modulated by `intensity` in `[0, 1]`.
    ///
    /// The falloff tile is rasterized once per color and cached; per-frame radius
    /// and intensity changes only touch the transform and the opacity layer.
    pub fn fill_radial_glow(
        &mut self,
        center: Point,
        radius: f64,
        color: Rgba8,
        intensity: f64,
    ) -> StagefxResult<()> {
        if radius <= 0.0 || intensity <= 0.0 {
            return Ok(());
        }
        let key = GlowKey {
            color: [color.r, color.g, color.b, color.a],
        };
        let img = match self.glow_cache.get(&key) {
            Some(img) => img.clone(),
            None => {
                let img = glow_tile(color)?;
                self.glow_cache.insert(key, img.clone());
                img
            }
        };

        let tile = f64::from(GLOW_TILE);
        let scale = (radius * 2.0) / tile;
        let t = Affine::translate((center.x - radius, center.y - radius)) * Affine::scale(scale);
        self.with_alpha(intensity, |ctx| {
            ctx.with_transform(t, |ctx| {
                ctx.ctx.set_paint(img);
                ctx.ctx
                    .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, tile, tile));
                Ok(())
            })
        })
    }
}

fn canvas_u16(canvas: Canvas) -> StagefxResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| StagefxError::render("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| StagefxError::render("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

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
) -> StagefxResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| StagefxError::render("raster width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| StagefxError::render("raster height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(StagefxError::render("raster byte len mismatch"));
    }
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

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> StagefxResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn premul_px(color: Rgba8, alpha: f64) -> [u8; 4] {
    let a = (f64::from(color.a) * alpha.clamp(0.0, 1.0)).round() as u16;
    let premul = |c: u8| -> u8 { (((u16::from(c) * a) + 127) / 255) as u8 };
    [premul(color.r), premul(color.g), premul(color.b), a as u8]
}

/// Rasterize the radial falloff tile for one glow color: quadratic alpha falloff
/// from the center to the tile edge.
fn glow_tile(color: Rgba8) -> StagefxResult<vello_cpu::Image> {
    let n = GLOW_TILE as usize;
    let mut bytes = vec![0u8; n * n * 4];
    let half = (n as f64) * 0.5;
    for y in 0..n {
        for x in 0..n {
            let dx = (x as f64 + 0.5 - half) / half;
            let dy = (y as f64 + 0.5 - half) / half;
            let d = (dx * dx + dy * dy).sqrt();
            let falloff = (1.0 - d).clamp(0.0, 1.0);
            let px = premul_px(color, falloff * falloff);
            let idx = (y * n + x) * 4;
            bytes[idx..idx + 4].copy_from_slice(&px);
        }
    }
    rgba_premul_to_image(&bytes, GLOW_TILE, GLOW_TILE)
}

/// Rasterize a 1px-wide vertical gradient strip of height `h`.
fn gradient_strip(top: Rgba8, bottom: Rgba8, h: u32) -> StagefxResult<vello_cpu::Image> {
    let mut bytes = vec![0u8; (h as usize) * 4];
    let h1 = (h.max(1) - 1) as f64;
    for y in 0..h {
        let t = if h1 <= 0.0 { 0.0 } else { f64::from(y) / h1 };
        let c = top.lerp(bottom, t);
        let px = premul_px(c, 1.0);
        let idx = (y as usize) * 4;
        bytes[idx..idx + 4].copy_from_slice(&px);
    }
    rgba_premul_to_image(&bytes, 1, h)
}

#[cfg(test)]
#[path = "../../tests/unit/render/context.rs"]
mod tests;
