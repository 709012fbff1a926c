//! Fixed-order frame composition and the shared effect draw helpers.

use crate::engine::particle::{Particle, ParticleField, ParticleShape};
use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8};
use crate::foundation::error::StagefxResult;
use crate::render::context::SceneCtx;

/// Radial glow record derived by a behavior handler.
///
/// Present only while the owning handler keeps it alive; the render layer draws
/// nothing for an absent record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowEffect {
    /// Glow center in canvas pixels.
    pub center: Point,
    /// Glow radius in pixels.
    pub radius: f64,
    /// Brightness in `[0, 1]`.
    pub intensity: f64,
    /// Glow color.
    pub color: Rgba8,
}

/// Directional ray fan derived by a behavior handler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayBurst {
    /// Fan center.
    pub center: Point,
    /// Number of rays.
    pub count: usize,
    /// Ray length in pixels.
    pub length: f64,
    /// Brightness in `[0, 1]`.
    pub intensity: f64,
    /// Ray color.
    pub color: Rgba8,
    /// Rotation of the whole fan in radians.
    pub angle_offset: f64,
}

/// Horizontal progress indicator derived by a behavior handler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressIndicator {
    /// Filled fraction in `[0, 1]`.
    pub fraction: f64,
    /// Fill color.
    pub color: Rgba8,
}

/// The four fixed layers every stage renders, in order.
///
/// No layer depends on a later one having been drawn; each layer skips itself when
/// its backing state is absent.
pub trait RenderLayers {
    /// Layer 1: background gradient and environment set pieces.
    fn render_environment(&self, ctx: &mut SceneCtx) -> StagefxResult<()>;
    /// Layer 2: ambient and decorative particle fields.
    fn render_particles(&self, ctx: &mut SceneCtx) -> StagefxResult<()>;
    /// Layer 3: character sprite with emotion variant.
    fn render_character(&self, ctx: &mut SceneCtx) -> StagefxResult<()>;
    /// Layer 4: event-specific overlays (glows, rays, progress).
    fn render_overlays(&self, ctx: &mut SceneCtx) -> StagefxResult<()>;
}

/// Draw one frame in the fixed layer order.
pub fn render_frame(layers: &impl RenderLayers, ctx: &mut SceneCtx) -> StagefxResult<()> {
    layers.render_environment(ctx)?;
    layers.render_particles(ctx)?;
    layers.render_character(ctx)?;
    layers.render_overlays(ctx)
}

/// Draw every particle of a field at its current opacity.
pub fn draw_field(ctx: &mut SceneCtx, field: &ParticleField) -> StagefxResult<()> {
    for p in field.iter() {
        if p.opacity <= 0.0 {
            continue;
        }
        draw_particle(ctx, p)?;
    }
    Ok(())
}

/// Draw a single particle according to its shape tag.
pub fn draw_particle(ctx: &mut SceneCtx, p: &Particle) -> StagefxResult<()> {
    let color = p.color.with_opacity(p.opacity);
    let t = Affine::translate((p.position.x, p.position.y)) * Affine::rotate(p.rotation);
    ctx.with_transform(t, |ctx| {
        match p.shape {
            ParticleShape::Circle => {
                ctx.fill_circle(Point::ZERO, p.size * 0.5, color);
            }
            ParticleShape::Heart => {
                ctx.fill_path(&heart_path(p.size), color);
            }
            ParticleShape::Star => {
                ctx.fill_path(&star_path(p.size * 0.5, p.size * 0.22, 5), color);
            }
            ParticleShape::Custom => {
                let half = p.size * 0.5;
                ctx.fill_rect(Rect::new(-half, -half, half, half), color);
            }
        }
        Ok(())
    })
}

/// Draw a glow record, if present.
pub fn draw_glow(ctx: &mut SceneCtx, glow: Option<&GlowEffect>) -> StagefxResult<()> {
    let Some(g) = glow else { return Ok(()) };
    ctx.fill_radial_glow(g.center, g.radius, g.color, g.intensity)
}

/// Draw a ray fan record, if present.
pub fn draw_rays(ctx: &mut SceneCtx, rays: Option<&RayBurst>) -> StagefxResult<()> {
    let Some(r) = rays else { return Ok(()) };
    if r.count == 0 || r.length <= 0.0 || r.intensity <= 0.0 {
        return Ok(());
    }
    let color = r.color.with_opacity(r.intensity);
    let width = (r.length * 0.045).max(1.5);
    for i in 0..r.count {
        let angle = r.angle_offset + (i as f64) * std::f64::consts::TAU / (r.count as f64);
        let t = Affine::translate((r.center.x, r.center.y)) * Affine::rotate(angle);
        ctx.with_transform(t, |ctx| {
            let mut p = BezPath::new();
            p.move_to((0.0, -width * 0.5));
            p.line_to((r.length, 0.0));
            p.line_to((0.0, width * 0.5));
            p.close_path();
            ctx.fill_path(&p, color);
            Ok(())
        })?;
    }
    Ok(())
}

/// Draw a progress indicator near the bottom of the canvas, if present.
pub fn draw_progress(ctx: &mut SceneCtx, progress: Option<&ProgressIndicator>) -> StagefxResult<()> {
    let Some(p) = progress else { return Ok(()) };
    let canvas = ctx.canvas();
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let track = Rect::new(w * 0.25, h - 40.0, w * 0.75, h - 28.0);
    ctx.fill_rounded_rect(track, 6.0, Rgba8::new(255, 255, 255, 70));
    let fraction = p.fraction.clamp(0.0, 1.0);
    if fraction > 0.0 {
        let fill = Rect::new(
            track.x0,
            track.y0,
            track.x0 + track.width() * fraction,
            track.y1,
        );
        ctx.fill_rounded_rect(fill, 6.0, p.color);
    }
    Ok(())
}

/// Two-lobe heart path of roughly `size` height, centered at the origin.
pub fn heart_path(size: f64) -> BezPath {
    let s = size;
    let mut p = BezPath::new();
    p.move_to((0.0, -0.25 * s));
    p.curve_to((0.0, -0.55 * s), (-0.5 * s, -0.55 * s), (-0.5 * s, -0.2 * s));
    p.curve_to((-0.5 * s, 0.1 * s), (-0.2 * s, 0.25 * s), (0.0, 0.5 * s));
    p.curve_to((0.2 * s, 0.25 * s), (0.5 * s, 0.1 * s), (0.5 * s, -0.2 * s));
    p.curve_to((0.5 * s, -0.55 * s), (0.0, -0.55 * s), (0.0, -0.25 * s));
    p.close_path();
    p
}

/// Star polygon path with alternating outer/inner radii, centered at the origin.
pub fn star_path(outer: f64, inner: f64, points: usize) -> BezPath {
    let mut p = BezPath::new();
    let n = points.max(3);
    for i in 0..(n * 2) {
        let r = if i % 2 == 0 { outer } else { inner };
        let angle = -std::f64::consts::FRAC_PI_2 + (i as f64) * std::f64::consts::PI / (n as f64);
        let pt = (angle.cos() * r, angle.sin() * r);
        if i == 0 {
            p.move_to(pt);
        } else {
            p.line_to(pt);
        }
    }
    p.close_path();
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_path_is_closed_with_expected_vertices() {
        let p = star_path(10.0, 4.0, 5);
        // 10 vertices (move + 9 lines) + close.
        assert_eq!(p.elements().len(), 11);
        assert!(matches!(p.elements().last(), Some(kurbo::PathEl::ClosePath)));
    }

    #[test]
    fn heart_path_is_closed() {
        let p = heart_path(8.0);
        assert!(matches!(p.elements().last(), Some(kurbo::PathEl::ClosePath)));
    }
}
