//! The six life-stage animations and the host-facing factory.

pub mod adult;
pub mod baby;
pub mod birth;
pub mod child;
pub mod elder;
pub mod teen;

use crate::engine::instance::{EventConfig, StageAnimation};
use crate::foundation::core::Canvas;
use crate::foundation::error::StagefxResult;

/// Life-stage discriminant used by the host to pick an animation family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifeStage {
    /// Arrival sequence (multi-phase).
    Birth,
    /// Ages 0–2.
    Baby,
    /// Ages 3–12.
    Child,
    /// Ages 13–19.
    Teen,
    /// Ages 20–64.
    Adult,
    /// Ages 65+.
    Elder,
}

impl LifeStage {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Birth => "birth",
            Self::Baby => "baby",
            Self::Child => "child",
            Self::Teen => "teen",
            Self::Adult => "adult",
            Self::Elder => "elder",
        }
    }

    /// All stages in life order.
    pub const ALL: [Self; 6] = [
        Self::Birth,
        Self::Baby,
        Self::Child,
        Self::Teen,
        Self::Adult,
        Self::Elder,
    ];
}

/// Construct the animation instance for a stage.
///
/// The returned instance owns all of its particle/effect state; the host drives it
/// through the [`StageAnimation`] contract and drops it after `cleanup`.
pub fn create(
    stage: LifeStage,
    canvas: Canvas,
    config: &EventConfig,
) -> StagefxResult<Box<dyn StageAnimation>> {
    tracing::debug!(
        stage = stage.as_str(),
        event_type = %config.event_type,
        duration_ms = config.duration_ms,
        "creating stage animation"
    );
    Ok(match stage {
        LifeStage::Birth => Box::new(birth::BirthAnimation::new(canvas, config)?),
        LifeStage::Baby => Box::new(baby::BabyAnimation::new(canvas, config)),
        LifeStage::Child => Box::new(child::ChildAnimation::new(canvas, config)),
        LifeStage::Teen => Box::new(teen::TeenAnimation::new(canvas, config)),
        LifeStage::Adult => Box::new(adult::AdultAnimation::new(canvas, config)),
        LifeStage::Elder => Box::new(elder::ElderAnimation::new(canvas, config)),
    })
}

/// Shared environment set pieces, parameterized per stage by palette and the decor
/// sway angle. Each piece draws nothing unless its flag is set by the active entry.
pub(crate) mod backdrop {
    use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8};
    use crate::foundation::error::StagefxResult;
    use crate::render::context::SceneCtx;

    /// Full-canvas vertical sky/wall gradient.
    pub(crate) fn sky(
        ctx: &mut SceneCtx,
        canvas: Canvas,
        top: Rgba8,
        bottom: Rgba8,
    ) -> StagefxResult<()> {
        ctx.fill_vertical_gradient(canvas.rect(), top, bottom)
    }

    /// Indoor window with a swaying curtain edge.
    pub(crate) fn window(ctx: &mut SceneCtx, canvas: Canvas, sway: f64) -> StagefxResult<()> {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        let frame = Rect::new(w * 0.68, h * 0.12, w * 0.92, h * 0.46);
        ctx.fill_rounded_rect(frame.inset(6.0), 8.0, Rgba8::opaque(120, 90, 60));
        ctx.fill_rounded_rect(frame, 6.0, Rgba8::opaque(205, 228, 250));
        // Cross bars.
        let cx = (frame.x0 + frame.x1) * 0.5;
        let cy = (frame.y0 + frame.y1) * 0.5;
        ctx.fill_rect(Rect::new(cx - 2.0, frame.y0, cx + 2.0, frame.y1), Rgba8::opaque(120, 90, 60));
        ctx.fill_rect(Rect::new(frame.x0, cy - 2.0, frame.x1, cy + 2.0), Rgba8::opaque(120, 90, 60));

        let t = Affine::translate((frame.x0, frame.y0)) * Affine::rotate(sway * 0.5);
        ctx.with_transform(t, |ctx| {
            ctx.fill_rounded_rect(
                Rect::new(-10.0, -4.0, 18.0, frame.height() + 8.0),
                8.0,
                Rgba8::new(255, 240, 225, 200),
            );
            Ok(())
        })
    }

    /// Rolling ground hills along the bottom edge.
    pub(crate) fn hills(ctx: &mut SceneCtx, canvas: Canvas, color: Rgba8) -> StagefxResult<()> {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        let mut p = BezPath::new();
        p.move_to((0.0, h));
        p.line_to((0.0, h * 0.82));
        p.quad_to((w * 0.25, h * 0.72), (w * 0.5, h * 0.82));
        p.quad_to((w * 0.75, h * 0.92), (w, h * 0.8));
        p.line_to((w, h));
        p.close_path();
        ctx.fill_path(&p, color);
        Ok(())
    }

    /// Sun/moon disc with a faint halo.
    pub(crate) fn orb(
        ctx: &mut SceneCtx,
        center: Point,
        radius: f64,
        color: Rgba8,
    ) -> StagefxResult<()> {
        ctx.fill_radial_glow(center, radius * 2.2, color, 0.5)?;
        ctx.fill_circle(center, radius, color);
        Ok(())
    }

    /// Celebration pennant string across the top, swaying as one piece.
    pub(crate) fn banners(ctx: &mut SceneCtx, canvas: Canvas, sway: f64) -> StagefxResult<()> {
        let w = f64::from(canvas.width);
        let colors = [
            Rgba8::opaque(240, 110, 110),
            Rgba8::opaque(250, 205, 95),
            Rgba8::opaque(110, 190, 150),
            Rgba8::opaque(120, 150, 230),
        ];
        let count = 9usize;
        ctx.with_transform(Affine::rotate(sway * 0.3), |ctx| {
            for i in 0..count {
                let x0 = (i as f64 + 0.15) * w / (count as f64);
                let x1 = (i as f64 + 0.85) * w / (count as f64);
                let dip = 26.0 + 10.0 * ((i as f64) * 1.7).sin();
                let mut p = BezPath::new();
                p.move_to((x0, 8.0));
                p.line_to((x1, 8.0));
                p.line_to(((x0 + x1) * 0.5, 8.0 + dip));
                p.close_path();
                ctx.fill_path(&p, colors[i % colors.len()]);
            }
            Ok(())
        })
    }
}
