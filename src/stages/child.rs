//! Child stage: play and school years.

use crate::character::{BodyShape, ColorPalette, Emotion, draw_character};
use crate::engine::behavior::{BehaviorEntry, BehaviorTable, EnvironmentFlags, FrameCtx};
use crate::engine::instance::{AnimationCore, EventConfig, StageAnimation};
use crate::engine::particle::{
    ExpirePolicy, FadeRule, FieldSpec, Flutter, Particle, ParticleField, ParticleShape,
    RespawnEdge, ring_around,
};
use crate::engine::phase::PhaseClock;
use crate::engine::quality::{QualityCaps, QualityLevel};
use crate::foundation::core::{Canvas, Point, Rect, Rgba8, TimeMs, Vec2};
use crate::foundation::error::StagefxResult;
use crate::foundation::math::pulse01;
use crate::render::context::SceneCtx;
use crate::render::pipeline::{self, GlowEffect, RayBurst, RenderLayers};
use crate::stages::backdrop;

const CONFETTI: FieldSpec = FieldSpec {
    name: "child-confetti",
    motion_scale: 0.05,
    gravity: Some(0.04),
    fade: FadeRule::FadeOut { ramp_ms: 500.0 },
    expire: ExpirePolicy::Remove,
    caps: QualityCaps::new(15, 22, 32),
    flutter: None,
};

const BUBBLES: FieldSpec = FieldSpec {
    name: "child-bubbles",
    motion_scale: 0.025,
    gravity: None,
    fade: FadeRule::SinePulse { freq_hz: 0.4 },
    expire: ExpirePolicy::Recycle(RespawnEdge::Bottom),
    caps: QualityCaps::new(5, 8, 12),
    flutter: Some(Flutter {
        amplitude: 0.6,
        freq_hz: 0.45,
    }),
};

const CONFETTI_COLORS: [Rgba8; 5] = [
    Rgba8::opaque(240, 100, 100),
    Rgba8::opaque(250, 200, 90),
    Rgba8::opaque(110, 200, 150),
    Rgba8::opaque(110, 150, 240),
    Rgba8::opaque(210, 120, 220),
];

static TABLE: BehaviorTable<ChildAnimation> = BehaviorTable::new(&[
    BehaviorEntry {
        key: "playground",
        emotion: Emotion::Happy,
        environment: EnvironmentFlags::OUTDOORS,
        update: update_playground,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "birthday",
        emotion: Emotion::Excited,
        environment: EnvironmentFlags::PARTY,
        update: update_birthday,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "school-day",
        emotion: Emotion::Neutral,
        environment: EnvironmentFlags::INDOORS,
        update: update_school_day,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "new-friend",
        emotion: Emotion::Happy,
        environment: EnvironmentFlags::OUTDOORS,
        update: update_new_friend,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "drawing",
        emotion: Emotion::Calm,
        environment: EnvironmentFlags::INDOORS,
        update: update_drawing,
        render: render_crayon_strokes,
    },
    BehaviorEntry {
        key: "lost-tooth",
        emotion: Emotion::Surprised,
        environment: EnvironmentFlags::INDOORS,
        update: update_lost_tooth,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "scraped-knee",
        emotion: Emotion::Sad,
        environment: EnvironmentFlags::OUTDOORS,
        update: update_scraped_knee,
        render: no_overlay,
    },
]);

/// Child-event animation instance.
pub struct ChildAnimation {
    core: AnimationCore,
    behavior: &'static BehaviorEntry<ChildAnimation>,
    confetti: ParticleField,
    bubbles: ParticleField,
    burst_fired: bool,
    star_rays: Option<RayBurst>,
    spark_glow: Option<GlowEffect>,
}

impl ChildAnimation {
    fn default_shape() -> BodyShape {
        BodyShape {
            head_radius: 16.0,
            body_width: 26.0,
            body_height: 36.0,
            limb_thickness: 6.0,
            palette: ColorPalette {
                outfit: Rgba8::opaque(220, 110, 110),
                ..ColorPalette::default()
            },
        }
    }

    /// Build the instance and pre-seed its fields at the configured quality.
    pub fn new(canvas: Canvas, config: &EventConfig) -> Self {
        let behavior = TABLE.select(&config.event_type);
        let mut core = AnimationCore::new(
            PhaseClock::single(config.duration_ms),
            config,
            Self::default_shape(),
        );
        core.adopt(behavior);

        let confetti = ParticleField::new(CONFETTI, canvas, config.seed ^ 0x434f_4e46);
        let mut bubbles = ParticleField::new(BUBBLES, canvas, config.seed ^ 0x4255_4242);
        bubbles.spawn(BUBBLES.caps.high, |_, rng| {
            let x = rng.next_range(0.0, f64::from(canvas.width));
            let y = rng.next_range(0.0, f64::from(canvas.height));
            Particle {
                position: Point::new(x, y),
                velocity: Vec2::new(0.0, rng.next_range(-1.0, -0.4)),
                size: rng.next_range(6.0, 14.0),
                color: Rgba8::new(200, 230, 255, 255),
                max_opacity: rng.next_range(0.2, 0.45),
                life_ms: rng.next_range(3000.0, 8000.0),
                max_life_ms: 8000.0,
                sparkle: rng.next_range(0.0, std::f64::consts::TAU),
                flutter: rng.next_range(0.0, std::f64::consts::TAU),
                ..Particle::default()
            }
        });
        bubbles.set_intensity(0.0);

        let mut anim = Self {
            core,
            behavior,
            confetti,
            bubbles,
            burst_fired: false,
            star_rays: None,
            spark_glow: None,
        };
        anim.set_quality(config.quality);
        anim
    }

    /// One-shot confetti burst from above the anchor.
    fn fire_confetti(&mut self, origin: Point) {
        if self.burst_fired {
            return;
        }
        self.burst_fired = true;
        let top = Point::new(origin.x, origin.y - 120.0);
        self.confetti.spawn(CONFETTI.caps.high, |i, rng| {
            let position = ring_around(rng, top, 8.0, 6.0);
            Particle {
                position,
                velocity: Vec2::new(rng.next_range(-1.6, 1.6), rng.next_range(-1.2, 0.2)),
                rotation: rng.next_range(0.0, std::f64::consts::TAU),
                rotation_speed: rng.next_range(-0.01, 0.01),
                size: rng.next_range(4.0, 7.0),
                color: CONFETTI_COLORS[i % CONFETTI_COLORS.len()],
                max_opacity: 1.0,
                life_ms: rng.next_range(1200.0, 2600.0),
                max_life_ms: 2600.0,
                shape: ParticleShape::Custom,
                ..Particle::default()
            }
        });
        self.core
            .quality
            .apply(self.core.quality.level(), &mut [&mut self.confetti]);
    }

    fn hop(&mut self, f: &FrameCtx, height: f64, rate: f64) {
        self.core.character.position.y = f.origin.y - (f.time_ms * rate).sin().abs() * height;
    }
}

fn update_playground(s: &mut ChildAnimation, f: &FrameCtx) {
    s.hop(f, 10.0, 0.006);
    s.bubbles.set_intensity(0.7);
}

fn update_birthday(s: &mut ChildAnimation, f: &FrameCtx) {
    s.hop(f, 8.0, 0.008);
    if f.progress > 0.15 {
        let origin = f.origin;
        s.fire_confetti(origin);
    }
    s.star_rays = Some(RayBurst {
        center: Point::new(f.origin.x, f.origin.y - 90.0),
        count: 8,
        length: 60.0 + 40.0 * pulse01(f.progress),
        intensity: 0.4 + 0.25 * pulse01(f.progress),
        color: Rgba8::opaque(255, 225, 130),
        angle_offset: f.time_ms * 0.0006,
    });
    s.spark_glow = Some(GlowEffect {
        center: f.origin,
        radius: 120.0,
        intensity: 0.3,
        color: Rgba8::opaque(255, 215, 150),
    });
}

fn update_school_day(s: &mut ChildAnimation, f: &FrameCtx) {
    // Steady walk-in from the left.
    s.core.character.position.x = f.origin.x - 80.0 * (1.0 - f.progress.min(0.5) * 2.0);
    s.bubbles.set_intensity(0.0);
}

fn update_new_friend(s: &mut ChildAnimation, f: &FrameCtx) {
    s.hop(f, 6.0, 0.005);
    s.bubbles.set_intensity(0.5);
    s.spark_glow = Some(GlowEffect {
        center: f.origin,
        radius: 100.0,
        intensity: 0.25 * pulse01(f.progress),
        color: Rgba8::opaque(255, 200, 180),
    });
}

fn update_drawing(s: &mut ChildAnimation, f: &FrameCtx) {
    // Sitting still; the overlay draws the picture taking shape.
    s.core.character.position = f.origin;
    s.bubbles.set_intensity(0.2);
}

fn update_lost_tooth(s: &mut ChildAnimation, f: &FrameCtx) {
    s.core.character.position = f.origin;
    s.star_rays = if f.progress > 0.4 {
        Some(RayBurst {
            center: Point::new(f.origin.x, f.origin.y - 70.0),
            count: 6,
            length: 36.0,
            intensity: 0.5 * pulse01((f.progress - 0.4) / 0.6),
            color: Rgba8::opaque(255, 255, 255),
            angle_offset: 0.3,
        })
    } else {
        None
    };
}

fn update_scraped_knee(s: &mut ChildAnimation, f: &FrameCtx) {
    s.core.character.position = f.origin;
    s.core.character.scale = 0.95;
    s.bubbles.set_intensity(0.0);
    // Brief dim flash at the start, then recovery.
    s.spark_glow = if f.progress < 0.25 {
        Some(GlowEffect {
            center: f.origin,
            radius: 80.0,
            intensity: 0.3 * (1.0 - f.progress / 0.25),
            color: Rgba8::opaque(230, 120, 110),
        })
    } else {
        None
    };
}

fn no_overlay(_: &ChildAnimation, _: &mut SceneCtx) -> StagefxResult<()> {
    Ok(())
}

/// Crayon strokes appearing one by one on a paper sheet.
fn render_crayon_strokes(s: &ChildAnimation, ctx: &mut SceneCtx) -> StagefxResult<()> {
    let c = s.core.character.position;
    let paper = Rect::new(c.x + 40.0, c.y - 60.0, c.x + 130.0, c.y);
    ctx.fill_rounded_rect(paper, 3.0, Rgba8::opaque(252, 252, 245));
    let strokes = [
        (Rgba8::opaque(240, 110, 100), 0.15),
        (Rgba8::opaque(110, 170, 240), 0.4),
        (Rgba8::opaque(130, 210, 130), 0.65),
        (Rgba8::opaque(250, 200, 90), 0.85),
    ];
    let progress = s.core.clock.progress();
    for (i, (color, threshold)) in strokes.iter().enumerate() {
        if progress < *threshold {
            break;
        }
        let y = paper.y0 + 12.0 + i as f64 * 12.0;
        ctx.fill_rounded_rect(
            Rect::new(paper.x0 + 8.0, y, paper.x1 - 8.0 - i as f64 * 6.0, y + 4.0),
            2.0,
            *color,
        );
    }
    Ok(())
}

impl RenderLayers for ChildAnimation {
    fn render_environment(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        let canvas = ctx.canvas();
        let env = self.core.environment;
        let sway = self.core.decor_sway();
        let (top, bottom) = if env.indoors {
            (Rgba8::opaque(244, 240, 230), Rgba8::opaque(226, 216, 200))
        } else {
            (Rgba8::opaque(150, 205, 250), Rgba8::opaque(220, 242, 255))
        };
        backdrop::sky(ctx, canvas, top, bottom)?;
        if env.nature {
            let sun = Point::new(f64::from(canvas.width) * 0.15, f64::from(canvas.height) * 0.14);
            backdrop::orb(ctx, sun, 30.0, Rgba8::opaque(255, 235, 150))?;
            backdrop::hills(ctx, canvas, Rgba8::opaque(130, 195, 115))?;
        }
        if env.indoors {
            backdrop::window(ctx, canvas, sway)?;
        }
        if env.celebration {
            backdrop::banners(ctx, canvas, sway)?;
        }
        Ok(())
    }

    fn render_particles(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        pipeline::draw_field(ctx, &self.bubbles)?;
        pipeline::draw_field(ctx, &self.confetti)
    }

    fn render_character(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        let c = self.core.character;
        draw_character(ctx, &self.core.shape, c.position, c.scale, c.opacity, self.core.emotion)
    }

    fn render_overlays(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        pipeline::draw_glow(ctx, self.spark_glow.as_ref())?;
        pipeline::draw_rays(ctx, self.star_rays.as_ref())?;
        (self.behavior.render)(self, ctx)
    }
}

impl StageAnimation for ChildAnimation {
    fn update(&mut self, time_ms: TimeMs, delta_ms: TimeMs) {
        let frame = self.core.advance(time_ms, delta_ms);
        let update = self.behavior.update;
        update(self, &frame);
        self.confetti.tick(delta_ms);
        self.bubbles.tick(delta_ms);
    }

    fn render(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        pipeline::render_frame(self, ctx)
    }

    fn is_animation_complete(&self) -> bool {
        self.core.clock.is_complete()
    }

    fn set_quality(&mut self, level: QualityLevel) {
        self.core
            .quality
            .apply(level, &mut [&mut self.confetti, &mut self.bubbles]);
    }

    fn set_body_shape(&mut self, shape: BodyShape) {
        self.core.shape = shape;
    }

    fn cleanup(&mut self) {
        tracing::trace!(event = self.behavior.key, "cleanup");
        self.confetti.clear();
        self.bubbles.clear();
        self.star_rays = None;
        self.spark_glow = None;
    }
}
