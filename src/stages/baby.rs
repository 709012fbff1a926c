//! Baby stage: firsts.
//!
//! Small indoor moments with drifting hearts, a one-shot giggle burst on the
//! brighter events, and a gentle bobbing character.

use crate::character::{BodyShape, ColorPalette, Emotion, draw_character};
use crate::engine::behavior::{BehaviorEntry, BehaviorTable, EnvironmentFlags, FrameCtx};
use crate::engine::instance::{AnimationCore, EventConfig, StageAnimation};
use crate::engine::particle::{
    ExpirePolicy, FadeRule, FieldSpec, Flutter, Particle, ParticleField, ParticleShape,
    RespawnEdge, ring_around,
};
use crate::engine::phase::PhaseClock;
use crate::engine::quality::{QualityCaps, QualityLevel};
use crate::foundation::core::{Canvas, Point, Rgba8, TimeMs, Vec2};
use crate::foundation::error::StagefxResult;
use crate::foundation::math::pulse01;
use crate::render::context::SceneCtx;
use crate::render::pipeline::{self, GlowEffect, ProgressIndicator, RenderLayers};
use crate::stages::backdrop;

const HEARTS: FieldSpec = FieldSpec {
    name: "baby-hearts",
    motion_scale: 0.03,
    gravity: None,
    fade: FadeRule::FadeIn { ramp_ms: 600.0 },
    expire: ExpirePolicy::Recycle(RespawnEdge::Bottom),
    caps: QualityCaps::new(6, 9, 14),
    flutter: Some(Flutter {
        amplitude: 0.4,
        freq_hz: 0.5,
    }),
};

const GIGGLES: FieldSpec = FieldSpec {
    name: "baby-giggles",
    motion_scale: 0.04,
    gravity: None,
    fade: FadeRule::LifeRatio,
    expire: ExpirePolicy::Remove,
    caps: QualityCaps::new(8, 12, 18),
    flutter: None,
};

static TABLE: BehaviorTable<BabyAnimation> = BehaviorTable::new(&[
    BehaviorEntry {
        key: "first-smile",
        emotion: Emotion::Happy,
        environment: EnvironmentFlags::INDOORS,
        update: update_first_smile,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "first-steps",
        emotion: Emotion::Excited,
        environment: EnvironmentFlags::INDOORS,
        update: update_first_steps,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "first-word",
        emotion: Emotion::Proud,
        environment: EnvironmentFlags::INDOORS,
        update: update_first_word,
        render: render_speech_bubble,
    },
    BehaviorEntry {
        key: "lullaby",
        emotion: Emotion::Calm,
        environment: EnvironmentFlags::INDOORS,
        update: update_lullaby,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "peekaboo",
        emotion: Emotion::Surprised,
        environment: EnvironmentFlags::INDOORS,
        update: update_peekaboo,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "new-toy",
        emotion: Emotion::Excited,
        environment: EnvironmentFlags::PARTY,
        update: update_new_toy,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "sick-day",
        emotion: Emotion::Worried,
        environment: EnvironmentFlags::INDOORS,
        update: update_sick_day,
        render: no_overlay,
    },
]);

/// Baby-event animation instance.
pub struct BabyAnimation {
    core: AnimationCore,
    behavior: &'static BehaviorEntry<BabyAnimation>,
    hearts: ParticleField,
    giggles: ParticleField,
    burst_fired: bool,
    warm_glow: Option<GlowEffect>,
    steps: Option<ProgressIndicator>,
}

impl BabyAnimation {
    fn default_shape() -> BodyShape {
        BodyShape {
            head_radius: 16.0,
            body_width: 22.0,
            body_height: 24.0,
            limb_thickness: 5.0,
            palette: ColorPalette {
                outfit: Rgba8::opaque(250, 200, 120),
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

        let mut hearts = ParticleField::new(HEARTS, canvas, config.seed ^ 0x4845_4152);
        hearts.spawn(HEARTS.caps.high, |_, rng| {
            let x = rng.next_range(0.0, f64::from(canvas.width));
            let y = rng.next_range(0.0, f64::from(canvas.height));
            Particle {
                position: Point::new(x, y),
                velocity: Vec2::new(0.0, rng.next_range(-1.2, -0.5)),
                size: rng.next_range(7.0, 13.0),
                color: Rgba8::opaque(245, 130, 150),
                max_opacity: rng.next_range(0.4, 0.8),
                life_ms: rng.next_range(2500.0, 6000.0),
                max_life_ms: 6000.0,
                shape: ParticleShape::Heart,
                flutter: rng.next_range(0.0, std::f64::consts::TAU),
                ..Particle::default()
            }
        });
        hearts.set_intensity(0.0);

        let giggles = ParticleField::new(GIGGLES, canvas, config.seed ^ 0x4749_4747);

        let mut anim = Self {
            core,
            behavior,
            hearts,
            giggles,
            burst_fired: false,
            warm_glow: None,
            steps: None,
        };
        anim.set_quality(config.quality);
        anim
    }

    /// One-shot giggle burst around the character's head.
    fn fire_giggles(&mut self, color: Rgba8) {
        if self.burst_fired {
            return;
        }
        self.burst_fired = true;
        let head = Point::new(
            self.core.character.position.x,
            self.core.character.position.y - 50.0,
        );
        self.giggles.spawn(GIGGLES.caps.high, |_, rng| {
            let position = ring_around(rng, head, 10.0, 6.0);
            let angle = rng.next_range(0.0, std::f64::consts::TAU);
            let speed = rng.next_range(0.6, 1.6);
            Particle {
                position,
                velocity: Vec2::new(angle.cos() * speed, angle.sin() * speed - 0.5),
                size: rng.next_range(3.0, 6.0),
                color,
                max_opacity: rng.next_range(0.6, 1.0),
                life_ms: rng.next_range(700.0, 1400.0),
                max_life_ms: 1400.0,
                shape: ParticleShape::Circle,
                ..Particle::default()
            }
        });
        self.core.quality.apply(
            self.core.quality.level(),
            &mut [&mut self.giggles],
        );
    }

    fn bob(&mut self, f: &FrameCtx, amplitude: f64) {
        self.core.character.position.y = f.origin.y - (f.time_ms * 0.004).sin().abs() * amplitude;
    }
}

fn update_first_smile(s: &mut BabyAnimation, f: &FrameCtx) {
    s.bob(f, 2.0);
    s.hearts.set_intensity(f.progress.min(0.4) * 2.5);
    s.warm_glow = Some(GlowEffect {
        center: f.origin,
        radius: 100.0,
        intensity: 0.25 + 0.25 * pulse01(f.progress),
        color: Rgba8::opaque(255, 210, 170),
    });
    if f.progress > 0.3 {
        s.fire_giggles(Rgba8::opaque(255, 230, 150));
    }
}

fn update_first_steps(s: &mut BabyAnimation, f: &FrameCtx) {
    // Wobbly forward shuffle toward the anchor.
    s.core.character.position.x = f.origin.x - 60.0 + 60.0 * f.progress;
    s.core.character.position.y = f.origin.y - (f.time_ms * 0.008).sin().abs() * 4.0;
    s.steps = Some(ProgressIndicator {
        fraction: f.progress,
        color: Rgba8::opaque(120, 200, 140),
    });
    s.hearts.set_intensity(0.3);
    if f.progress > 0.8 {
        s.fire_giggles(Rgba8::opaque(160, 230, 170));
    }
}

fn update_first_word(s: &mut BabyAnimation, f: &FrameCtx) {
    s.bob(f, 2.0);
    s.hearts.set_intensity(0.4 * f.progress);
    s.warm_glow = Some(GlowEffect {
        center: Point::new(f.origin.x, f.origin.y - 60.0),
        radius: 70.0,
        intensity: 0.3 * pulse01(f.progress),
        color: Rgba8::opaque(200, 220, 255),
    });
}

fn update_lullaby(s: &mut BabyAnimation, f: &FrameCtx) {
    // Slow sway, everything dimmed.
    s.core.character.position.x = f.origin.x + (f.time_ms * 0.0015).sin() * 6.0;
    s.hearts.set_intensity(0.15);
    s.warm_glow = Some(GlowEffect {
        center: f.origin,
        radius: 130.0,
        intensity: 0.2,
        color: Rgba8::opaque(180, 170, 230),
    });
}

fn update_peekaboo(s: &mut BabyAnimation, f: &FrameCtx) {
    // Hidden, then pop.
    let visible = f.progress > 0.45;
    s.core.character.opacity = if visible { 1.0 } else { 0.15 };
    s.core.character.scale = if visible { 1.0 + 0.1 * pulse01(f.progress) } else { 0.9 };
    if visible {
        s.fire_giggles(Rgba8::opaque(255, 200, 120));
        s.hearts.set_intensity(0.5);
    }
}

fn update_new_toy(s: &mut BabyAnimation, f: &FrameCtx) {
    s.bob(f, 3.0);
    s.hearts.set_intensity(0.6);
    s.warm_glow = Some(GlowEffect {
        center: f.origin,
        radius: 110.0,
        intensity: 0.35 + 0.2 * pulse01(f.progress),
        color: Rgba8::opaque(255, 220, 140),
    });
    if f.progress > 0.25 {
        s.fire_giggles(Rgba8::opaque(255, 190, 210));
    }
}

fn update_sick_day(s: &mut BabyAnimation, f: &FrameCtx) {
    s.core.character.position.x = f.origin.x + (f.time_ms * 0.001).sin() * 2.0;
    s.core.character.scale = 0.95;
    s.hearts.set_intensity(0.1);
    s.warm_glow = Some(GlowEffect {
        center: f.origin,
        radius: 90.0,
        intensity: 0.15,
        color: Rgba8::opaque(190, 200, 210),
    });
}

fn no_overlay(_: &BabyAnimation, _: &mut SceneCtx) -> StagefxResult<()> {
    Ok(())
}

/// Small speech bubble above the head for the first word.
fn render_speech_bubble(s: &BabyAnimation, ctx: &mut SceneCtx) -> StagefxResult<()> {
    let c = s.core.character;
    if s.core.clock.progress() < 0.3 {
        return Ok(());
    }
    let anchor = Point::new(c.position.x + 34.0, c.position.y - 92.0);
    ctx.fill_rounded_rect(
        crate::foundation::core::Rect::new(anchor.x, anchor.y, anchor.x + 46.0, anchor.y + 28.0),
        10.0,
        Rgba8::new(255, 255, 255, 230),
    );
    ctx.fill_circle(Point::new(anchor.x + 2.0, anchor.y + 34.0), 4.0, Rgba8::new(255, 255, 255, 230));
    for i in 0..3 {
        ctx.fill_circle(
            Point::new(anchor.x + 12.0 + i as f64 * 11.0, anchor.y + 14.0),
            2.2,
            Rgba8::opaque(120, 120, 140),
        );
    }
    Ok(())
}

impl RenderLayers for BabyAnimation {
    fn render_environment(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        let canvas = ctx.canvas();
        let env = self.core.environment;
        let sway = self.core.decor_sway();
        let (top, bottom) = if self.behavior.key == "lullaby" {
            (Rgba8::opaque(60, 58, 96), Rgba8::opaque(96, 90, 130))
        } else {
            (Rgba8::opaque(252, 240, 226), Rgba8::opaque(240, 220, 200))
        };
        backdrop::sky(ctx, canvas, top, bottom)?;
        if env.indoors {
            backdrop::window(ctx, canvas, sway)?;
        }
        if env.celebration {
            backdrop::banners(ctx, canvas, sway)?;
        }
        Ok(())
    }

    fn render_particles(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        pipeline::draw_field(ctx, &self.hearts)?;
        pipeline::draw_field(ctx, &self.giggles)
    }

    fn render_character(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        let c = self.core.character;
        draw_character(ctx, &self.core.shape, c.position, c.scale, c.opacity, self.core.emotion)
    }

    fn render_overlays(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        pipeline::draw_glow(ctx, self.warm_glow.as_ref())?;
        pipeline::draw_progress(ctx, self.steps.as_ref())?;
        (self.behavior.render)(self, ctx)
    }
}

impl StageAnimation for BabyAnimation {
    fn update(&mut self, time_ms: TimeMs, delta_ms: TimeMs) {
        let frame = self.core.advance(time_ms, delta_ms);
        let update = self.behavior.update;
        update(self, &frame);
        self.hearts.tick(delta_ms);
        self.giggles.tick(delta_ms);
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
            .apply(level, &mut [&mut self.hearts, &mut self.giggles]);
    }

    fn set_body_shape(&mut self, shape: BodyShape) {
        self.core.shape = shape;
    }

    fn cleanup(&mut self) {
        tracing::trace!(event = self.behavior.key, "cleanup");
        self.hearts.clear();
        self.giggles.clear();
        self.warm_glow = None;
        self.steps = None;
    }
}
