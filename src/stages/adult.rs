//! Adult stage: work, milestones, and money weather.

use crate::character::{BodyShape, ColorPalette, Emotion, draw_character};
use crate::engine::behavior::{BehaviorEntry, BehaviorTable, EnvironmentFlags, FrameCtx};
use crate::engine::instance::{AnimationCore, EventConfig, StageAnimation};
use crate::engine::particle::{
    ExpirePolicy, FadeRule, FieldSpec, Flutter, Particle, ParticleField, ParticleShape,
    RespawnEdge, ring_around, scatter_in,
};
use crate::engine::phase::PhaseClock;
use crate::engine::quality::{QualityCaps, QualityLevel};
use crate::foundation::core::{BezPath, Canvas, Point, Rect, Rgba8, TimeMs, Vec2};
use crate::foundation::error::StagefxResult;
use crate::foundation::math::pulse01;
use crate::render::context::SceneCtx;
use crate::render::pipeline::{self, GlowEffect, ProgressIndicator, RayBurst, RenderLayers};
use crate::stages::backdrop;

const BILLS: FieldSpec = FieldSpec {
    name: "adult-bills",
    motion_scale: 0.035,
    gravity: None,
    fade: FadeRule::FadeIn { ramp_ms: 400.0 },
    expire: ExpirePolicy::Recycle(RespawnEdge::Top),
    caps: QualityCaps::new(8, 12, 20),
    flutter: Some(Flutter {
        amplitude: 0.8,
        freq_hz: 0.6,
    }),
};

const CONFETTI: FieldSpec = FieldSpec {
    name: "adult-confetti",
    motion_scale: 0.05,
    gravity: Some(0.04),
    fade: FadeRule::FadeOut { ramp_ms: 500.0 },
    expire: ExpirePolicy::Remove,
    caps: QualityCaps::new(12, 18, 28),
    flutter: None,
};

const HEARTS: FieldSpec = FieldSpec {
    name: "adult-hearts",
    motion_scale: 0.03,
    gravity: None,
    fade: FadeRule::FadeIn { ramp_ms: 600.0 },
    expire: ExpirePolicy::Recycle(RespawnEdge::Bottom),
    caps: QualityCaps::new(5, 8, 12),
    flutter: Some(Flutter {
        amplitude: 0.4,
        freq_hz: 0.45,
    }),
};

static TABLE: BehaviorTable<AdultAnimation> = BehaviorTable::new(&[
    BehaviorEntry {
        key: "first-job",
        emotion: Emotion::Proud,
        environment: EnvironmentFlags::INDOORS,
        update: update_first_job,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "promotion",
        emotion: Emotion::Proud,
        environment: EnvironmentFlags::PARTY,
        update: update_promotion,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "wedding",
        emotion: Emotion::Happy,
        environment: EnvironmentFlags::FESTIVAL,
        update: update_wedding,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "new-home",
        emotion: Emotion::Happy,
        environment: EnvironmentFlags::OUTDOORS,
        update: update_new_home,
        render: render_house,
    },
    BehaviorEntry {
        key: "windfall",
        emotion: Emotion::Excited,
        environment: EnvironmentFlags::NONE,
        update: update_windfall,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "career-change",
        emotion: Emotion::Worried,
        environment: EnvironmentFlags::INDOORS,
        update: update_career_change,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "burnout",
        emotion: Emotion::Sad,
        environment: EnvironmentFlags::INDOORS,
        update: update_burnout,
        render: no_overlay,
    },
]);

/// Adult-event animation instance.
pub struct AdultAnimation {
    core: AnimationCore,
    behavior: &'static BehaviorEntry<AdultAnimation>,
    bills: ParticleField,
    confetti: ParticleField,
    hearts: ParticleField,
    burst_fired: bool,
    glow: Option<GlowEffect>,
    rays: Option<RayBurst>,
    career_bar: Option<ProgressIndicator>,
}

impl AdultAnimation {
    fn default_shape() -> BodyShape {
        BodyShape {
            head_radius: 17.0,
            body_width: 32.0,
            body_height: 52.0,
            limb_thickness: 7.0,
            palette: ColorPalette {
                outfit: Rgba8::opaque(70, 90, 120),
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

        let mut bills = ParticleField::new(BILLS, canvas, config.seed ^ 0x4341_5348);
        bills.spawn(BILLS.caps.high, |_, rng| {
            let x = rng.next_range(0.0, f64::from(canvas.width));
            let y = rng.next_range(-f64::from(canvas.height), 0.0);
            Particle {
                position: Point::new(x, y),
                velocity: Vec2::new(0.0, rng.next_range(0.7, 1.5)),
                rotation: rng.next_range(-0.4, 0.4),
                rotation_speed: rng.next_range(-0.004, 0.004),
                size: rng.next_range(8.0, 12.0),
                color: Rgba8::opaque(110, 190, 120),
                max_opacity: rng.next_range(0.7, 1.0),
                life_ms: rng.next_range(4000.0, 9000.0),
                max_life_ms: 9000.0,
                shape: ParticleShape::Custom,
                flutter: rng.next_range(0.0, std::f64::consts::TAU),
                ..Particle::default()
            }
        });
        bills.set_intensity(0.0);

        let confetti = ParticleField::new(CONFETTI, canvas, config.seed ^ 0x5052_4f4d);

        let mut hearts = ParticleField::new(HEARTS, canvas, config.seed ^ 0x5745_4444);
        hearts.spawn(HEARTS.caps.high, |_, rng| {
            let position = scatter_in(rng, canvas.rect());
            Particle {
                position,
                velocity: Vec2::new(0.0, rng.next_range(-0.9, -0.4)),
                size: rng.next_range(8.0, 14.0),
                color: Rgba8::opaque(245, 140, 160),
                max_opacity: rng.next_range(0.4, 0.7),
                life_ms: rng.next_range(3000.0, 7000.0),
                max_life_ms: 7000.0,
                shape: ParticleShape::Heart,
                flutter: rng.next_range(0.0, std::f64::consts::TAU),
                ..Particle::default()
            }
        });
        hearts.set_intensity(0.0);

        let mut anim = Self {
            core,
            behavior,
            bills,
            confetti,
            hearts,
            burst_fired: false,
            glow: None,
            rays: None,
            career_bar: None,
        };
        anim.set_quality(config.quality);
        anim
    }

    fn fire_confetti(&mut self, origin: Point) {
        if self.burst_fired {
            return;
        }
        self.burst_fired = true;
        let top = Point::new(origin.x, origin.y - 140.0);
        self.confetti.spawn(CONFETTI.caps.high, |i, rng| {
            let colors = [
                Rgba8::opaque(250, 210, 90),
                Rgba8::opaque(240, 240, 240),
                Rgba8::opaque(150, 190, 250),
            ];
            Particle {
                position: ring_around(rng, top, 8.0, 6.0),
                velocity: Vec2::new(rng.next_range(-1.6, 1.6), rng.next_range(-1.2, 0.2)),
                rotation: rng.next_range(0.0, std::f64::consts::TAU),
                rotation_speed: rng.next_range(-0.01, 0.01),
                size: rng.next_range(4.0, 7.0),
                color: colors[i % colors.len()],
                max_opacity: 1.0,
                life_ms: rng.next_range(1200.0, 2500.0),
                max_life_ms: 2500.0,
                shape: ParticleShape::Custom,
                ..Particle::default()
            }
        });
        self.core
            .quality
            .apply(self.core.quality.level(), &mut [&mut self.confetti]);
    }
}

fn update_first_job(s: &mut AdultAnimation, f: &FrameCtx) {
    s.core.character.position = f.origin;
    s.career_bar = Some(ProgressIndicator {
        fraction: f.progress,
        color: Rgba8::opaque(110, 160, 220),
    });
    s.glow = Some(GlowEffect {
        center: f.origin,
        radius: 100.0,
        intensity: 0.2 + 0.15 * f.progress,
        color: Rgba8::opaque(220, 230, 255),
    });
}

fn update_promotion(s: &mut AdultAnimation, f: &FrameCtx) {
    s.core.character.position.y = f.origin.y - 6.0 * f.progress;
    if f.progress > 0.15 {
        s.fire_confetti(f.origin);
    }
    s.rays = Some(RayBurst {
        center: Point::new(f.origin.x, f.origin.y - 70.0),
        count: 10,
        length: 60.0 + 50.0 * f.progress,
        intensity: 0.3 + 0.25 * pulse01(f.progress),
        color: Rgba8::opaque(255, 230, 150),
        angle_offset: f.time_ms * 0.0004,
    });
    s.career_bar = Some(ProgressIndicator {
        fraction: f.progress,
        color: Rgba8::opaque(250, 200, 100),
    });
}

fn update_wedding(s: &mut AdultAnimation, f: &FrameCtx) {
    s.core.character.position = f.origin;
    s.hearts.set_intensity(0.5 + 0.5 * f.progress.min(0.4) * 2.5);
    if f.progress > 0.5 {
        s.fire_confetti(f.origin);
    }
    s.glow = Some(GlowEffect {
        center: f.origin,
        radius: 140.0,
        intensity: 0.3 + 0.2 * pulse01(f.progress),
        color: Rgba8::opaque(255, 235, 225),
    });
}

fn update_new_home(s: &mut AdultAnimation, f: &FrameCtx) {
    // Walk toward the house on the right.
    s.core.character.position.x = f.origin.x + 50.0 * f.progress.min(0.6) / 0.6;
    s.glow = Some(GlowEffect {
        center: Point::new(f.origin.x + 150.0, f.origin.y - 60.0),
        radius: 110.0,
        intensity: 0.25 + 0.15 * f.progress,
        color: Rgba8::opaque(255, 220, 170),
    });
}

fn update_windfall(s: &mut AdultAnimation, f: &FrameCtx) {
    s.core.character.position = f.origin;
    s.core.character.scale = 1.0 + 0.04 * (f.time_ms * 0.006).sin();
    // Money rain ramps in over the first fifth and then pours.
    s.bills.set_intensity((f.progress * 5.0).min(1.0));
    s.glow = Some(GlowEffect {
        center: f.origin,
        radius: 120.0,
        intensity: 0.25 + 0.2 * pulse01(f.progress),
        color: Rgba8::opaque(180, 240, 180),
    });
}

fn update_career_change(s: &mut AdultAnimation, f: &FrameCtx) {
    // Pacing back and forth.
    s.core.character.position.x = f.origin.x + (f.time_ms * 0.002).sin() * 24.0;
    s.glow = None;
    s.career_bar = Some(ProgressIndicator {
        fraction: 1.0 - f.progress,
        color: Rgba8::opaque(200, 160, 110),
    });
}

fn update_burnout(s: &mut AdultAnimation, f: &FrameCtx) {
    s.core.character.position = f.origin;
    s.core.character.scale = 1.0 - 0.05 * f.progress;
    s.bills.set_intensity(0.0);
    s.hearts.set_intensity(0.0);
    s.glow = Some(GlowEffect {
        center: f.origin,
        radius: 90.0,
        intensity: 0.12,
        color: Rgba8::opaque(160, 160, 175),
    });
}

fn no_overlay(_: &AdultAnimation, _: &mut SceneCtx) -> StagefxResult<()> {
    Ok(())
}

/// Little gabled house to the right of the character.
fn render_house(s: &AdultAnimation, ctx: &mut SceneCtx) -> StagefxResult<()> {
    let c = s.core.character.position;
    let base = Rect::new(c.x + 100.0, c.y - 90.0, c.x + 200.0, c.y);
    ctx.fill_rect(base, Rgba8::opaque(235, 215, 180));
    let mut roof = BezPath::new();
    roof.move_to((base.x0 - 10.0, base.y0));
    roof.line_to(((base.x0 + base.x1) * 0.5, base.y0 - 45.0));
    roof.line_to((base.x1 + 10.0, base.y0));
    roof.close_path();
    ctx.fill_path(&roof, Rgba8::opaque(170, 90, 70));
    ctx.fill_rect(
        Rect::new(base.x0 + 38.0, base.y1 - 44.0, base.x0 + 62.0, base.y1),
        Rgba8::opaque(120, 80, 55),
    );
    // Lit window warms up as the animation progresses.
    let warm = Rgba8::opaque(200, 200, 210).lerp(
        Rgba8::opaque(255, 230, 150),
        s.core.clock.progress(),
    );
    ctx.fill_rect(Rect::new(base.x0 + 12.0, base.y0 + 14.0, base.x0 + 30.0, base.y0 + 32.0), warm);
    Ok(())
}

impl RenderLayers for AdultAnimation {
    fn render_environment(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        let canvas = ctx.canvas();
        let env = self.core.environment;
        let sway = self.core.decor_sway();
        let (top, bottom) = match self.behavior.key {
            "burnout" => (Rgba8::opaque(190, 190, 200), Rgba8::opaque(165, 165, 178)),
            "windfall" => (Rgba8::opaque(205, 235, 205), Rgba8::opaque(235, 250, 235)),
            _ if env.indoors => (Rgba8::opaque(238, 236, 230), Rgba8::opaque(218, 214, 206)),
            _ => (Rgba8::opaque(145, 200, 245), Rgba8::opaque(220, 242, 255)),
        };
        backdrop::sky(ctx, canvas, top, bottom)?;
        if env.nature {
            backdrop::hills(ctx, canvas, Rgba8::opaque(135, 190, 120))?;
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
        pipeline::draw_field(ctx, &self.bills)?;
        pipeline::draw_field(ctx, &self.hearts)?;
        pipeline::draw_field(ctx, &self.confetti)
    }

    fn render_character(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        let c = self.core.character;
        draw_character(ctx, &self.core.shape, c.position, c.scale, c.opacity, self.core.emotion)
    }

    fn render_overlays(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        pipeline::draw_glow(ctx, self.glow.as_ref())?;
        pipeline::draw_rays(ctx, self.rays.as_ref())?;
        pipeline::draw_progress(ctx, self.career_bar.as_ref())?;
        (self.behavior.render)(self, ctx)
    }
}

impl StageAnimation for AdultAnimation {
    fn update(&mut self, time_ms: TimeMs, delta_ms: TimeMs) {
        let frame = self.core.advance(time_ms, delta_ms);
        let update = self.behavior.update;
        update(self, &frame);
        self.bills.tick(delta_ms);
        self.confetti.tick(delta_ms);
        self.hearts.tick(delta_ms);
    }

    fn render(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        pipeline::render_frame(self, ctx)
    }

    fn is_animation_complete(&self) -> bool {
        self.core.clock.is_complete()
    }

    fn set_quality(&mut self, level: QualityLevel) {
        self.core.quality.apply(
            level,
            &mut [&mut self.bills, &mut self.confetti, &mut self.hearts],
        );
    }

    fn set_body_shape(&mut self, shape: BodyShape) {
        self.core.shape = shape;
    }

    fn cleanup(&mut self) {
        tracing::trace!(event = self.behavior.key, "cleanup");
        self.bills.clear();
        self.confetti.clear();
        self.hearts.clear();
        self.glow = None;
        self.rays = None;
        self.career_bar = None;
    }
}
