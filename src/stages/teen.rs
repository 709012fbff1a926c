//! Teen stage: school, music, and big feelings.

use crate::character::{BodyShape, ColorPalette, Emotion, draw_character};
use crate::engine::behavior::{BehaviorEntry, BehaviorTable, EnvironmentFlags, FrameCtx};
use crate::engine::instance::{AnimationCore, EventConfig, StageAnimation};
use crate::engine::particle::{
    ExpirePolicy, FadeRule, FieldSpec, Flutter, Particle, ParticleField, ParticleShape,
    RespawnEdge, ring_around, scatter_in,
};
use crate::engine::phase::PhaseClock;
use crate::engine::quality::{QualityCaps, QualityLevel};
use crate::foundation::core::{Canvas, Point, Rect, Rgba8, TimeMs, Vec2};
use crate::foundation::error::StagefxResult;
use crate::foundation::math::pulse01;
use crate::render::context::SceneCtx;
use crate::render::pipeline::{self, GlowEffect, ProgressIndicator, RayBurst, RenderLayers};
use crate::stages::backdrop;

const SPARKS: FieldSpec = FieldSpec {
    name: "teen-sparks",
    motion_scale: 0.01,
    gravity: None,
    fade: FadeRule::SinePulse { freq_hz: 1.8 },
    expire: ExpirePolicy::Remove,
    caps: QualityCaps::new(8, 12, 18),
    flutter: None,
};

const HEARTS: FieldSpec = FieldSpec {
    name: "teen-hearts",
    motion_scale: 0.03,
    gravity: None,
    fade: FadeRule::FadeIn { ramp_ms: 700.0 },
    expire: ExpirePolicy::Recycle(RespawnEdge::Bottom),
    caps: QualityCaps::new(5, 8, 12),
    flutter: Some(Flutter {
        amplitude: 0.5,
        freq_hz: 0.4,
    }),
};

const CONFETTI: FieldSpec = FieldSpec {
    name: "teen-confetti",
    motion_scale: 0.05,
    gravity: Some(0.045),
    fade: FadeRule::FadeOut { ramp_ms: 450.0 },
    expire: ExpirePolicy::Remove,
    caps: QualityCaps::new(12, 18, 26),
    flutter: None,
};

static TABLE: BehaviorTable<TeenAnimation> = BehaviorTable::new(&[
    BehaviorEntry {
        key: "study-session",
        emotion: Emotion::Neutral,
        environment: EnvironmentFlags::INDOORS,
        update: update_study,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "exam-passed",
        emotion: Emotion::Proud,
        environment: EnvironmentFlags::PARTY,
        update: update_exam_passed,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "first-crush",
        emotion: Emotion::Happy,
        environment: EnvironmentFlags::NONE,
        update: update_first_crush,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "band-practice",
        emotion: Emotion::Excited,
        environment: EnvironmentFlags::INDOORS,
        update: update_band_practice,
        render: render_notes,
    },
    BehaviorEntry {
        key: "big-game",
        emotion: Emotion::Excited,
        environment: EnvironmentFlags::FESTIVAL,
        update: update_big_game,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "argument",
        emotion: Emotion::Sad,
        environment: EnvironmentFlags::INDOORS,
        update: update_argument,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "late-night-gaming",
        emotion: Emotion::Neutral,
        environment: EnvironmentFlags::NONE,
        update: update_gaming,
        render: render_screen,
    },
]);

/// Teen-event animation instance.
pub struct TeenAnimation {
    core: AnimationCore,
    behavior: &'static BehaviorEntry<TeenAnimation>,
    sparks: ParticleField,
    hearts: ParticleField,
    confetti: ParticleField,
    burst_fired: bool,
    glow: Option<GlowEffect>,
    rays: Option<RayBurst>,
    progress_bar: Option<ProgressIndicator>,
}

impl TeenAnimation {
    fn default_shape() -> BodyShape {
        BodyShape {
            head_radius: 16.0,
            body_width: 28.0,
            body_height: 46.0,
            limb_thickness: 6.0,
            palette: ColorPalette {
                outfit: Rgba8::opaque(90, 100, 130),
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

        let mut sparks = ParticleField::new(SPARKS, canvas, config.seed ^ 0x5350_524b);
        sparks.spawn(SPARKS.caps.high, |i, rng| {
            let position = scatter_in(rng, canvas.rect());
            Particle {
                position,
                size: rng.next_range(2.0, 5.0),
                color: Rgba8::opaque(255, 240, 190),
                max_opacity: rng.next_range(0.4, 0.8),
                life_ms: 60_000.0,
                max_life_ms: 60_000.0,
                shape: if i % 3 == 0 {
                    ParticleShape::Star
                } else {
                    ParticleShape::Circle
                },
                sparkle: rng.next_range(0.0, std::f64::consts::TAU),
                ..Particle::default()
            }
        });
        sparks.set_intensity(0.0);

        let mut hearts = ParticleField::new(HEARTS, canvas, config.seed ^ 0x4352_5553);
        hearts.spawn(HEARTS.caps.high, |_, rng| {
            let position = scatter_in(rng, canvas.rect());
            Particle {
                position,
                velocity: Vec2::new(0.0, rng.next_range(-1.0, -0.4)),
                size: rng.next_range(8.0, 14.0),
                color: Rgba8::opaque(240, 110, 140),
                max_opacity: rng.next_range(0.4, 0.75),
                life_ms: rng.next_range(3000.0, 7000.0),
                max_life_ms: 7000.0,
                shape: ParticleShape::Heart,
                flutter: rng.next_range(0.0, std::f64::consts::TAU),
                ..Particle::default()
            }
        });
        hearts.set_intensity(0.0);

        let confetti = ParticleField::new(CONFETTI, canvas, config.seed ^ 0x4558_414d);

        let mut anim = Self {
            core,
            behavior,
            sparks,
            hearts,
            confetti,
            burst_fired: false,
            glow: None,
            rays: None,
            progress_bar: None,
        };
        anim.set_quality(config.quality);
        anim
    }

    fn fire_confetti(&mut self, origin: Point) {
        if self.burst_fired {
            return;
        }
        self.burst_fired = true;
        let top = Point::new(origin.x, origin.y - 130.0);
        self.confetti.spawn(CONFETTI.caps.high, |i, rng| {
            let colors = [
                Rgba8::opaque(250, 210, 90),
                Rgba8::opaque(120, 200, 240),
                Rgba8::opaque(230, 120, 190),
            ];
            Particle {
                position: ring_around(rng, top, 6.0, 5.0),
                velocity: Vec2::new(rng.next_range(-1.8, 1.8), rng.next_range(-1.4, 0.0)),
                rotation: rng.next_range(0.0, std::f64::consts::TAU),
                rotation_speed: rng.next_range(-0.012, 0.012),
                size: rng.next_range(4.0, 7.0),
                color: colors[i % colors.len()],
                max_opacity: 1.0,
                life_ms: rng.next_range(1100.0, 2400.0),
                max_life_ms: 2400.0,
                shape: ParticleShape::Custom,
                ..Particle::default()
            }
        });
        self.core
            .quality
            .apply(self.core.quality.level(), &mut [&mut self.confetti]);
    }
}

fn update_study(s: &mut TeenAnimation, f: &FrameCtx) {
    s.core.character.position = f.origin;
    s.progress_bar = Some(ProgressIndicator {
        fraction: f.progress,
        color: Rgba8::opaque(130, 170, 240),
    });
    // Focus sparks brighten as the session winds down.
    s.sparks.set_intensity(0.3 * f.progress);
}

fn update_exam_passed(s: &mut TeenAnimation, f: &FrameCtx) {
    s.core.character.position.y = f.origin.y - (f.time_ms * 0.007).sin().abs() * 8.0;
    if f.progress > 0.1 {
        s.fire_confetti(f.origin);
    }
    s.sparks.set_intensity(0.8);
    s.glow = Some(GlowEffect {
        center: f.origin,
        radius: 120.0,
        intensity: 0.3 + 0.25 * pulse01(f.progress),
        color: Rgba8::opaque(255, 230, 150),
    });
}

fn update_first_crush(s: &mut TeenAnimation, f: &FrameCtx) {
    s.core.character.position = f.origin;
    s.core.character.scale = 1.0 + 0.03 * (f.time_ms * 0.005).sin();
    s.hearts.set_intensity(0.4 + 0.6 * f.progress.min(0.5) * 2.0);
    s.glow = Some(GlowEffect {
        center: f.origin,
        radius: 110.0,
        intensity: 0.25 * pulse01(f.progress),
        color: Rgba8::opaque(250, 170, 190),
    });
}

fn update_band_practice(s: &mut TeenAnimation, f: &FrameCtx) {
    // Head-bob on the beat.
    s.core.character.position.y = f.origin.y - ((f.time_ms * 0.01).sin() * 5.0).abs();
    s.sparks.set_intensity(0.6);
    s.glow = Some(GlowEffect {
        center: Point::new(f.origin.x, f.origin.y - 40.0),
        radius: 150.0,
        intensity: 0.35,
        color: Rgba8::opaque(200, 150, 255),
    });
}

fn update_big_game(s: &mut TeenAnimation, f: &FrameCtx) {
    s.core.character.position.y = f.origin.y - (f.time_ms * 0.009).sin().abs() * 10.0;
    if f.progress > 0.6 {
        s.fire_confetti(f.origin);
    }
    s.rays = Some(RayBurst {
        center: Point::new(f.origin.x, f.origin.y - 60.0),
        count: 10,
        length: 70.0 + 50.0 * f.progress,
        intensity: 0.35 + 0.2 * pulse01(f.progress),
        color: Rgba8::opaque(255, 245, 200),
        angle_offset: f.time_ms * 0.0005,
    });
}

fn update_argument(s: &mut TeenAnimation, f: &FrameCtx) {
    s.core.character.position = f.origin;
    s.core.character.scale = 0.97;
    s.sparks.set_intensity(0.0);
    s.hearts.set_intensity(0.0);
    s.glow = None;
}

fn update_gaming(s: &mut TeenAnimation, f: &FrameCtx) {
    s.core.character.position = f.origin;
    // Screen flicker: irregular beat from two incommensurate sines.
    let flicker = 0.7 + 0.2 * (f.time_ms * 0.013).sin() * (f.time_ms * 0.0071).sin();
    s.glow = Some(GlowEffect {
        center: Point::new(f.origin.x, f.origin.y - 50.0),
        radius: 130.0,
        intensity: 0.35 * flicker,
        color: Rgba8::opaque(140, 180, 255),
    });
}

fn no_overlay(_: &TeenAnimation, _: &mut SceneCtx) -> StagefxResult<()> {
    Ok(())
}

/// Floating quavers above the character during band practice.
fn render_notes(s: &TeenAnimation, ctx: &mut SceneCtx) -> StagefxResult<()> {
    let c = s.core.character.position;
    let t = s.core.clock.current_time();
    for i in 0..3 {
        let phase = t * 0.002 + i as f64 * 2.1;
        let x = c.x + 30.0 + i as f64 * 22.0 + phase.sin() * 6.0;
        let y = c.y - 100.0 - (phase * 0.7).sin() * 10.0;
        let alpha = (0.5 + 0.5 * (phase * 1.3).sin()) * 220.0;
        let ink = Rgba8::new(60, 50, 80, alpha as u8);
        ctx.fill_circle(Point::new(x, y), 4.0, ink);
        ctx.fill_rect(Rect::new(x + 3.0, y - 16.0, x + 4.5, y), ink);
    }
    Ok(())
}

/// Glowing screen slab in front of the character.
fn render_screen(s: &TeenAnimation, ctx: &mut SceneCtx) -> StagefxResult<()> {
    let c = s.core.character.position;
    let screen = Rect::new(c.x - 70.0, c.y - 70.0, c.x - 20.0, c.y - 35.0);
    ctx.fill_rounded_rect(screen.inset(3.0), 4.0, Rgba8::opaque(40, 40, 50));
    ctx.fill_rounded_rect(screen, 3.0, Rgba8::opaque(120, 160, 235));
    Ok(())
}

impl RenderLayers for TeenAnimation {
    fn render_environment(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        let canvas = ctx.canvas();
        let env = self.core.environment;
        let sway = self.core.decor_sway();
        let (top, bottom) = match self.behavior.key {
            "late-night-gaming" => (Rgba8::opaque(24, 24, 40), Rgba8::opaque(44, 44, 66)),
            "first-crush" => (Rgba8::opaque(255, 200, 220), Rgba8::opaque(255, 235, 240)),
            _ if env.indoors => (Rgba8::opaque(235, 232, 240), Rgba8::opaque(214, 210, 224)),
            _ => (Rgba8::opaque(140, 195, 245), Rgba8::opaque(215, 240, 255)),
        };
        backdrop::sky(ctx, canvas, top, bottom)?;
        if env.nature {
            backdrop::hills(ctx, canvas, Rgba8::opaque(120, 185, 110))?;
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
        pipeline::draw_field(ctx, &self.sparks)?;
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
        pipeline::draw_progress(ctx, self.progress_bar.as_ref())?;
        (self.behavior.render)(self, ctx)
    }
}

impl StageAnimation for TeenAnimation {
    fn update(&mut self, time_ms: TimeMs, delta_ms: TimeMs) {
        let frame = self.core.advance(time_ms, delta_ms);
        let update = self.behavior.update;
        update(self, &frame);
        self.sparks.tick(delta_ms);
        self.hearts.tick(delta_ms);
        self.confetti.tick(delta_ms);
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
            &mut [&mut self.sparks, &mut self.hearts, &mut self.confetti],
        );
    }

    fn set_body_shape(&mut self, shape: BodyShape) {
        self.core.shape = shape;
    }

    fn cleanup(&mut self) {
        tracing::trace!(event = self.behavior.key, "cleanup");
        self.sparks.clear();
        self.hearts.clear();
        self.confetti.clear();
        self.glow = None;
        self.rays = None;
        self.progress_bar = None;
    }
}
