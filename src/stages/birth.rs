//! Birth stage: the arrival sequence.
//!
//! The only multi-phase stage. Time is split into `prebirth` (anticipation glow),
//! `birth` (the character fades and scales in) and `appear` (full presence with
//! sparkles and rays), at 2/7 and 5/7 of the configured duration.

use crate::character::{BodyShape, ColorPalette, Emotion, draw_character};
use crate::engine::behavior::{BehaviorEntry, BehaviorTable, EnvironmentFlags, FrameCtx};
use crate::engine::instance::{AnimationCore, EventConfig, StageAnimation};
use crate::engine::particle::{
    ExpirePolicy, FadeRule, FieldSpec, Flutter, Particle, ParticleField, ParticleShape,
    RespawnEdge, ring_around,
};
use crate::engine::phase::{PhaseClock, PhaseSpec};
use crate::engine::quality::{QualityCaps, QualityLevel};
use crate::foundation::core::{Canvas, Point, Rgba8, TimeMs, Vec2};
use crate::foundation::error::StagefxResult;
use crate::foundation::math::pulse01;
use crate::render::context::SceneCtx;
use crate::render::pipeline::{self, GlowEffect, RayBurst, RenderLayers};
use crate::stages::backdrop;

const SPARKLES: FieldSpec = FieldSpec {
    name: "birth-sparkles",
    motion_scale: 0.01,
    gravity: None,
    fade: FadeRule::SinePulse { freq_hz: 1.3 },
    expire: ExpirePolicy::Remove,
    caps: QualityCaps::new(14, 20, 28),
    flutter: None,
};

const MOTES: FieldSpec = FieldSpec {
    name: "birth-motes",
    motion_scale: 0.02,
    gravity: None,
    fade: FadeRule::FadeIn { ramp_ms: 900.0 },
    expire: ExpirePolicy::Recycle(RespawnEdge::Bottom),
    caps: QualityCaps::new(8, 12, 18),
    flutter: Some(Flutter {
        amplitude: 0.5,
        freq_hz: 0.35,
    }),
};

static TABLE: BehaviorTable<BirthAnimation> = BehaviorTable::new(&[
    BehaviorEntry {
        key: "gentle-arrival",
        emotion: Emotion::Calm,
        environment: EnvironmentFlags::INDOORS,
        update: update_gentle,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "celebrated-arrival",
        emotion: Emotion::Excited,
        environment: EnvironmentFlags::PARTY,
        update: update_celebrated,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "midnight-arrival",
        emotion: Emotion::Calm,
        environment: EnvironmentFlags::NONE,
        update: update_midnight,
        render: render_night_stars,
    },
    BehaviorEntry {
        key: "spring-arrival",
        emotion: Emotion::Happy,
        environment: EnvironmentFlags::OUTDOORS,
        update: update_spring,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "early-arrival",
        emotion: Emotion::Worried,
        environment: EnvironmentFlags::INDOORS,
        update: update_early,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "quiet-arrival",
        emotion: Emotion::Neutral,
        environment: EnvironmentFlags::INDOORS,
        update: update_quiet,
        render: no_overlay,
    },
]);

/// Arrival animation instance.
pub struct BirthAnimation {
    core: AnimationCore,
    behavior: &'static BehaviorEntry<BirthAnimation>,
    sparkles: ParticleField,
    motes: ParticleField,
    arrival_glow: Option<GlowEffect>,
    light_rays: Option<RayBurst>,
}

impl BirthAnimation {
    /// Newborn proportions: big head, tiny body.
    fn default_shape() -> BodyShape {
        BodyShape {
            head_radius: 14.0,
            body_width: 18.0,
            body_height: 20.0,
            limb_thickness: 4.0,
            palette: ColorPalette::default(),
        }
    }

    /// Build the instance and pre-seed its fields at the configured quality.
    pub fn new(canvas: Canvas, config: &EventConfig) -> StagefxResult<Self> {
        let d = config.duration_ms.max(0.0);
        let phases = [
            PhaseSpec::new("prebirth", 0.0, d * (2.0 / 7.0)),
            PhaseSpec::new("birth", d * (2.0 / 7.0), d * (5.0 / 7.0)),
            PhaseSpec::new("appear", d * (5.0 / 7.0), d),
        ];
        let clock = PhaseClock::with_phases(d, &phases)?;
        let behavior = TABLE.select(&config.event_type);
        let mut core = AnimationCore::new(clock, config, Self::default_shape());
        core.adopt(behavior);

        let origin = config.origin;
        let mut sparkles = ParticleField::new(SPARKLES, canvas, config.seed ^ 0x5041_524b);
        sparkles.spawn(SPARKLES.caps.high, |i, rng| {
            let position = ring_around(rng, origin, 60.0 + (i % 3) as f64 * 22.0, 14.0);
            let drift = Vec2::new(position.x - origin.x, position.y - origin.y) * 0.004;
            Particle {
                position,
                velocity: drift,
                size: rng.next_range(2.0, 5.0),
                color: Rgba8::opaque(255, 236, 170),
                max_opacity: rng.next_range(0.6, 1.0),
                life_ms: 60_000.0,
                max_life_ms: 60_000.0,
                shape: if i % 4 == 0 {
                    ParticleShape::Star
                } else {
                    ParticleShape::Circle
                },
                sparkle: rng.next_range(0.0, std::f64::consts::TAU),
                ..Particle::default()
            }
        });
        sparkles.set_intensity(0.0);

        let mut motes = ParticleField::new(MOTES, canvas, config.seed ^ 0x4d4f_5445);
        motes.spawn(MOTES.caps.high, |_, rng| {
            let x = rng.next_range(0.0, f64::from(canvas.width));
            let y = rng.next_range(0.0, f64::from(canvas.height));
            Particle {
                position: Point::new(x, y),
                velocity: Vec2::new(0.0, rng.next_range(-1.4, -0.6)),
                size: rng.next_range(2.0, 4.0),
                color: Rgba8::opaque(255, 250, 235),
                max_opacity: rng.next_range(0.25, 0.5),
                life_ms: rng.next_range(3000.0, 7000.0),
                max_life_ms: 7000.0,
                flutter: rng.next_range(0.0, std::f64::consts::TAU),
                ..Particle::default()
            }
        });
        motes.set_intensity(0.0);

        let mut anim = Self {
            core,
            behavior,
            sparkles,
            motes,
            arrival_glow: None,
            light_rays: None,
        };
        anim.set_quality(config.quality);
        Ok(anim)
    }

    /// Shared phase choreography: glow warms up, then the character fades and
    /// scales in, then everything settles at full presence.
    fn reveal(&mut self, f: &FrameCtx, color: Rgba8, warmth: f64, final_scale: f64) {
        let c = &mut self.core.character;
        match f.phase {
            "prebirth" => {
                c.opacity = 0.0;
                c.scale = 0.4;
                self.arrival_glow = Some(GlowEffect {
                    center: f.origin,
                    radius: 30.0 + 60.0 * f.phase_progress,
                    intensity: 0.3 * warmth * f.phase_progress,
                    color,
                });
                self.sparkles.set_intensity(0.35 * f.phase_progress);
                self.motes.set_intensity(0.0);
            }
            "birth" => {
                c.opacity = f.phase_progress;
                c.scale = 0.4 + (final_scale - 0.4) * f.phase_progress;
                self.arrival_glow = Some(GlowEffect {
                    center: f.origin,
                    radius: 90.0 + 40.0 * f.phase_progress,
                    intensity: warmth * (0.3 + 0.25 * f.phase_progress),
                    color,
                });
                self.sparkles.set_intensity(0.35 + 0.45 * f.phase_progress);
                self.motes.set_intensity(0.8 * f.phase_progress);
            }
            _ => {
                c.opacity = 1.0;
                c.scale = final_scale;
                let pulse = pulse01(f.phase_progress);
                self.arrival_glow = Some(GlowEffect {
                    center: f.origin,
                    radius: 130.0,
                    intensity: warmth * (0.3 + 0.35 * pulse),
                    color,
                });
                self.sparkles.set_intensity(1.0);
                self.motes.set_intensity(1.0);
            }
        }
    }
}

fn update_gentle(s: &mut BirthAnimation, f: &FrameCtx) {
    s.reveal(f, Rgba8::opaque(255, 220, 160), 0.9, 1.0);
}

fn update_celebrated(s: &mut BirthAnimation, f: &FrameCtx) {
    s.reveal(f, Rgba8::opaque(255, 214, 120), 1.0, 1.0);
    s.light_rays = if f.phase == "appear" {
        Some(RayBurst {
            center: f.origin,
            count: 12,
            length: 80.0 + 70.0 * f.phase_progress,
            intensity: 0.35 + 0.3 * pulse01(f.phase_progress),
            color: Rgba8::opaque(255, 235, 170),
            angle_offset: f.time_ms * 0.0004,
        })
    } else {
        None
    };
}

fn update_midnight(s: &mut BirthAnimation, f: &FrameCtx) {
    s.reveal(f, Rgba8::opaque(205, 215, 255), 0.6, 1.0);
}

fn update_spring(s: &mut BirthAnimation, f: &FrameCtx) {
    s.reveal(f, Rgba8::opaque(225, 250, 205), 0.8, 1.0);
    // Pollen motes carry the outdoor mood from the first frame.
    if f.phase == "prebirth" {
        s.motes.set_intensity(0.5 * f.phase_progress);
    }
}

fn update_early(s: &mut BirthAnimation, f: &FrameCtx) {
    s.reveal(f, Rgba8::opaque(255, 230, 200), 0.5, 0.85);
}

fn update_quiet(s: &mut BirthAnimation, f: &FrameCtx) {
    s.reveal(f, Rgba8::opaque(255, 228, 185), 0.4, 1.0);
    s.sparkles.set_intensity(s.sparkles.intensity() * 0.5);
}

fn no_overlay(_: &BirthAnimation, _: &mut SceneCtx) -> StagefxResult<()> {
    Ok(())
}

/// A handful of twinkling stars for the midnight sky.
fn render_night_stars(s: &BirthAnimation, ctx: &mut SceneCtx) -> StagefxResult<()> {
    const STARS: [(f64, f64); 9] = [
        (0.08, 0.12),
        (0.21, 0.07),
        (0.34, 0.18),
        (0.47, 0.05),
        (0.58, 0.14),
        (0.71, 0.09),
        (0.83, 0.2),
        (0.91, 0.06),
        (0.15, 0.26),
    ];
    let canvas = ctx.canvas();
    let t = s.core.clock.current_time();
    for (i, (fx, fy)) in STARS.iter().copied().enumerate() {
        let twinkle = 0.5 + 0.5 * (t * 0.003 + i as f64 * 1.7).sin();
        let p = Point::new(
            fx * f64::from(canvas.width),
            fy * f64::from(canvas.height),
        );
        ctx.fill_circle(p, 1.5, Rgba8::new(240, 244, 255, (90.0 + 140.0 * twinkle) as u8));
    }
    Ok(())
}

impl RenderLayers for BirthAnimation {
    fn render_environment(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        let canvas = ctx.canvas();
        let env = self.core.environment;
        let sway = self.core.decor_sway();
        let night = self.behavior.key == "midnight-arrival";
        let (top, bottom) = if night {
            (Rgba8::opaque(22, 26, 58), Rgba8::opaque(48, 54, 92))
        } else if env.indoors {
            (Rgba8::opaque(250, 238, 222), Rgba8::opaque(235, 215, 195))
        } else {
            (Rgba8::opaque(255, 214, 225), Rgba8::opaque(255, 246, 235))
        };
        backdrop::sky(ctx, canvas, top, bottom)?;
        if night {
            let moon = Point::new(f64::from(canvas.width) * 0.82, f64::from(canvas.height) * 0.16);
            backdrop::orb(ctx, moon, 26.0, Rgba8::opaque(235, 238, 250))?;
        }
        if env.nature {
            backdrop::hills(ctx, canvas, Rgba8::opaque(150, 200, 130))?;
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
        pipeline::draw_field(ctx, &self.motes)?;
        pipeline::draw_field(ctx, &self.sparkles)
    }

    fn render_character(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        let c = self.core.character;
        draw_character(ctx, &self.core.shape, c.position, c.scale, c.opacity, self.core.emotion)
    }

    fn render_overlays(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        pipeline::draw_glow(ctx, self.arrival_glow.as_ref())?;
        pipeline::draw_rays(ctx, self.light_rays.as_ref())?;
        (self.behavior.render)(self, ctx)
    }
}

impl StageAnimation for BirthAnimation {
    fn update(&mut self, time_ms: TimeMs, delta_ms: TimeMs) {
        let frame = self.core.advance(time_ms, delta_ms);
        let update = self.behavior.update;
        update(self, &frame);
        self.sparkles.tick(delta_ms);
        self.motes.tick(delta_ms);
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
            .apply(level, &mut [&mut self.sparkles, &mut self.motes]);
    }

    fn set_body_shape(&mut self, shape: BodyShape) {
        self.core.shape = shape;
    }

    fn cleanup(&mut self) {
        tracing::trace!(event = self.behavior.key, "cleanup");
        self.sparkles.clear();
        self.motes.clear();
        self.arrival_glow = None;
        self.light_rays = None;
    }
}
