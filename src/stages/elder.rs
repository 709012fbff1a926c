//! Elder stage: slow light, leaves, and memories.

use crate::character::{BodyShape, ColorPalette, Emotion, draw_character};
use crate::engine::behavior::{BehaviorEntry, BehaviorTable, EnvironmentFlags, FrameCtx};
use crate::engine::instance::{AnimationCore, EventConfig, StageAnimation};
use crate::engine::particle::{
    ExpirePolicy, FadeRule, FieldSpec, Flutter, Particle, ParticleField, ParticleShape,
    RespawnEdge, scatter_in,
};
use crate::engine::phase::PhaseClock;
use crate::engine::quality::{QualityCaps, QualityLevel};
use crate::foundation::core::{Canvas, Point, Rect, Rgba8, TimeMs, Vec2};
use crate::foundation::error::StagefxResult;
use crate::foundation::math::pulse01;
use crate::render::context::SceneCtx;
use crate::render::pipeline::{self, GlowEffect, RayBurst, RenderLayers};
use crate::stages::backdrop;

const LEAVES: FieldSpec = FieldSpec {
    name: "elder-leaves",
    motion_scale: 0.03,
    gravity: None,
    fade: FadeRule::FadeIn { ramp_ms: 800.0 },
    expire: ExpirePolicy::Recycle(RespawnEdge::Top),
    caps: QualityCaps::new(6, 10, 16),
    flutter: Some(Flutter {
        amplitude: 1.0,
        freq_hz: 0.3,
    }),
};

const MEMORIES: FieldSpec = FieldSpec {
    name: "elder-memories",
    motion_scale: 0.008,
    gravity: None,
    fade: FadeRule::SinePulse { freq_hz: 0.5 },
    expire: ExpirePolicy::Remove,
    caps: QualityCaps::new(7, 10, 15),
    flutter: None,
};

static TABLE: BehaviorTable<ElderAnimation> = BehaviorTable::new(&[
    BehaviorEntry {
        key: "garden-morning",
        emotion: Emotion::Calm,
        environment: EnvironmentFlags::OUTDOORS,
        update: update_garden,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "retirement",
        emotion: Emotion::Proud,
        environment: EnvironmentFlags::PARTY,
        update: update_retirement,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "grandchild",
        emotion: Emotion::Happy,
        environment: EnvironmentFlags::INDOORS,
        update: update_grandchild,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "old-friends",
        emotion: Emotion::Happy,
        environment: EnvironmentFlags::INDOORS,
        update: update_old_friends,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "memory-lane",
        emotion: Emotion::Calm,
        environment: EnvironmentFlags::NONE,
        update: update_memory_lane,
        render: render_photographs,
    },
    BehaviorEntry {
        key: "quiet-evening",
        emotion: Emotion::Calm,
        environment: EnvironmentFlags::INDOORS,
        update: update_quiet_evening,
        render: no_overlay,
    },
    BehaviorEntry {
        key: "legacy",
        emotion: Emotion::Proud,
        environment: EnvironmentFlags::NONE,
        update: update_legacy,
        render: no_overlay,
    },
]);

/// Elder-event animation instance.
pub struct ElderAnimation {
    core: AnimationCore,
    behavior: &'static BehaviorEntry<ElderAnimation>,
    leaves: ParticleField,
    memories: ParticleField,
    glow: Option<GlowEffect>,
    rays: Option<RayBurst>,
}

impl ElderAnimation {
    fn default_shape() -> BodyShape {
        BodyShape {
            head_radius: 16.0,
            body_width: 30.0,
            body_height: 44.0,
            limb_thickness: 6.0,
            palette: ColorPalette {
                outfit: Rgba8::opaque(130, 110, 140),
                hair: Rgba8::opaque(200, 200, 205),
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

        let mut leaves = ParticleField::new(LEAVES, canvas, config.seed ^ 0x4c45_4146);
        leaves.spawn(LEAVES.caps.high, |i, rng| {
            let x = rng.next_range(0.0, f64::from(canvas.width));
            let y = rng.next_range(-f64::from(canvas.height), f64::from(canvas.height));
            let autumn = [
                Rgba8::opaque(210, 140, 70),
                Rgba8::opaque(190, 110, 60),
                Rgba8::opaque(225, 180, 90),
            ];
            Particle {
                position: Point::new(x, y),
                velocity: Vec2::new(0.0, rng.next_range(0.4, 0.9)),
                rotation: rng.next_range(0.0, std::f64::consts::TAU),
                rotation_speed: rng.next_range(-0.003, 0.003),
                size: rng.next_range(6.0, 10.0),
                color: autumn[i % autumn.len()],
                max_opacity: rng.next_range(0.6, 0.9),
                life_ms: rng.next_range(5000.0, 11_000.0),
                max_life_ms: 11_000.0,
                shape: ParticleShape::Custom,
                flutter: rng.next_range(0.0, std::f64::consts::TAU),
                ..Particle::default()
            }
        });
        leaves.set_intensity(0.0);

        let mut memories = ParticleField::new(MEMORIES, canvas, config.seed ^ 0x4d45_4d4f);
        memories.spawn(MEMORIES.caps.high, |i, rng| {
            let position = scatter_in(rng, canvas.rect());
            Particle {
                position,
                velocity: Vec2::new(rng.next_range(-0.3, 0.3), rng.next_range(-0.3, 0.1)),
                size: rng.next_range(2.5, 5.0),
                color: Rgba8::opaque(255, 235, 190),
                max_opacity: rng.next_range(0.3, 0.7),
                life_ms: 60_000.0,
                max_life_ms: 60_000.0,
                shape: if i % 5 == 0 {
                    ParticleShape::Star
                } else {
                    ParticleShape::Circle
                },
                sparkle: rng.next_range(0.0, std::f64::consts::TAU),
                ..Particle::default()
            }
        });
        memories.set_intensity(0.0);

        let mut anim = Self {
            core,
            behavior,
            leaves,
            memories,
            glow: None,
            rays: None,
        };
        anim.set_quality(config.quality);
        anim
    }

    fn sway(&mut self, f: &FrameCtx) {
        self.core.character.position.x = f.origin.x + (f.time_ms * 0.0012).sin() * 3.0;
    }
}

fn update_garden(s: &mut ElderAnimation, f: &FrameCtx) {
    s.sway(f);
    s.leaves.set_intensity(0.8);
    s.glow = Some(GlowEffect {
        center: Point::new(f.origin.x - 120.0, f.origin.y - 160.0),
        radius: 140.0,
        intensity: 0.2 + 0.1 * f.progress,
        color: Rgba8::opaque(255, 240, 200),
    });
}

fn update_retirement(s: &mut ElderAnimation, f: &FrameCtx) {
    s.sway(f);
    s.memories.set_intensity(0.6);
    s.rays = Some(RayBurst {
        center: Point::new(f.origin.x, f.origin.y - 70.0),
        count: 9,
        length: 55.0 + 40.0 * f.progress,
        intensity: 0.3 + 0.2 * pulse01(f.progress),
        color: Rgba8::opaque(255, 225, 150),
        angle_offset: f.time_ms * 0.0003,
    });
}

fn update_grandchild(s: &mut ElderAnimation, f: &FrameCtx) {
    s.sway(f);
    s.memories.set_intensity(0.4);
    s.glow = Some(GlowEffect {
        center: f.origin,
        radius: 120.0,
        intensity: 0.25 + 0.2 * pulse01(f.progress),
        color: Rgba8::opaque(255, 215, 200),
    });
}

fn update_old_friends(s: &mut ElderAnimation, f: &FrameCtx) {
    s.sway(f);
    s.memories.set_intensity(0.5);
    s.glow = Some(GlowEffect {
        center: f.origin,
        radius: 130.0,
        intensity: 0.22,
        color: Rgba8::opaque(255, 230, 190),
    });
}

fn update_memory_lane(s: &mut ElderAnimation, f: &FrameCtx) {
    s.core.character.position = f.origin;
    // Memories surface gradually over the whole animation.
    s.memories.set_intensity(f.progress);
    s.glow = Some(GlowEffect {
        center: f.origin,
        radius: 150.0,
        intensity: 0.18,
        color: Rgba8::opaque(235, 215, 180),
    });
}

fn update_quiet_evening(s: &mut ElderAnimation, f: &FrameCtx) {
    s.sway(f);
    // Hearth flicker.
    let flicker = 0.75 + 0.25 * (f.time_ms * 0.011).sin() * (f.time_ms * 0.0063).sin();
    s.glow = Some(GlowEffect {
        center: Point::new(f.origin.x - 110.0, f.origin.y - 30.0),
        radius: 110.0,
        intensity: 0.3 * flicker,
        color: Rgba8::opaque(255, 170, 90),
    });
}

fn update_legacy(s: &mut ElderAnimation, f: &FrameCtx) {
    s.core.character.position = f.origin;
    s.memories.set_intensity(0.8);
    s.glow = Some(GlowEffect {
        center: f.origin,
        radius: 140.0,
        intensity: 0.25 + 0.25 * f.progress,
        color: Rgba8::opaque(255, 225, 160),
    });
    s.rays = if f.progress > 0.5 {
        Some(RayBurst {
            center: f.origin,
            count: 12,
            length: 90.0 * (f.progress - 0.5) * 2.0,
            intensity: 0.35,
            color: Rgba8::opaque(255, 240, 190),
            angle_offset: f.time_ms * 0.0002,
        })
    } else {
        None
    };
}

fn no_overlay(_: &ElderAnimation, _: &mut SceneCtx) -> StagefxResult<()> {
    Ok(())
}

/// Faded photographs drifting up beside the character.
fn render_photographs(s: &ElderAnimation, ctx: &mut SceneCtx) -> StagefxResult<()> {
    let c = s.core.character.position;
    let t = s.core.clock.current_time();
    let progress = s.core.clock.progress();
    let frames = [(-120.0, 0.1), (90.0, 0.35), (-70.0, 0.6)];
    for (i, (dx, threshold)) in frames.iter().copied().enumerate() {
        if progress < threshold {
            continue;
        }
        let rise = ((progress - threshold) * 3.0).min(1.0);
        let y = c.y - 60.0 - 50.0 * rise + (t * 0.001 + i as f64).sin() * 4.0;
        let alpha = (180.0 * rise) as u8;
        let photo = Rect::new(c.x + dx, y, c.x + dx + 44.0, y + 34.0);
        ctx.fill_rounded_rect(photo.inset(3.0), 2.0, Rgba8::new(250, 246, 235, alpha));
        ctx.fill_rect(photo, Rgba8::new(200, 180, 150, alpha));
    }
    Ok(())
}

impl RenderLayers for ElderAnimation {
    fn render_environment(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        let canvas = ctx.canvas();
        let env = self.core.environment;
        let sway = self.core.decor_sway();
        let (top, bottom) = match self.behavior.key {
            "memory-lane" => (Rgba8::opaque(225, 210, 185), Rgba8::opaque(205, 188, 162)),
            "quiet-evening" => (Rgba8::opaque(70, 60, 90), Rgba8::opaque(110, 85, 105)),
            _ if env.indoors => (Rgba8::opaque(246, 238, 226), Rgba8::opaque(228, 216, 200)),
            _ => (Rgba8::opaque(250, 215, 170), Rgba8::opaque(255, 240, 220)),
        };
        backdrop::sky(ctx, canvas, top, bottom)?;
        if env.nature {
            let sun = Point::new(f64::from(canvas.width) * 0.8, f64::from(canvas.height) * 0.18);
            backdrop::orb(ctx, sun, 26.0, Rgba8::opaque(255, 225, 160))?;
            backdrop::hills(ctx, canvas, Rgba8::opaque(160, 170, 110))?;
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
        pipeline::draw_field(ctx, &self.leaves)?;
        pipeline::draw_field(ctx, &self.memories)
    }

    fn render_character(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        let c = self.core.character;
        draw_character(ctx, &self.core.shape, c.position, c.scale, c.opacity, self.core.emotion)
    }

    fn render_overlays(&self, ctx: &mut SceneCtx) -> StagefxResult<()> {
        pipeline::draw_glow(ctx, self.glow.as_ref())?;
        pipeline::draw_rays(ctx, self.rays.as_ref())?;
        (self.behavior.render)(self, ctx)
    }
}

impl StageAnimation for ElderAnimation {
    fn update(&mut self, time_ms: TimeMs, delta_ms: TimeMs) {
        let frame = self.core.advance(time_ms, delta_ms);
        let update = self.behavior.update;
        update(self, &frame);
        self.leaves.tick(delta_ms);
        self.memories.tick(delta_ms);
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
            .apply(level, &mut [&mut self.leaves, &mut self.memories]);
    }

    fn set_body_shape(&mut self, shape: BodyShape) {
        self.core.shape = shape;
    }

    fn cleanup(&mut self) {
        tracing::trace!(event = self.behavior.key, "cleanup");
        self.leaves.clear();
        self.memories.clear();
        self.glow = None;
        self.rays = None;
    }
}
