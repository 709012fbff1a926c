//! Bounded particle fields with per-field physics and opacity rules.

use crate::engine::quality::{QualityCaps, QualityLevel};
use crate::foundation::core::{Canvas, Point, Rect, Rgba8, TimeMs, Vec2};
use crate::foundation::math::{Rng64, clamp01};

/// Shape tag consumed by the particle draw layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParticleShape {
    /// Filled disc.
    #[default]
    Circle,
    /// Two-lobe heart.
    Heart,
    /// Five-point star.
    Star,
    /// Small axis-aligned square (bills, confetti, petals).
    Custom,
}

/// One transient visual element, owned exclusively by its field.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    /// Position in canvas pixels.
    pub position: Point,
    /// Velocity in pixels per tick-unit (scaled by the field's motion scale).
    pub velocity: Vec2,
    /// Current rotation in radians.
    pub rotation: f64,
    /// Rotation speed in radians per ms.
    pub rotation_speed: f64,
    /// Draw size in pixels.
    pub size: f64,
    /// Base color.
    pub color: Rgba8,
    /// Current opacity, always within `[0, max_opacity]`.
    pub opacity: f64,
    /// Opacity ceiling, always within `[0, 1]`.
    pub max_opacity: f64,
    /// Remaining life in ms.
    pub life_ms: TimeMs,
    /// Authored life in ms.
    pub max_life_ms: TimeMs,
    /// Shape tag.
    pub shape: ParticleShape,
    /// Free-running phase offset for sine-pulse opacity.
    pub sparkle: f64,
    /// Phase offset for horizontal flutter drift.
    pub flutter: f64,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            rotation_speed: 0.0,
            size: 2.0,
            color: Rgba8::opaque(255, 255, 255),
            opacity: 0.0,
            max_opacity: 1.0,
            life_ms: 1000.0,
            max_life_ms: 1000.0,
            shape: ParticleShape::Circle,
            sparkle: 0.0,
            flutter: 0.0,
        }
    }
}

impl Particle {
    /// Remaining life as a ratio in `[0, 1]`.
    pub fn life_ratio(&self) -> f64 {
        if self.max_life_ms <= 0.0 {
            return 0.0;
        }
        clamp01(self.life_ms / self.max_life_ms)
    }
}

/// Opacity rule applied per tick to every particle in a field.
#[derive(Clone, Copy, Debug)]
pub enum FadeRule {
    /// `0.5 + 0.5 * sin(...)` over field time, offset by each particle's sparkle phase.
    SinePulse {
        /// Pulse frequency in Hz.
        freq_hz: f64,
    },
    /// Linear ramp from 0 over the first `ramp_ms` of a particle's life.
    FadeIn {
        /// Ramp length in ms.
        ramp_ms: TimeMs,
    },
    /// Linear ramp to 0 over the last `ramp_ms` of a particle's life.
    FadeOut {
        /// Ramp length in ms.
        ramp_ms: TimeMs,
    },
    /// Opacity proportional to remaining life.
    LifeRatio,
}

/// What happens when a particle's life reaches zero (or it leaves the canvas band).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpirePolicy {
    /// One-shot fields (click bursts): the particle is dropped.
    Remove,
    /// Decorative fields (rain, leaves, drifting hearts): the particle respawns at
    /// the named canvas edge with fresh life.
    Recycle(RespawnEdge),
}

/// Edge at which recycled particles re-enter the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RespawnEdge {
    /// Re-enter just above the top edge (falling fields).
    Top,
    /// Re-enter just below the bottom edge (rising fields).
    Bottom,
}

/// Optional sinusoidal horizontal drift (leaves, bubbles).
#[derive(Clone, Copy, Debug)]
pub struct Flutter {
    /// Drift amplitude in velocity units.
    pub amplitude: f64,
    /// Drift frequency in Hz.
    pub freq_hz: f64,
}

/// Static per-field configuration.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    /// Field name, used for logging and diagnostics.
    pub name: &'static str,
    /// Velocity-to-position scale `k` (`position += velocity * dt * k`).
    pub motion_scale: f64,
    /// Per-tick addition to `velocity.y`, if the field is gravity-affected.
    pub gravity: Option<f64>,
    /// Opacity rule.
    pub fade: FadeRule,
    /// Expiry policy.
    pub expire: ExpirePolicy,
    /// Per-tier particle caps.
    pub caps: QualityCaps,
    /// Optional horizontal flutter drift.
    pub flutter: Option<Flutter>,
}

/// A bounded collection of particles sharing one physics/opacity update rule.
///
/// Fields are exclusively owned by their animation instance; no particle outlives it.
#[derive(Clone, Debug)]
pub struct ParticleField {
    spec: FieldSpec,
    canvas: Canvas,
    particles: Vec<Particle>,
    rng: Rng64,
    elapsed_ms: TimeMs,
    intensity: f64,
}

impl ParticleField {
    /// Create an empty field.
    pub fn new(spec: FieldSpec, canvas: Canvas, seed: u64) -> Self {
        Self {
            spec,
            canvas,
            particles: Vec::new(),
            rng: Rng64::new(seed),
            elapsed_ms: 0.0,
            intensity: 1.0,
        }
    }

    /// Field name.
    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    /// Per-tier caps authored for this field.
    pub fn caps(&self) -> QualityCaps {
        self.spec.caps
    }

    /// Live particle count.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the field holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Iterate live particles in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Opacity multiplier in `[0, 1]`; behavior handlers drive this from 0 to mark a
    /// field active.
    pub fn set_intensity(&mut self, intensity: f64) {
        self.intensity = clamp01(intensity);
    }

    /// Current opacity multiplier.
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Fill the field up to `count` particles using a seed factory.
    ///
    /// The factory controls the initial distribution (ring around a center, scatter
    /// in a rectangle); opacity invariants are clamped on entry.
    pub fn spawn(&mut self, count: usize, mut factory: impl FnMut(usize, &mut Rng64) -> Particle) {
        while self.particles.len() < count {
            let index = self.particles.len();
            let mut p = factory(index, &mut self.rng);
            p.max_opacity = clamp01(p.max_opacity);
            p.opacity = p.opacity.clamp(0.0, p.max_opacity);
            if p.max_life_ms <= 0.0 {
                p.max_life_ms = 1.0;
            }
            self.particles.push(p);
        }
    }

    /// Advance every particle by `delta_ms`: Euler position step, optional gravity,
    /// rotation, expiry handling, then the field's opacity rule.
    pub fn tick(&mut self, delta_ms: TimeMs) {
        self.elapsed_ms += delta_ms;
        let spec = self.spec;
        let canvas = self.canvas;
        let elapsed = self.elapsed_ms;
        let intensity = self.intensity;
        let rng = &mut self.rng;

        for p in &mut self.particles {
            p.life_ms -= delta_ms;

            p.position.x += p.velocity.x * delta_ms * spec.motion_scale;
            p.position.y += p.velocity.y * delta_ms * spec.motion_scale;
            if let Some(flutter) = spec.flutter {
                let phase = elapsed * 0.001 * flutter.freq_hz * std::f64::consts::TAU + p.flutter;
                p.position.x += phase.sin() * flutter.amplitude * delta_ms * spec.motion_scale;
            }
            if let Some(g) = spec.gravity {
                p.velocity.y += g;
            }
            p.rotation += p.rotation_speed * delta_ms;

            if let ExpirePolicy::Recycle(edge) = spec.expire {
                let band = p.size.max(1.0) * 2.0;
                let left = match edge {
                    RespawnEdge::Top => p.position.y > f64::from(canvas.height) + band,
                    RespawnEdge::Bottom => p.position.y < -band,
                };
                if p.life_ms <= 0.0 || left {
                    p.life_ms = p.max_life_ms;
                    p.position.x = rng.next_range(0.0, f64::from(canvas.width));
                    p.position.y = match edge {
                        RespawnEdge::Top => -band,
                        RespawnEdge::Bottom => f64::from(canvas.height) + band,
                    };
                }
            }

            let base = match spec.fade {
                FadeRule::SinePulse { freq_hz } => {
                    let phase = elapsed * 0.001 * freq_hz * std::f64::consts::TAU + p.sparkle;
                    0.5 + 0.5 * phase.sin()
                }
                FadeRule::FadeIn { ramp_ms } => {
                    let lived = p.max_life_ms - p.life_ms;
                    if ramp_ms <= 0.0 {
                        1.0
                    } else {
                        clamp01(lived / ramp_ms)
                    }
                }
                FadeRule::FadeOut { ramp_ms } => {
                    if ramp_ms <= 0.0 {
                        1.0
                    } else {
                        clamp01(p.life_ms / ramp_ms)
                    }
                }
                FadeRule::LifeRatio => p.life_ratio(),
            };
            p.opacity = (p.max_opacity * base * intensity).clamp(0.0, p.max_opacity);
        }

        if spec.expire == ExpirePolicy::Remove {
            self.particles.retain(|p| p.life_ms > 0.0);
        }
    }

    /// Drop excess particles from the end of the collection.
    ///
    /// Used by the quality controller; idempotent for a fixed `max_count`.
    pub fn truncate(&mut self, max_count: usize) {
        self.particles.truncate(max_count);
    }

    /// Truncate to this field's cap for `level`.
    pub fn apply_quality(&mut self, level: QualityLevel) {
        self.truncate(self.spec.caps.cap(level));
    }

    /// Remove every particle. Idempotent.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

/// Uniform scatter position inside a rectangle.
pub fn scatter_in(rng: &mut Rng64, rect: Rect) -> Point {
    Point::new(
        rng.next_range(rect.x0, rect.x1),
        rng.next_range(rect.y0, rect.y1),
    )
}

/// Position on a jittered ring around `center`.
pub fn ring_around(rng: &mut Rng64, center: Point, radius: f64, jitter: f64) -> Point {
    let angle = rng.next_range(0.0, std::f64::consts::TAU);
    let r = radius + rng.next_range(-jitter, jitter);
    Point::new(center.x + angle.cos() * r, center.y + angle.sin() * r)
}

#[cfg(test)]
#[path = "../../tests/unit/engine/particle.rs"]
mod tests;
