//! The host-facing animation contract and the shared per-instance core.

use crate::character::{BodyShape, Emotion};
use crate::engine::behavior::{BehaviorEntry, EnvironmentFlags, FrameCtx};
use crate::engine::phase::PhaseClock;
use crate::engine::quality::{QualityController, QualityLevel};
use crate::foundation::core::{Point, TimeMs};
use crate::foundation::error::{StagefxError, StagefxResult};
use crate::render::context::SceneCtx;

/// Immutable animation input, selected once at construction.
///
/// The host's event source supplies the event type and anchor position; everything
/// else has game defaults and can be overridden per event.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Discriminant into the stage's behavior table. Unknown values fall back to the
    /// stage's default entry.
    pub event_type: String,
    /// Total animation duration in ms.
    pub duration_ms: TimeMs,
    /// Effect anchor, typically the clicked target position.
    pub origin: Point,
    /// Seed for all procedural scatter in this instance.
    pub seed: u64,
    /// Initial quality level.
    pub quality: QualityLevel,
    /// Optional body-shape override; stages fall back to their own default shape.
    pub shape: Option<BodyShape>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            event_type: String::new(),
            duration_ms: 4000.0,
            origin: Point::new(400.0, 300.0),
            seed: 0,
            quality: QualityLevel::High,
            shape: None,
        }
    }
}

impl EventConfig {
    /// Parse a config from the host's JSON form.
    pub fn from_json(s: &str) -> StagefxResult<Self> {
        serde_json::from_str(s).map_err(|e| StagefxError::serde(e.to_string()))
    }
}

/// Character placement state owned by an animation instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterState {
    /// Feet anchor in canvas pixels.
    pub position: Point,
    /// Uniform scale multiplier.
    pub scale: f64,
    /// Draw opacity in `[0, 1]`.
    pub opacity: f64,
}

impl CharacterState {
    /// Fully visible character at `position`.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

/// Shared composition core embedded in every stage animation: the phase clock,
/// character placement, behavior-derived flags, and the quality controller.
#[derive(Debug)]
pub struct AnimationCore {
    /// Time/phase source for the whole instance.
    pub clock: PhaseClock,
    /// Character placement, mutated by behavior handlers.
    pub character: CharacterState,
    /// Current body shape (stage default until the morphing collaborator pushes one).
    pub shape: BodyShape,
    /// Facial variant from the selected behavior entry.
    pub emotion: Emotion,
    /// Environment dressing from the selected behavior entry.
    pub environment: EnvironmentFlags,
    /// Effect anchor from the event source.
    pub origin: Point,
    /// Quality tier bookkeeping.
    pub quality: QualityController,
}

impl AnimationCore {
    /// Compose a core from a clock and config, placing the character at the anchor.
    pub fn new(clock: PhaseClock, config: &EventConfig, default_shape: BodyShape) -> Self {
        Self {
            clock,
            character: CharacterState::at(config.origin),
            shape: config.shape.unwrap_or(default_shape),
            emotion: Emotion::Neutral,
            environment: EnvironmentFlags::NONE,
            origin: config.origin,
            quality: QualityController::new(),
        }
    }

    /// Adopt the flags of a selected behavior entry.
    pub fn adopt<S>(&mut self, entry: &BehaviorEntry<S>) {
        self.emotion = entry.emotion;
        self.environment = entry.environment;
    }

    /// Advance the clock and build this frame's sampling context.
    pub fn advance(&mut self, time_ms: TimeMs, delta_ms: TimeMs) -> FrameCtx {
        self.clock.advance(time_ms);
        FrameCtx {
            time_ms,
            delta_ms,
            progress: self.clock.progress(),
            phase: self.clock.current_phase(),
            phase_progress: self.clock.phase_progress(),
            origin: self.origin,
        }
    }

    /// Sway angle for static decor micro-animation, a pure function of clock time.
    pub fn decor_sway(&self) -> f64 {
        (self.clock.current_time() * 0.0012).sin() * 0.06
    }
}

/// Host-facing contract implemented by all six stage animations.
///
/// Lifecycle: constructed, running, complete (latched), cleaned up. The host calls
/// [`StageAnimation::update`] once per frame until completion, renders as long as it
/// wants the visuals, and finishes with [`StageAnimation::cleanup`].
pub trait StageAnimation {
    /// Advance to absolute `time_ms` with frame delta `delta_ms`.
    ///
    /// Never fails; all per-frame math is clamped/bounded.
    fn update(&mut self, time_ms: TimeMs, delta_ms: TimeMs);

    /// Draw the current frame in fixed layer order.
    ///
    /// Transform/alpha changes are fully bracketed; the context returns to its entry
    /// state even on error. Rasterization is the engine's only fallible per-frame
    /// surface, and the host is expected to wrap failures with a minimal fallback
    /// draw.
    fn render(&self, ctx: &mut SceneCtx) -> StagefxResult<()>;

    /// Whether the completion latch is set.
    fn is_animation_complete(&self) -> bool;

    /// Apply a quality tier to this instance's particle fields.
    fn set_quality(&mut self, level: QualityLevel);

    /// Push interpolated body-shape parameters from the morphing collaborator.
    fn set_body_shape(&mut self, shape: BodyShape);

    /// Empty every particle and effect collection. Idempotent; safe at any time.
    fn cleanup(&mut self);
}
