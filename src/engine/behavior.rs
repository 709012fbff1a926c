//! Event-type dispatch tables with per-event update/render handlers.

use crate::character::Emotion;
use crate::foundation::core::{Point, TimeMs};
use crate::foundation::error::StagefxResult;
use crate::render::context::SceneCtx;

/// Environment toggles derived from the selected event entry.
///
/// Consumed by the environment layer of the render pipeline; each stage interprets
/// the flags with its own set pieces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnvironmentFlags {
    /// Indoor backdrop (walls/window instead of open sky).
    pub indoors: bool,
    /// Celebration dressing (banners, brighter palette).
    pub celebration: bool,
    /// Nature dressing (ground foliage, sky gradient emphasis).
    pub nature: bool,
}

impl EnvironmentFlags {
    /// No environment dressing.
    pub const NONE: Self = Self {
        indoors: false,
        celebration: false,
        nature: false,
    };
    /// Indoor scene.
    pub const INDOORS: Self = Self {
        indoors: true,
        celebration: false,
        nature: false,
    };
    /// Indoor celebration.
    pub const PARTY: Self = Self {
        indoors: true,
        celebration: true,
        nature: false,
    };
    /// Outdoor nature scene.
    pub const OUTDOORS: Self = Self {
        indoors: false,
        celebration: false,
        nature: true,
    };
    /// Outdoor celebration.
    pub const FESTIVAL: Self = Self {
        indoors: false,
        celebration: true,
        nature: true,
    };
}

/// Per-frame sampling context handed to behavior update handlers.
#[derive(Clone, Copy, Debug)]
pub struct FrameCtx {
    /// Absolute host time in ms.
    pub time_ms: TimeMs,
    /// Frame delta in ms.
    pub delta_ms: TimeMs,
    /// Whole-animation progress in `[0, 1]`.
    pub progress: f64,
    /// Current phase name.
    pub phase: &'static str,
    /// Progress within the current phase, in `[0, 1]`.
    pub phase_progress: f64,
    /// Effect anchor supplied by the event source.
    pub origin: Point,
}

/// One entry of a stage's behavior table: discriminant key, derived flags, and the
/// update/render handler pair.
pub struct BehaviorEntry<S> {
    /// Event-type discriminant this entry answers to.
    pub key: &'static str,
    /// Emotion applied to the character for this event.
    pub emotion: Emotion,
    /// Environment dressing for this event.
    pub environment: EnvironmentFlags,
    /// Mutates derived effect records and field intensities each frame.
    pub update: fn(&mut S, &FrameCtx),
    /// Draws event-specific overlays (topmost pipeline layer).
    pub render: fn(&S, &mut SceneCtx) -> StagefxResult<()>,
}

/// Discriminated dispatch from an event-type key to a behavior entry.
///
/// Selection happens once at construction; the first entry is the defined default
/// and absorbs unknown discriminants so forward-compatible content tables never
/// panic the engine.
pub struct BehaviorTable<S: 'static> {
    entries: &'static [BehaviorEntry<S>],
}

impl<S: 'static> BehaviorTable<S> {
    /// Wrap a static, non-empty entry slice.
    pub const fn new(entries: &'static [BehaviorEntry<S>]) -> Self {
        assert!(!entries.is_empty(), "behavior table must be non-empty");
        Self { entries }
    }

    /// Resolve an event type, falling back to the default entry.
    pub fn select(&self, event_type: &str) -> &'static BehaviorEntry<S> {
        for entry in self.entries {
            if entry.key == event_type {
                return entry;
            }
        }
        tracing::debug!(
            event_type,
            fallback = self.entries[0].key,
            "unknown event type, using default behavior"
        );
        &self.entries[0]
    }

    /// All known discriminant keys, default first.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|e| e.key)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/behavior.rs"]
mod tests;
