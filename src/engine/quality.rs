//! Quality tiers and the particle-count controller.

use crate::engine::particle::ParticleField;

/// Discrete rendering budget tier.
///
/// Chosen by an external performance signal (frame-time measurement in the host); the
/// engine only reacts by truncating particle fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    /// Roughly half of the authored particle counts.
    Low,
    /// Roughly two thirds of the authored particle counts.
    Medium,
    /// Full authored particle counts.
    #[default]
    High,
}

impl QualityLevel {
    /// Parse the host-facing level string. Unknown strings yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Stable string form, matching [`QualityLevel::parse`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Per-field maximum particle counts for each quality tier.
///
/// Every field authors its own caps rather than sharing one global percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QualityCaps {
    /// Cap at [`QualityLevel::Low`].
    pub low: usize,
    /// Cap at [`QualityLevel::Medium`].
    pub medium: usize,
    /// Cap at [`QualityLevel::High`], equal to the authored count.
    pub high: usize,
}

impl QualityCaps {
    /// Author explicit per-tier caps.
    pub const fn new(low: usize, medium: usize, high: usize) -> Self {
        Self { low, medium, high }
    }

    /// Cap for a given level.
    pub fn cap(self, level: QualityLevel) -> usize {
        match level {
            QualityLevel::Low => self.low,
            QualityLevel::Medium => self.medium,
            QualityLevel::High => self.high,
        }
    }
}

/// Applies a quality level to an instance's particle fields.
///
/// Truncation is lossy and one-directional per call: applying a lower level drops
/// particles from the end of each field, and re-raising the level never resurrects
/// them. Re-applying the same level is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct QualityController {
    level: QualityLevel,
}

impl QualityController {
    /// Start at [`QualityLevel::High`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently applied level.
    pub fn level(self) -> QualityLevel {
        self.level
    }

    /// Truncate each field to its own cap for `level`.
    ///
    /// Never touches clocks or completion state.
    pub fn apply(&mut self, level: QualityLevel, fields: &mut [&mut ParticleField]) {
        self.level = level;
        for field in fields {
            let cap = field.caps().cap(level);
            if field.len() > cap {
                tracing::debug!(
                    field = field.name(),
                    level = level.as_str(),
                    cap,
                    len = field.len(),
                    "truncating particle field"
                );
            }
            field.truncate(cap);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/quality.rs"]
mod tests;
