//! Time-to-phase mapping with a latched completion flag.

use crate::foundation::core::TimeMs;
use crate::foundation::error::{StagefxError, StagefxResult};
use crate::foundation::math::clamp01;
use smallvec::SmallVec;

/// Phase name reported by single-progress clocks.
pub const PROGRESS_PHASE: &str = "progress";

/// A named interval `[start, end)` in milliseconds within an animation's duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseSpec {
    /// Phase name, stable across the animation's lifetime.
    pub name: &'static str,
    /// Inclusive start time in ms.
    pub start: TimeMs,
    /// Exclusive end time in ms.
    pub end: TimeMs,
}

impl PhaseSpec {
    /// Build a phase spec.
    pub const fn new(name: &'static str, start: TimeMs, end: TimeMs) -> Self {
        Self { name, start, end }
    }
}

/// Converts elapsed host time into discrete phase + normalized progress.
///
/// The clock assumes non-decreasing time inputs. Time regression is not defended
/// against: `advance` simply recomputes from whatever it is given, and the completion
/// latch never clears.
#[derive(Clone, Debug)]
pub struct PhaseClock {
    duration_ms: TimeMs,
    phases: SmallVec<[PhaseSpec; 4]>,
    current_time: TimeMs,
    complete: bool,
}

impl PhaseClock {
    /// Single-progress clock with no named phases.
    pub fn single(duration_ms: TimeMs) -> Self {
        Self {
            duration_ms,
            phases: SmallVec::new(),
            current_time: 0.0,
            complete: false,
        }
    }

    /// Multi-phase clock over a validated phase table.
    ///
    /// Phases must be contiguous, non-overlapping, start at 0, and end at
    /// `duration_ms`.
    pub fn with_phases(duration_ms: TimeMs, phases: &[PhaseSpec]) -> StagefxResult<Self> {
        if phases.is_empty() {
            return Err(StagefxError::validation("phase table must be non-empty"));
        }
        if phases[0].start != 0.0 {
            return Err(StagefxError::validation("first phase must start at 0"));
        }
        for w in phases.windows(2) {
            if w[0].end != w[1].start {
                return Err(StagefxError::validation(format!(
                    "phases '{}' and '{}' must be contiguous",
                    w[0].name, w[1].name
                )));
            }
        }
        for p in phases {
            if p.end < p.start {
                return Err(StagefxError::validation(format!(
                    "phase '{}' has end before start",
                    p.name
                )));
            }
        }
        let last = phases[phases.len() - 1];
        if last.end != duration_ms {
            return Err(StagefxError::validation(
                "last phase must end at the animation duration",
            ));
        }
        Ok(Self {
            duration_ms,
            phases: SmallVec::from_slice(phases),
            current_time: 0.0,
            complete: false,
        })
    }

    /// Advance to an absolute time and recompute progress/phase.
    ///
    /// Reaching `duration` latches completion for all subsequent calls.
    pub fn advance(&mut self, time_ms: TimeMs) {
        self.current_time = time_ms;
        if time_ms >= self.duration_ms && !self.complete {
            tracing::trace!(time_ms, duration_ms = self.duration_ms, "clock completed");
            self.complete = true;
        }
    }

    /// Normalized progress in `[0, 1]`, a pure function of time and duration.
    ///
    /// Degenerate durations (`<= 0`) clamp to 1 immediately; that is boundary
    /// behavior, not an error.
    pub fn progress(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        clamp01(self.current_time / self.duration_ms)
    }

    /// Name of the current phase.
    ///
    /// For multi-phase clocks this is the last phase whose `start <= current_time`;
    /// single-progress clocks always report [`PROGRESS_PHASE`].
    pub fn current_phase(&self) -> &'static str {
        let mut name = match self.phases.first() {
            Some(p) => p.name,
            None => return PROGRESS_PHASE,
        };
        for p in &self.phases {
            if p.start <= self.current_time {
                name = p.name;
            }
        }
        name
    }

    /// Normalized progress within the current phase, in `[0, 1]`.
    pub fn phase_progress(&self) -> f64 {
        let Some(first) = self.phases.first() else {
            return self.progress();
        };
        let mut current = *first;
        for p in &self.phases {
            if p.start <= self.current_time {
                current = *p;
            }
        }
        let span = current.end - current.start;
        if span <= 0.0 {
            return 1.0;
        }
        clamp01((self.current_time - current.start) / span)
    }

    /// Last time passed to [`PhaseClock::advance`].
    pub fn current_time(&self) -> TimeMs {
        self.current_time
    }

    /// Total animation duration in ms.
    pub fn duration(&self) -> TimeMs {
        self.duration_ms
    }

    /// Whether the completion latch has been set.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/phase.rs"]
mod tests;
