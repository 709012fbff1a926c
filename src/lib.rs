//! # stagefx
//!
//! Deterministic, frame-driven animation and particle engine for a life-stages
//! canvas game. The host owns the clock and the event loop; this crate turns
//! `(event config, time, delta)` into layered 2D frames: environment, particles,
//! character, overlays.
//!
//! ## Architecture
//!
//! - [`engine`] — phase clocks, particle fields, behavior tables, quality tiers,
//!   and the [`StageAnimation`] host contract.
//! - [`character`] — body-shape parameters and the character rasterizer.
//! - [`render`] — the CPU scene context and the fixed-order frame pipeline.
//! - [`stages`] — the six life-stage animations and the [`stages::create`] factory.
//!
//! ## Determinism
//!
//! Identical `(EventConfig, update sequence)` inputs produce identical frames. All
//! procedural scatter flows from [`EventConfig::seed`] through [`Rng64`]; the
//! engine never reads a wall clock or an ambient RNG.
//!
//! ## Example
//!
//! ```no_run
//! use stagefx::{Canvas, EventConfig, LifeStage, SceneCtx, stages};
//!
//! # fn main() -> stagefx::StagefxResult<()> {
//! let canvas = Canvas::default();
//! let config = EventConfig {
//!     event_type: "birthday".into(),
//!     seed: 7,
//!     ..EventConfig::default()
//! };
//! let mut anim = stages::create(LifeStage::Child, canvas, &config)?;
//! let mut ctx = SceneCtx::new(canvas)?;
//!
//! let mut t = 0.0;
//! while !anim.is_animation_complete() {
//!     anim.update(t, 16.0);
//!     ctx.begin_frame();
//!     anim.render(&mut ctx)?;
//!     let _frame = ctx.finish_frame()?;
//!     t += 16.0;
//! }
//! anim.cleanup();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod character;
pub mod engine;
pub mod render;
pub mod stages;

pub use foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, TimeMs, Vec2};
pub use foundation::error::{StagefxError, StagefxResult};
pub use foundation::math::Rng64;

pub use character::{BodyShape, ColorPalette, Emotion};
pub use engine::instance::{CharacterState, EventConfig, StageAnimation};
pub use engine::quality::QualityLevel;
pub use render::context::{FrameRGBA, SceneCtx};
pub use stages::{LifeStage, create};
