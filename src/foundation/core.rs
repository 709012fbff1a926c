use crate::foundation::error::{StagefxError, StagefxResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Milliseconds on the host animation timeline.
///
/// The host loop owns the clock; the engine only ever receives absolute times and
/// frame deltas in this unit and never reads a wall clock itself.
pub type TimeMs = f64;

/// Drawing surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas (both dimensions non-zero, rasterizable as `u16`).
    pub fn new(width: u32, height: u32) -> StagefxResult<Self> {
        if width == 0 || height == 0 {
            return Err(StagefxError::validation("Canvas dimensions must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(StagefxError::validation("Canvas dimensions exceed u16"));
        }
        Ok(Self { width, height })
    }

    /// Center point of the canvas.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) * 0.5, f64::from(self.height) * 0.5)
    }

    /// Full-canvas rectangle.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        // Matches the game's fixed play-field surface.
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Straight-alpha RGBA8 color.
///
/// The engine authors all colors in straight alpha; premultiplication happens at the
/// rasterizer boundary only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Build from channel values.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Scale the alpha channel by `opacity` in `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let o = opacity.clamp(0.0, 1.0);
        Self {
            a: (f64::from(self.a) * o).round().clamp(0.0, 255.0) as u8,
            ..self
        }
    }

    /// Interpolate toward `other` with normalized factor `t`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        let t = t.clamp(0.0, 1.0);
        Self {
            r: lerp_u8(self.r, other.r, t),
            g: lerp_u8(self.g, other.g, t),
            b: lerp_u8(self.b, other.b, t),
            a: lerp_u8(self.a, other.a, t),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
