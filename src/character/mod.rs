//! Character placement and drawing.
//!
//! Body-shape parameters come from the host's life-stage morphing collaborator; the
//! engine only positions, scales, fades, and emotes the character it is given.

use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8};
use crate::foundation::error::StagefxResult;
use crate::render::context::SceneCtx;

/// Facial variant selected by the active behavior entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Resting face.
    #[default]
    Neutral,
    /// Gentle smile.
    Happy,
    /// Wide smile, raised eyes.
    Excited,
    /// Downturned mouth.
    Sad,
    /// Flat worried mouth, slanted brows.
    Worried,
    /// Closed-eye contented smile.
    Proud,
    /// Soft small smile.
    Calm,
    /// Open round mouth.
    Surprised,
}

/// Character color palette supplied with the body shape.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorPalette {
    /// Skin tone.
    pub skin: Rgba8,
    /// Outfit/body color.
    pub outfit: Rgba8,
    /// Hair color.
    pub hair: Rgba8,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            skin: Rgba8::opaque(240, 200, 170),
            outfit: Rgba8::opaque(90, 130, 200),
            hair: Rgba8::opaque(80, 55, 35),
        }
    }
}

/// Interpolated body-shape parameters for the current life stage.
///
/// Produced by the morphing collaborator; the engine treats these as opaque draw
/// inputs and never interpolates them itself.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BodyShape {
    /// Head radius in pixels (pre-scale).
    pub head_radius: f64,
    /// Torso width in pixels.
    pub body_width: f64,
    /// Torso height in pixels.
    pub body_height: f64,
    /// Arm/leg thickness in pixels.
    pub limb_thickness: f64,
    /// Palette.
    pub palette: ColorPalette,
}

impl Default for BodyShape {
    fn default() -> Self {
        Self {
            head_radius: 18.0,
            body_width: 30.0,
            body_height: 48.0,
            limb_thickness: 7.0,
            palette: ColorPalette::default(),
        }
    }
}

/// Draw the character with its feet anchored at the local origin.
///
/// `position`, `scale`, and `opacity` come from the owning animation instance's
/// character state; the facial variant comes from the active behavior entry.
pub fn draw_character(
    ctx: &mut SceneCtx,
    shape: &BodyShape,
    position: Point,
    scale: f64,
    opacity: f64,
    emotion: Emotion,
) -> StagefxResult<()> {
    if opacity <= 0.0 || scale <= 0.0 {
        return Ok(());
    }
    let t = Affine::translate((position.x, position.y)) * Affine::scale(scale);
    ctx.with_alpha(opacity, |ctx| {
        ctx.with_transform(t, |ctx| {
            let bw = shape.body_width;
            let bh = shape.body_height;
            let limb = shape.limb_thickness;
            let head_r = shape.head_radius;
            let torso_top = -bh - limb * 2.0;
            let head_center = Point::new(0.0, torso_top - head_r + 2.0);

            // Legs, then torso, then arms, then head: painter's order back to front.
            let leg_h = limb * 2.0;
            ctx.fill_rounded_rect(
                Rect::new(-bw * 0.35 - limb * 0.5, -leg_h, -bw * 0.35 + limb * 0.5, 0.0),
                limb * 0.4,
                shape.palette.outfit,
            );
            ctx.fill_rounded_rect(
                Rect::new(bw * 0.35 - limb * 0.5, -leg_h, bw * 0.35 + limb * 0.5, 0.0),
                limb * 0.4,
                shape.palette.outfit,
            );

            ctx.fill_rounded_rect(
                Rect::new(-bw * 0.5, torso_top, bw * 0.5, -leg_h + 2.0),
                bw * 0.25,
                shape.palette.outfit,
            );

            let arm_y = torso_top + bh * 0.2;
            ctx.fill_rounded_rect(
                Rect::new(-bw * 0.5 - limb, arm_y, -bw * 0.5 + 1.0, arm_y + bh * 0.55),
                limb * 0.4,
                shape.palette.outfit,
            );
            ctx.fill_rounded_rect(
                Rect::new(bw * 0.5 - 1.0, arm_y, bw * 0.5 + limb, arm_y + bh * 0.55),
                limb * 0.4,
                shape.palette.outfit,
            );

            ctx.fill_circle(head_center, head_r, shape.palette.skin);

            // Hair cap over the upper head arc.
            let mut hair = BezPath::new();
            hair.move_to((head_center.x - head_r, head_center.y));
            hair.curve_to(
                (head_center.x - head_r, head_center.y - head_r * 1.25),
                (head_center.x + head_r, head_center.y - head_r * 1.25),
                (head_center.x + head_r, head_center.y),
            );
            hair.curve_to(
                (head_center.x + head_r * 0.6, head_center.y - head_r * 0.45),
                (head_center.x - head_r * 0.6, head_center.y - head_r * 0.45),
                (head_center.x - head_r, head_center.y),
            );
            hair.close_path();
            ctx.fill_path(&hair, shape.palette.hair);

            draw_face(ctx, head_center, head_r, emotion);
            Ok(())
        })
    })
}

fn draw_face(ctx: &mut SceneCtx, head: Point, r: f64, emotion: Emotion) {
    let ink = Rgba8::opaque(40, 30, 30);
    let eye_dx = r * 0.38;
    let eye_y = head.y - r * 0.05;
    let eye_r = match emotion {
        Emotion::Excited | Emotion::Surprised => r * 0.14,
        _ => r * 0.1,
    };

    match emotion {
        Emotion::Proud => {
            // Closed eyes: short horizontal slits.
            for side in [-1.0, 1.0] {
                ctx.fill_rect(
                    Rect::new(
                        head.x + side * eye_dx - eye_r,
                        eye_y - 1.0,
                        head.x + side * eye_dx + eye_r,
                        eye_y + 1.0,
                    ),
                    ink,
                );
            }
        }
        _ => {
            for side in [-1.0, 1.0] {
                ctx.fill_circle(Point::new(head.x + side * eye_dx, eye_y), eye_r, ink);
            }
        }
    }

    if matches!(emotion, Emotion::Worried) {
        for side in [-1.0, 1.0] {
            let t = Affine::translate((head.x + side * eye_dx, eye_y - r * 0.3))
                * Affine::rotate(side * 0.35);
            let _ = ctx.with_transform(t, |ctx| {
                ctx.fill_rect(Rect::new(-r * 0.16, -1.0, r * 0.16, 1.0), ink);
                Ok(())
            });
        }
    }

    let mouth_y = head.y + r * 0.42;
    let mouth_w = r * 0.5;
    match emotion {
        Emotion::Surprised => {
            ctx.fill_circle(Point::new(head.x, mouth_y), r * 0.16, ink);
        }
        Emotion::Neutral | Emotion::Worried => {
            ctx.fill_rect(
                Rect::new(head.x - mouth_w * 0.5, mouth_y - 1.2, head.x + mouth_w * 0.5, mouth_y + 1.2),
                ink,
            );
        }
        _ => {
            // Curved mouth: downward curve for sad, upward otherwise.
            let bend = match emotion {
                Emotion::Sad => -r * 0.22,
                Emotion::Happy | Emotion::Excited | Emotion::Proud => r * 0.26,
                _ => r * 0.12,
            };
            let mut m = BezPath::new();
            m.move_to((head.x - mouth_w, mouth_y));
            m.quad_to((head.x, mouth_y + bend), (head.x + mouth_w, mouth_y));
            m.quad_to((head.x, mouth_y + bend * 0.55), (head.x - mouth_w, mouth_y));
            m.close_path();
            ctx.fill_path(&m, ink);
        }
    }

    if matches!(emotion, Emotion::Happy | Emotion::Excited) {
        let blush = Rgba8::new(235, 120, 120, 110);
        for side in [-1.0, 1.0] {
            ctx.fill_circle(
                Point::new(head.x + side * r * 0.62, head.y + r * 0.22),
                r * 0.14,
                blush,
            );
        }
    }
}
